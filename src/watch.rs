//! File watching.
//!
//! Watch rules map glob patterns (relative to the project root) to tasks:
//!
//! | Rule | Patterns | Tasks |
//! |------|----------|-------|
//! | templates | utility `content` globs | css |
//! | utilities config | `utilities.toml` | css |
//! | styles | `**/*.css` under the directory of `css.entry` | css |
//! | scripts | `js.sources` under the input root | js |
//! | content | page formats, includes, data files | content |
//! | static | passthrough directories | passthrough |
//!
//! Every path of a create, modify or remove event is checked against every
//! rule. The union of matched tasks over the event's paths runs once, in rule
//! order, on the watch thread with [`OnError::Continue`] so a failing stage
//! never stops the watcher.

use crate::output;
use crate::paths;
use crate::project::Project;
use crate::scan::DATA_EXTENSIONS;
use crate::tasks::{self, OnError, Task};
use crate::utilities::{UtilityEngine, UtilityError};
use glob::{MatchOptions, Pattern};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("watcher error: {0}")]
    Notify(#[from] notify::Error),
    #[error("invalid watch pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error(transparent)]
    Utility(#[from] UtilityError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("watch path not found: {}", .0.display())]
    MissingPath(PathBuf),
}

/// Patterns that trigger a list of tasks.
#[derive(Debug, Clone)]
pub struct WatchRule {
    pub name: &'static str,
    pub patterns: Vec<Pattern>,
    pub tasks: Vec<Task>,
}

impl WatchRule {
    fn new(name: &'static str, patterns: &[String], tasks: &[Task]) -> Result<Self, WatchError> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name,
            patterns,
            tasks: tasks.to_vec(),
        })
    }

    /// Whether `rel_path` (relative to the project root) matches any pattern.
    pub fn matches(&self, rel_path: &Path) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_path_with(rel_path, MATCH_OPTIONS))
    }
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Build the watch rules for `project`.
pub fn rules(project: &Project) -> Result<Vec<WatchRule>, WatchError> {
    let config = &project.config;
    let input = Pattern::escape(&config.site.input);
    let engine = UtilityEngine::load(project)?;

    let utilities_config = Pattern::escape(&config.css.utilities_config);

    let styles_dir = paths::slash_path(project.relative(&project.css_source_dir()));
    let styles = format!("{}/**/*.css", Pattern::escape(&styles_dir));
    let scripts: Vec<String> = config
        .js
        .sources
        .iter()
        .map(|source| format!("{input}/{source}"))
        .collect();

    let mut content: Vec<String> = config
        .templates
        .formats
        .iter()
        .map(|format| format!("{input}/**/*.{format}"))
        .collect();
    let includes = Pattern::escape(&config.site.includes);
    content.push(format!("{input}/{includes}/**/*"));
    let data = Pattern::escape(&config.site.data);
    for ext in DATA_EXTENSIONS {
        content.push(format!("{input}/{data}/*.{ext}"));
    }

    let passthrough: Vec<String> = config
        .passthrough
        .iter()
        .map(|dir| format!("{input}/{}/**/*", Pattern::escape(dir)))
        .collect();

    Ok(vec![
        WatchRule::new("templates", &engine.config().content, &[Task::CompileCss])?,
        WatchRule::new("utilities config", &[utilities_config], &[Task::CompileCss])?,
        WatchRule::new("styles", &[styles], &[Task::CompileCss])?,
        WatchRule::new("scripts", &scripts, &[Task::CompileJs])?,
        WatchRule::new("content", &content, &[Task::RenderContent])?,
        WatchRule::new("static", &passthrough, &[Task::CopyPassthrough])?,
    ])
}

/// Tasks triggered by a change to `rel_path`, deduplicated in rule order.
pub fn matching_tasks(rules: &[WatchRule], rel_path: &Path) -> Vec<Task> {
    let mut tasks = Vec::new();
    for rule in rules.iter().filter(|r| r.matches(rel_path)) {
        for &task in &rule.tasks {
            if !tasks.contains(&task) {
                tasks.push(task);
            }
        }
    }
    tasks
}

/// The paths of one event that match a rule, relative to the project root,
/// and the union of the tasks they trigger in rule order.
pub fn event_tasks(
    rules: &[WatchRule],
    canonical_root: &Path,
    root: &Path,
    paths: &[PathBuf],
) -> (Vec<PathBuf>, Vec<Task>) {
    let mut changed = Vec::new();
    let mut triggered = Vec::new();
    for path in paths {
        let Some(rel) = relative_to(canonical_root, root, path) else {
            debug!(path = %path.display(), "event outside project root");
            continue;
        };
        let tasks = matching_tasks(rules, &rel);
        if tasks.is_empty() {
            continue;
        }
        triggered.extend(tasks);
        if !changed.contains(&rel) {
            changed.push(rel);
        }
    }

    let mut tasks = Vec::new();
    for rule in rules {
        for &task in &rule.tasks {
            if triggered.contains(&task) && !tasks.contains(&task) {
                tasks.push(task);
            }
        }
    }
    (changed, tasks)
}

fn is_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Watch the project until `running` turns false.
///
/// The input root is watched recursively and the project root (for
/// `utilities.toml`) without recursion.
pub fn run(project: &Project, running: Arc<AtomicBool>) -> Result<(), WatchError> {
    let rules = rules(project)?;
    let input = project.input_dir();
    if !input.is_dir() {
        return Err(WatchError::MissingPath(input));
    }
    let root = project.root().canonicalize()?;

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                let _ = tx.send(event);
            }
            Err(e) => warn!(error = %e, "watch error"),
        },
        Config::default(),
    )?;
    watcher.watch(&input, RecursiveMode::Recursive)?;
    watcher.watch(project.root(), RecursiveMode::NonRecursive)?;
    let utilities_dir = project
        .utilities_config_path()
        .parent()
        .map(Path::to_path_buf)
        .filter(|dir| dir.is_dir() && dir.as_path() != project.root() && !dir.starts_with(&input));
    if let Some(dir) = utilities_dir {
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    }

    output::print_watch_start(project.root(), &rules);

    while running.load(Ordering::SeqCst) {
        let Ok(event) = rx.recv_timeout(Duration::from_millis(50)) else {
            continue;
        };
        if !is_change(&event.kind) {
            continue;
        }
        let (changed, tasks) = event_tasks(&rules, &root, project.root(), &event.paths);
        if tasks.is_empty() {
            continue;
        }
        output::print_change(&changed, &tasks);
        tasks::run_sequence(project, &tasks, OnError::Continue);
    }
    debug!("watch stopped");
    Ok(())
}

/// `path` relative to the project root, trying the canonical root first.
fn relative_to(canonical_root: &Path, root: &Path, path: &Path) -> Option<PathBuf> {
    path.strip_prefix(canonical_root)
        .or_else(|_| path.strip_prefix(root))
        .ok()
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::test_helpers::{load_project, setup_fixtures};
    use std::fs;
    use std::time::Instant;
    use tempfile::TempDir;

    fn default_rules() -> Vec<WatchRule> {
        let tmp = TempDir::new().unwrap();
        rules(&Project::new(tmp.path(), SiteConfig::default())).unwrap()
    }

    fn tasks_for(path: &str) -> Vec<Task> {
        matching_tasks(&default_rules(), Path::new(path))
    }

    #[test]
    fn rules_in_order() {
        let names: Vec<&str> = default_rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["templates", "utilities config", "styles", "scripts", "content", "static"]
        );
    }

    #[test]
    fn stylesheet_change_compiles_css() {
        assert_eq!(tasks_for("site/css/main.css"), vec![Task::CompileCss]);
        assert_eq!(tasks_for("site/css/parts/nav.css"), vec![Task::CompileCss]);
    }

    #[test]
    fn script_change_compiles_js() {
        assert_eq!(tasks_for("site/js/app.js"), vec![Task::CompileJs]);
    }

    #[test]
    fn utilities_config_change_compiles_css() {
        assert_eq!(tasks_for("utilities.toml"), vec![Task::CompileCss]);
    }

    #[test]
    fn template_change_triggers_css_then_content() {
        assert_eq!(
            tasks_for("site/includes/layouts/base.njk"),
            vec![Task::CompileCss, Task::RenderContent]
        );
        assert_eq!(
            tasks_for("site/posts.njk"),
            vec![Task::CompileCss, Task::RenderContent]
        );
    }

    #[test]
    fn markdown_and_data_render_content() {
        assert_eq!(tasks_for("site/index.md"), vec![Task::RenderContent]);
        assert_eq!(tasks_for("site/blog/post.md"), vec![Task::RenderContent]);
        assert_eq!(tasks_for("site/data/site.json"), vec![Task::RenderContent]);
    }

    #[test]
    fn passthrough_change_copies() {
        assert_eq!(tasks_for("site/images/logo.png"), vec![Task::CopyPassthrough]);
        assert_eq!(tasks_for("site/fonts/a/b.woff2"), vec![Task::CopyPassthrough]);
    }

    #[test]
    fn unrelated_paths_trigger_nothing() {
        assert!(tasks_for("dist/index.html").is_empty());
        assert!(tasks_for("README.md").is_empty());
        assert!(tasks_for("site/css/main.scss").is_empty());
    }

    #[test]
    fn wildcards_do_not_cross_separators() {
        let rule = WatchRule::new("x", &["site/*.md".to_string()], &[Task::RenderContent]).unwrap();
        assert!(rule.matches(Path::new("site/a.md")));
        assert!(!rule.matches(Path::new("site/blog/a.md")));
    }

    #[test]
    fn tasks_are_deduplicated() {
        let rules = vec![
            WatchRule::new("a", &["*.css".to_string()], &[Task::CompileCss]).unwrap(),
            WatchRule::new("b", &["*.css".to_string()], &[Task::CompileCss, Task::CompileJs])
                .unwrap(),
        ];
        assert_eq!(
            matching_tasks(&rules, Path::new("x.css")),
            vec![Task::CompileCss, Task::CompileJs]
        );
    }

    #[test]
    fn custom_directories_shape_rules() {
        let tmp = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.site.input = "src".to_string();
        config.passthrough = vec!["assets".to_string()];
        let rules = rules(&Project::new(tmp.path(), config)).unwrap();
        assert_eq!(
            matching_tasks(&rules, Path::new("src/css/a.css")),
            vec![Task::CompileCss]
        );
        assert_eq!(
            matching_tasks(&rules, Path::new("src/assets/a.svg")),
            vec![Task::CopyPassthrough]
        );
        assert!(matching_tasks(&rules, Path::new("src/images/a.png")).is_empty());
    }

    #[test]
    fn asset_rules_follow_configured_sources() {
        let tmp = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.css.entry = "styles/main.css".to_string();
        config.js.sources = vec!["scripts/*.js".to_string(), "vendor/**/*.js".to_string()];
        let rules = rules(&Project::new(tmp.path(), config)).unwrap();

        for (path, expected) in [
            ("site/styles/main.css", vec![Task::CompileCss]),
            ("site/styles/parts/nav.css", vec![Task::CompileCss]),
            ("site/scripts/app.js", vec![Task::CompileJs]),
            ("site/vendor/lib/x.js", vec![Task::CompileJs]),
        ] {
            assert_eq!(matching_tasks(&rules, Path::new(path)), expected, "{path}");
        }
        assert!(matching_tasks(&rules, Path::new("site/css/main.css")).is_empty());
        assert!(matching_tasks(&rules, Path::new("site/js/app.js")).is_empty());
        assert!(matching_tasks(&rules, Path::new("site/scripts/nested/app.js")).is_empty());
    }

    #[test]
    fn entry_at_input_root_watches_all_stylesheets() {
        let tmp = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.css.entry = "main.css".to_string();
        let rules = rules(&Project::new(tmp.path(), config)).unwrap();
        assert_eq!(matching_tasks(&rules, Path::new("site/main.css")), vec![Task::CompileCss]);
        assert_eq!(matching_tasks(&rules, Path::new("site/a/b.css")), vec![Task::CompileCss]);
    }

    #[test]
    fn event_paths_share_one_run() {
        let rules = default_rules();
        let root = Path::new("/proj");
        let (changed, tasks) = event_tasks(
            &rules,
            root,
            root,
            &[
                PathBuf::from("/proj/site/css/old.css"),
                PathBuf::from("/proj/site/css/new.css"),
            ],
        );
        assert_eq!(tasks, vec![Task::CompileCss]);
        assert_eq!(
            changed,
            vec![PathBuf::from("site/css/old.css"), PathBuf::from("site/css/new.css")]
        );
    }

    #[test]
    fn event_tasks_follow_rule_order() {
        let rules = default_rules();
        let root = Path::new("/proj");
        let (changed, tasks) = event_tasks(
            &rules,
            root,
            root,
            &[
                PathBuf::from("/proj/site/images/a.png"),
                PathBuf::from("/proj/site/js/a.js"),
                PathBuf::from("/proj/dist/index.html"),
                PathBuf::from("/elsewhere/site/index.md"),
                PathBuf::from("/proj/site/css/main.css"),
            ],
        );
        assert_eq!(tasks, vec![Task::CompileCss, Task::CompileJs, Task::CopyPassthrough]);
        assert_eq!(changed.len(), 3);
    }

    #[test]
    fn stylesheet_edit_recompiles_while_watching() {
        let tmp = setup_fixtures();
        let project = load_project(tmp.path());
        let running = Arc::new(AtomicBool::new(true));
        let handle = {
            let project = project.clone();
            let running = running.clone();
            std::thread::spawn(move || run(&project, running))
        };
        std::thread::sleep(Duration::from_millis(500));

        let entry = project.css_entry();
        let mut css = fs::read_to_string(&entry).unwrap();
        css.push_str("\n.rebuilt-on-change { color: red; }\n");
        fs::write(&entry, css).unwrap();

        let compiled = project.css_output();
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut rebuilt = false;
        while Instant::now() < deadline {
            if fs::read_to_string(&compiled).is_ok_and(|c| c.contains(".rebuilt-on-change")) {
                rebuilt = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        running.store(false, Ordering::SeqCst);
        handle.join().unwrap().unwrap();
        assert!(rebuilt, "{} was not recompiled", compiled.display());
    }

    #[test]
    fn missing_input_dir_is_error() {
        let tmp = TempDir::new().unwrap();
        let project = Project::new(tmp.path(), SiteConfig::default());
        let err = run(&project, Arc::new(AtomicBool::new(true))).unwrap_err();
        assert!(matches!(err, WatchError::MissingPath(_)));
    }

    #[test]
    fn stopped_flag_returns_immediately() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("site")).unwrap();
        let project = Project::new(tmp.path(), SiteConfig::default());
        run(&project, Arc::new(AtomicBool::new(false))).unwrap();
    }
}
