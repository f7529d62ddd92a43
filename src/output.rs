//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Sequence runs
//!
//! One block per finished task: the stage name, what it produced and, for
//! the content stage, each page's URL and output file.
//!
//! ```text
//! content: 4 pages
//!     001 / → index.html
//!     002 /about/ → about/index.html
//! passthrough: 3 files
//! css → dist/css/main.css (48.2 KB)
//! css minify → dist/css/main.min.css (3.1 KB, 1204 unused classes removed)
//! js → dist/js/main.js (2 sources, 214 B)
//! js minify → dist/js/main.min.js (120 B)
//! ```
//!
//! Failures go to stderr as a notification, with per-page detail when pages
//! failed to render:
//!
//! ```text
//! sitepipe error - content failed
//!     Error: 1 of 5 pages failed to render
//!     broken.njk: template error: ...
//! ```
//!
//! ## Check
//!
//! ```text
//! Pages
//! 001 /
//!     Source: index.md
//! 002 /about/
//!     Source: about.md
//!
//! Data
//!     site.json
//!
//! Config
//!     sitepipe.toml
//!     utilities.toml
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes it out. Format functions
//! are pure: no I/O, no side effects.

use crate::config::CONFIG_FILENAME;
use crate::project::Project;
use crate::render::RenderError;
use crate::scan::ContentScan;
use crate::tasks::{Notification, Task, TaskError, TaskReport};
use crate::watch::WatchRule;
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count.
fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

// ============================================================================
// Sequence runs
// ============================================================================

/// Format the result of one successful task.
pub fn format_task_success(task: Task, report: &TaskReport, project: &Project) -> Vec<String> {
    let stage = task.stage();
    match report {
        TaskReport::Rendered(pages) => {
            let mut lines = vec![format!("{}: {}", stage, plural(pages.len(), "page", "pages"))];
            let output_dir = project.output_dir();
            for (i, page) in pages.iter().enumerate() {
                let output = page.output.strip_prefix(&output_dir).unwrap_or(&page.output);
                lines.push(format!(
                    "{}{} {} \u{2192} {}",
                    indent(1),
                    format_index(i + 1),
                    page.url,
                    output.display()
                ));
            }
            lines
        }
        TaskReport::Copied(copy) => {
            let mut lines = vec![format!(
                "{}: {}",
                stage,
                plural(copy.copied.len(), "file", "files")
            )];
            for dir in &copy.missing {
                lines.push(format!("{}skipped missing {}", indent(1), project.relative(dir).display()));
            }
            lines
        }
        TaskReport::Css(css) => {
            let detail = if task == Task::MinifyCss {
                format!(
                    "{}, {} removed",
                    format_bytes(css.bytes),
                    plural(css.purged, "unused class", "unused classes")
                )
            } else {
                format_bytes(css.bytes)
            };
            vec![format!(
                "{} \u{2192} {} ({})",
                stage,
                project.relative(&css.path).display(),
                detail
            )]
        }
        TaskReport::Js(None) => vec![format!("{}: nothing to do", stage)],
        TaskReport::Js(Some(js)) => {
            let detail = if task == Task::CompileJs {
                format!(
                    "{}, {}",
                    plural(js.sources, "source", "sources"),
                    format_bytes(js.bytes)
                )
            } else {
                format_bytes(js.bytes)
            };
            vec![format!(
                "{} \u{2192} {} ({})",
                stage,
                project.relative(&js.path).display(),
                detail
            )]
        }
    }
}

/// Detail lines for a failed task beyond its notification.
///
/// Only render failures carry detail: one line per page that failed.
pub fn format_task_failure(error: &TaskError) -> Vec<String> {
    match error {
        TaskError::Render(RenderError::PagesFailed { failures, .. }) => failures
            .iter()
            .map(|f| format!("{}{}: {}", indent(1), f.source.display(), f.error))
            .collect(),
        _ => Vec::new(),
    }
}

/// Format a notification: title line, then the indented message.
pub fn format_notification(notification: &Notification) -> Vec<String> {
    vec![
        notification.title.clone(),
        format!("{}{}", indent(1), notification.message),
    ]
}

pub fn print_task_success(task: Task, report: &TaskReport, project: &Project) {
    for line in format_task_success(task, report, project) {
        println!("{}", line);
    }
}

pub fn print_task_failure(error: &TaskError) {
    for line in format_task_failure(error) {
        eprintln!("{}", line);
    }
}

/// Print a notification to stderr.
pub fn print_notification(notification: &Notification) {
    for line in format_notification(notification) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the content inventory shown by `check`.
pub fn format_scan_output(scan: &ContentScan, project: &Project) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    for (i, page) in scan.pages.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), page.url));
        lines.push(format!("{}Source: {}", indent(1), page.rel.display()));
    }

    if !scan.data_files.is_empty() {
        lines.push(String::new());
        lines.push("Data".to_string());
        for file in &scan.data_files {
            let name = file.file_name().map(|n| n.to_string_lossy().into_owned());
            lines.push(format!("{}{}", indent(1), name.unwrap_or_default()));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if project.root().join(CONFIG_FILENAME).exists() {
        lines.push(format!("{}{}", indent(1), CONFIG_FILENAME));
    }
    let utilities = project.utilities_config_path();
    if utilities.exists() {
        lines.push(format!("{}{}", indent(1), project.relative(&utilities).display()));
    }
    lines
}

pub fn print_scan_output(scan: &ContentScan, project: &Project) {
    for line in format_scan_output(scan, project) {
        println!("{}", line);
    }
}

// ============================================================================
// Watch
// ============================================================================

/// Format the watch rules shown when watching starts.
///
/// ```text
/// Watching /path/to/project
///     styles: site/css/**/*.css → css
///     content: site/**/*.md, site/**/*.njk → content
/// ```
pub fn format_watch_start(root: &Path, rules: &[WatchRule]) -> Vec<String> {
    let mut lines = vec![format!("Watching {}", root.display())];
    for rule in rules {
        let patterns: Vec<&str> = rule.patterns.iter().map(|p| p.as_str()).collect();
        let tasks: Vec<&str> = rule.tasks.iter().map(|t| t.stage()).collect();
        lines.push(format!(
            "{}{}: {} \u{2192} {}",
            indent(1),
            rule.name,
            patterns.join(", "),
            tasks.join(", ")
        ));
    }
    lines.push("Press Ctrl-C to stop".to_string());
    lines
}

/// Format one change event and the tasks it triggers.
/// One line per watch event: the changed paths, then the stages they trigger.
pub fn format_change(rel_paths: &[PathBuf], tasks: &[Task]) -> String {
    let paths: Vec<String> = rel_paths.iter().map(|p| p.display().to_string()).collect();
    let tasks: Vec<&str> = tasks.iter().map(|t| t.stage()).collect();
    format!("changed {} \u{2192} {}", paths.join(", "), tasks.join(", "))
}

pub fn print_watch_start(root: &Path, rules: &[WatchRule]) {
    for line in format_watch_start(root, rules) {
        println!("{}", line);
    }
}

pub fn print_change(rel_paths: &[PathBuf], tasks: &[Task]) {
    println!("{}", format_change(rel_paths, tasks));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::css::CssOutput;
    use crate::js::JsOutput;
    use crate::passthrough::CopyReport;
    use crate::render::{RenderFailure, RenderedPage};
    use crate::scan::PageSource;
    use crate::types::SourceFormat;
    use std::path::PathBuf;

    fn project() -> Project {
        Project::new(Path::new("/proj"), SiteConfig::default())
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
    }

    #[test]
    fn rendered_pages_list_url_and_output() {
        let report = TaskReport::Rendered(vec![
            RenderedPage {
                source: PathBuf::from("index.md"),
                output: PathBuf::from("/proj/dist/index.html"),
                url: "/".to_string(),
            },
            RenderedPage {
                source: PathBuf::from("about.md"),
                output: PathBuf::from("/proj/dist/about/index.html"),
                url: "/about/".to_string(),
            },
        ]);
        let lines = format_task_success(Task::RenderContent, &report, &project());
        assert_eq!(
            lines,
            vec![
                "content: 2 pages",
                "    001 / \u{2192} index.html",
                "    002 /about/ \u{2192} about/index.html",
            ]
        );
    }

    #[test]
    fn passthrough_reports_missing_dirs() {
        let report = TaskReport::Copied(CopyReport {
            copied: vec![PathBuf::from("/proj/dist/images/a.png")],
            missing: vec![PathBuf::from("/proj/site/fonts")],
        });
        let lines = format_task_success(Task::CopyPassthrough, &report, &project());
        assert_eq!(lines, vec!["passthrough: 1 file", "    skipped missing site/fonts"]);
    }

    #[test]
    fn css_minify_mentions_removed_classes() {
        let report = TaskReport::Css(CssOutput {
            path: PathBuf::from("/proj/dist/css/main.min.css"),
            bytes: 300,
            purged: 12,
        });
        let lines = format_task_success(Task::MinifyCss, &report, &project());
        assert_eq!(
            lines,
            vec!["css minify \u{2192} dist/css/main.min.css (300 B, 12 unused classes removed)"]
        );
    }

    #[test]
    fn js_compile_and_skip() {
        let report = TaskReport::Js(Some(JsOutput {
            path: PathBuf::from("/proj/dist/js/main.js"),
            bytes: 20,
            sources: 1,
        }));
        assert_eq!(
            format_task_success(Task::CompileJs, &report, &project()),
            vec!["js \u{2192} dist/js/main.js (1 source, 20 B)"]
        );
        assert_eq!(
            format_task_success(Task::MinifyJs, &TaskReport::Js(None), &project()),
            vec!["js minify: nothing to do"]
        );
    }

    #[test]
    fn notification_lines() {
        let n = Notification {
            title: "sitepipe error - js failed".to_string(),
            message: "Error: boom".to_string(),
        };
        assert_eq!(
            format_notification(&n),
            vec!["sitepipe error - js failed", "    Error: boom"]
        );
    }

    #[test]
    fn render_failures_listed_per_page() {
        let error = TaskError::Render(RenderError::PagesFailed {
            failures: vec![RenderFailure {
                source: PathBuf::from("bad.md"),
                error: RenderError::Data {
                    path: PathBuf::from("x.json"),
                    message: "eof".to_string(),
                },
            }],
            total: 3,
        });
        assert_eq!(
            format_task_failure(&error),
            vec!["    bad.md: data file x.json: eof"]
        );
    }

    #[test]
    fn scan_output_lists_pages_and_data() {
        let scan = ContentScan {
            pages: vec![PageSource {
                source: PathBuf::from("/proj/site/about.md"),
                rel: PathBuf::from("about.md"),
                format: SourceFormat::Markdown,
                output_rel: PathBuf::from("about/index.html"),
                url: "/about/".to_string(),
                file_slug: "about".to_string(),
            }],
            data_files: vec![PathBuf::from("/proj/site/data/site.json")],
        };
        let lines = format_scan_output(&scan, &project());
        assert_eq!(
            lines,
            vec!["Pages", "001 /about/", "    Source: about.md", "", "Data", "    site.json", "", "Config"]
        );
    }

    #[test]
    fn change_line() {
        assert_eq!(
            format_change(&[PathBuf::from("site/css/main.css")], &[Task::CompileCss]),
            "changed site/css/main.css \u{2192} css"
        );
        assert_eq!(
            format_change(
                &[PathBuf::from("site/js/a.js"), PathBuf::from("site/index.md")],
                &[Task::CompileJs, Task::RenderContent]
            ),
            "changed site/js/a.js, site/index.md \u{2192} js, content"
        );
    }
}
