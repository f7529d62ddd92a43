//! JS track.
//!
//! ```text
//! compile   js/*.js ─ downlevel ─ join with "\n" ─→ dist/js/main.js
//! minify    dist/js/main.js ─ minify-js ─→ dist/js/main.min.js
//! ```
//!
//! Sources are matched with the `js.sources` globs (relative to the input
//! root) and concatenated in path order. Each source is parsed as a classic
//! script and syntax newer than `js.target` is lowered with oxc before
//! concatenation. Lowerings that need runtime helpers call them on a global
//! `babelHelpers` object.
//!
//! When `js.transpile` names a command it replaces the built-in lowering:
//! the script goes in on stdin and the downleveled script is read from stdout.

use crate::project::Project;
use crate::types::SourceFile;
use oxc::allocator::Allocator;
use oxc::codegen::Codegen;
use oxc::parser::Parser;
use oxc::semantic::SemanticBuilder;
use oxc::span::SourceType;
use oxc::transformer::{HelperLoaderMode, TransformOptions, Transformer};
use std::fmt::Display;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum JsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid source glob: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("source glob: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("transpile `{command}` failed on {}: {message}", .path.display())]
    Transpile {
        command: String,
        path: PathBuf,
        message: String,
    },
    #[error("unknown js.target '{target}': {message}")]
    Target { target: String, message: String },
    #[error("downlevel error in {}: {message}", .path.display())]
    Downlevel { path: PathBuf, message: String },
    #[error("minify error in {}: {message}", .path.display())]
    Minify { path: PathBuf, message: String },
}

/// A script written by one of the stages.
#[derive(Debug, Clone)]
pub struct JsOutput {
    pub path: PathBuf,
    pub bytes: usize,
    /// Number of source files concatenated (compile only).
    pub sources: usize,
}

/// Source files matched by `js.sources`, sorted and deduplicated.
pub fn source_files(project: &Project) -> Result<Vec<PathBuf>, JsError> {
    let base = glob::Pattern::escape(&project.input_dir().to_string_lossy());
    let mut files = Vec::new();
    for pattern in &project.config.js.sources {
        for entry in glob::glob(&format!("{base}/{pattern}"))? {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Concatenate the sources into the bundle. `Ok(None)` when there are no sources.
pub fn compile(project: &Project) -> Result<Option<JsOutput>, JsError> {
    let files = source_files(project)?;
    if files.is_empty() {
        warn!(sources = ?project.config.js.sources, "no JS sources matched, nothing written");
        return Ok(None);
    }

    let transpile = &project.config.js.transpile;
    let options = if transpile.is_empty() {
        Some(transform_options(&project.config.js.target)?)
    } else {
        None
    };
    let mut parts = Vec::with_capacity(files.len());
    for file in &files {
        let Some(source) = SourceFile::read(file)? else {
            debug!(path = %file.display(), "not a script, skipped");
            continue;
        };
        let script = match &options {
            Some(options) => downlevel(&source.content, &source.path, options)?,
            None => run_transpiler(transpile, &source.path, source.content)?,
        };
        parts.push(script);
    }
    let bundle = parts.join("\n");

    let output = project.js_output();
    write(&output, bundle.as_bytes())?;
    debug!(output = %output.display(), sources = parts.len(), "compiled js");
    Ok(Some(JsOutput {
        path: output,
        bytes: bundle.len(),
        sources: parts.len(),
    }))
}

/// Minify the bundle. `Ok(None)` when there is no bundle to minify.
pub fn minify(project: &Project) -> Result<Option<JsOutput>, JsError> {
    let bundle = project.js_output();
    if !bundle.is_file() {
        warn!(bundle = %bundle.display(), "no JS bundle to minify, skipped");
        return Ok(None);
    }
    let source = fs::read(&bundle)?;
    let minified = minify_source(&source).map_err(|message| JsError::Minify {
        path: bundle.clone(),
        message,
    })?;

    let output = project.js_min_output();
    write(&output, &minified)?;
    debug!(output = %output.display(), bytes = minified.len(), "minified js");
    Ok(Some(JsOutput {
        path: output,
        bytes: minified.len(),
        sources: 0,
    }))
}

/// Minify a classic (non-module) script.
pub fn minify_source(source: &[u8]) -> Result<Vec<u8>, String> {
    let session = minify_js::Session::new();
    let mut out = Vec::new();
    minify_js::minify(&session, minify_js::TopLevelMode::Global, source, &mut out)
        .map_err(|e| format!("{e:?}"))?;
    Ok(out)
}

/// Lowering options for a `js.target` such as `es2015` or `chrome80,safari14`.
pub fn transform_options(target: &str) -> Result<TransformOptions, JsError> {
    let mut options = TransformOptions::from_target(target).map_err(|e| JsError::Target {
        target: target.to_string(),
        message: e.to_string(),
    })?;
    options.helper_loader.mode = HelperLoaderMode::External;
    Ok(options)
}

/// Parse `source` as a classic script and print it back with newer syntax lowered.
pub fn downlevel(source: &str, path: &Path, options: &TransformOptions) -> Result<String, JsError> {
    let failure = |message: String| JsError::Downlevel {
        path: path.to_path_buf(),
        message,
    };
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::cjs()).parse();
    if !parsed.errors.is_empty() {
        return Err(failure(messages(&parsed.errors)));
    }
    if parsed.panicked {
        return Err(failure("parser gave up".to_string()));
    }
    let mut program = parsed.program;

    let semantic = SemanticBuilder::new().build(&program);
    if !semantic.errors.is_empty() {
        return Err(failure(messages(&semantic.errors)));
    }
    let (symbols, scopes) = semantic.semantic.into_symbol_table_and_scope_tree();
    let transformed = Transformer::new(&allocator, path, options)
        .build_with_symbols_and_scopes(symbols, scopes, &mut program);
    if !transformed.errors.is_empty() {
        return Err(failure(messages(&transformed.errors)));
    }

    let code = Codegen::new().build(&program).code;
    Ok(code.trim_end().to_string())
}

fn messages<E: Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn run_transpiler(command: &[String], path: &Path, source: String) -> Result<String, JsError> {
    let failure = |message: String| JsError::Transpile {
        command: command.join(" "),
        path: path.to_path_buf(),
        message,
    };
    let Some((program, args)) = command.split_first() else {
        return Ok(source);
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| failure(e.to_string()))?;

    // stdin is written on its own thread while stdout is drained here.
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| failure("stdin not captured".to_string()))?;
    let writer = std::thread::spawn(move || stdin.write_all(source.as_bytes()));

    let output = child.wait_with_output().map_err(|e| failure(e.to_string()))?;
    match writer.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(failure(e.to_string())),
        Err(_) => return Err(failure("stdin writer panicked".to_string())),
    }
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(failure(format!("{}: {}", output.status, stderr.trim())));
    }
    String::from_utf8(output.stdout).map_err(|e| failure(e.to_string()))
}

fn write(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn write_file(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn project(root: &Path) -> Project {
        Project::new(root, SiteConfig::default())
    }

    #[test]
    fn concatenates_sources_in_path_order() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(root, "site/js/b.js", "var b = 2;");
        write_file(root, "site/js/a.js", "var a = 1;");
        write_file(root, "site/js/notes.txt", "ignored");

        let out = compile(&project(root)).unwrap().unwrap();
        assert_eq!(out.sources, 2);
        assert_eq!(out.path, root.join("dist/js/main.js"));
        let bundle = fs::read_to_string(&out.path).unwrap();
        let a = bundle.find("var a = 1;").unwrap();
        let b = bundle.find("var b = 2;").unwrap();
        assert!(a < b, "{bundle}");
    }

    #[test]
    fn default_target_lowers_newer_syntax() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(
            root,
            "site/js/app.js",
            "const f = (x) => `v${x}`;\nlet y = window.answer ?? f(1);\nwindow.count ||= 0;\n",
        );
        let out = compile(&project(root)).unwrap().unwrap();
        let bundle = fs::read_to_string(&out.path).unwrap();

        assert!(!bundle.contains("??"), "{bundle}");
        assert!(!bundle.contains("||="), "{bundle}");
        assert!(bundle.contains("window.answer"));
        assert!(bundle.contains("window.count"));
    }

    #[test]
    fn esnext_target_keeps_syntax() {
        let options = transform_options("esnext").unwrap();
        let out = downlevel("let y = a ?? b;\n", Path::new("a.js"), &options).unwrap();
        assert!(out.contains("??"), "{out}");
    }

    #[test]
    fn unknown_target_is_error() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(root, "site/js/a.js", "var a = 1;");
        let mut config = SiteConfig::default();
        config.js.target = "es1999".to_string();
        let err = compile(&Project::new(root, config)).unwrap_err();
        assert!(matches!(err, JsError::Target { .. }));
    }

    #[test]
    fn source_syntax_error_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(root, "site/js/broken.js", "function (");
        let err = compile(&project(root)).unwrap_err();
        match err {
            JsError::Downlevel { path, .. } => assert!(path.ends_with("broken.js")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn no_sources_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let project = project(tmp.path());
        assert!(compile(&project).unwrap().is_none());
        assert!(!project.js_output().exists());
    }

    #[test]
    fn minify_shrinks_bundle() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(
            root,
            "site/js/app.js",
            "function greet(personName) {\n    var message = 'hello ' + personName;\n    return message;\n}\nwindow.greet = greet;\n",
        );
        let project = project(root);
        let compiled = compile(&project).unwrap().unwrap();
        let min = minify(&project).unwrap().unwrap();

        assert_eq!(min.path, root.join("dist/js/main.min.js"));
        assert!(min.bytes < compiled.bytes);
        let text = fs::read_to_string(&min.path).unwrap();
        assert!(text.contains("window.greet"));
    }

    #[test]
    fn minify_follows_configured_bundle_name() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(root, "site/js/app.js", "window.answer = 42;\n");
        let mut config = SiteConfig::default();
        config.js.dest = "assets".to_string();
        config.js.bundle = "app.js".to_string();
        let project = Project::new(root, config);

        compile(&project).unwrap().unwrap();
        let min = minify(&project).unwrap().unwrap();
        assert_eq!(min.path, project.js_min_output());
        assert_eq!(min.path, root.join("dist/assets/app.min.js"));
        assert!(min.path.is_file());
    }

    #[test]
    fn minify_without_bundle_is_skipped() {
        let tmp = TempDir::new().unwrap();
        assert!(minify(&project(tmp.path())).unwrap().is_none());
    }

    #[test]
    fn minify_reports_syntax_errors() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(root, "dist/js/main.js", "function (");
        let err = minify(&project(root)).unwrap_err();
        assert!(matches!(err, JsError::Minify { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn transpile_command_receives_each_source() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(root, "site/js/a.js", "let a = 1;");
        let mut config = SiteConfig::default();
        config.js.transpile = vec!["tr".to_string(), "a-z".to_string(), "A-Z".to_string()];
        let project = Project::new(root, config);

        let out = compile(&project).unwrap().unwrap();
        assert_eq!(fs::read_to_string(out.path).unwrap(), "LET A = 1;");
    }

    #[cfg(unix)]
    #[test]
    fn failing_transpile_command_is_error() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(root, "site/js/a.js", "let a = 1;");
        let mut config = SiteConfig::default();
        config.js.transpile = vec!["false".to_string()];
        let project = Project::new(root, config);

        let err = compile(&project).unwrap_err();
        assert!(matches!(err, JsError::Transpile { .. }));
    }
}
