//! CSS track.
//!
//! Both stages run on [lightningcss](https://docs.rs/lightningcss):
//!
//! ```text
//! compile   css/main.css ─ @import bundling ─ @tailwind expansion ─ lower for browsers ─→ dist/css/main.css
//! minify    dist/css/main.css ─ drop unused utilities ─ minify ─→ dist/css/main.min.css
//! ```
//!
//! The compiled stylesheet is pretty-printed and keeps every generated
//! utility, so development pages can use any class without a rebuild of the
//! content scan. Only the minified stylesheet is purged.

use crate::project::Project;
use crate::utilities::{UtilityEngine, UtilityError};
use lightningcss::bundler::{Bundler, FileProvider};
use lightningcss::stylesheet::{MinifyOptions, ParserFlags, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum CssError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Utility(#[from] UtilityError),
    #[error("entry stylesheet not found: {}", .0.display())]
    MissingEntry(PathBuf),
    #[error("compiled stylesheet not found: {} (run the css stage first)", .0.display())]
    MissingCompiled(PathBuf),
    #[error("{}: {message}", .path.display())]
    Bundle { path: PathBuf, message: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("minify error: {0}")]
    Minify(String),
    #[error("print error: {0}")]
    Print(String),
    #[error("invalid browser query: {0}")]
    Browsers(String),
}

/// A stylesheet written by one of the stages.
#[derive(Debug, Clone)]
pub struct CssOutput {
    pub path: PathBuf,
    pub bytes: usize,
    /// Utility classes removed as unused (minify only).
    pub purged: usize,
}

/// Browser targets from `css.browsers`.
pub fn targets(queries: &[String]) -> Result<Targets, CssError> {
    let browsers =
        Browsers::from_browserslist(queries).map_err(|e| CssError::Browsers(e.to_string()))?;
    Ok(Targets {
        browsers,
        ..Targets::default()
    })
}

fn parser_options<'i>() -> ParserOptions<'i> {
    ParserOptions {
        flags: ParserFlags::CUSTOM_MEDIA,
        ..ParserOptions::default()
    }
}

/// Resolve `@import`s starting at `entry` and print the result as one sheet.
pub fn bundle(entry: &Path) -> Result<String, CssError> {
    if !entry.is_file() {
        return Err(CssError::MissingEntry(entry.to_path_buf()));
    }
    let provider = FileProvider::new();
    let mut bundler = Bundler::new(&provider, None, parser_options());
    let sheet = bundler.bundle(entry).map_err(|e| CssError::Bundle {
        path: entry.to_path_buf(),
        message: e.to_string(),
    })?;
    let printed = sheet
        .to_css(PrinterOptions::default())
        .map_err(|e| CssError::Print(e.to_string()))?;
    Ok(printed.code)
}

/// Parse, minify with `targets`, drop rules for `unused` classes and print.
pub fn transform(
    code: &str,
    targets: Targets,
    unused: HashSet<String>,
    minify: bool,
) -> Result<String, CssError> {
    let mut sheet =
        StyleSheet::parse(code, parser_options()).map_err(|e| CssError::Parse(e.to_string()))?;
    sheet
        .minify(MinifyOptions {
            targets,
            unused_symbols: unused,
        })
        .map_err(|e| CssError::Minify(e.to_string()))?;
    let printed = sheet
        .to_css(PrinterOptions {
            minify,
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| CssError::Print(e.to_string()))?;
    Ok(printed.code)
}

/// Build the development stylesheet.
pub fn compile(project: &Project) -> Result<CssOutput, CssError> {
    let entry = project.css_entry();
    let engine = UtilityEngine::load(project)?;
    let targets = targets(&project.config.css.browsers)?;

    let bundled = bundle(&entry)?;
    let expanded = engine.expand_directives(&bundled)?;
    for class in engine.unsupported_classes(project.root())? {
        warn!(class = %class, "no utility generated for class");
    }
    let css = transform(&expanded, targets, HashSet::new(), false)?;

    let output = project.css_output();
    write(&output, &css)?;
    debug!(entry = %entry.display(), output = %output.display(), bytes = css.len(), "compiled css");
    Ok(CssOutput {
        path: output,
        bytes: css.len(),
        purged: 0,
    })
}

/// Build the production stylesheet from the compiled one.
pub fn minify(project: &Project) -> Result<CssOutput, CssError> {
    let compiled = project.css_output();
    if !compiled.is_file() {
        return Err(CssError::MissingCompiled(compiled));
    }
    let engine = UtilityEngine::load(project)?;
    let targets = targets(&project.config.css.browsers)?;
    let unused = engine.unused_classes(project.root())?;
    let purged = unused.len();

    let code = fs::read_to_string(&compiled)?;
    let css = transform(&code, targets, unused, true)?;

    let output = project.css_min_output();
    write(&output, &css)?;
    debug!(output = %output.display(), bytes = css.len(), purged, "minified css");
    Ok(CssOutput {
        path: output,
        bytes: css.len(),
        purged,
    })
}

fn write(path: &Path, contents: &str) -> std::io::Result<()> {
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

    /// Whether `css` has a rule for `.class` (escaped), not just a longer name.
    fn has_class(css: &str, class: &str) -> bool {
        let selector = format!(".{}", crate::utilities::escape_class(class));
        css.match_indices(&selector).any(|(i, _)| {
            css[i + selector.len()..]
                .chars()
                .next()
                .is_some_and(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '\\'))
        })
    }

    #[test]
    fn imports_are_inlined_in_order() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(root, "site/css/a.css", ".from-a { color: red; }");
        write_file(root, "site/css/b.css", ".from-b { color: blue; }");
        write_file(
            root,
            "site/css/main.css",
            "@import \"a.css\";\n@import \"b.css\";\n.own { color: green; }\n",
        );
        let out = compile(&project(root)).unwrap();
        let css = fs::read_to_string(&out.path).unwrap();

        let a = css.find(".from-a").unwrap();
        let b = css.find(".from-b").unwrap();
        let own = css.find(".own").unwrap();
        assert!(a < b && b < own, "unexpected order:\n{css}");
        assert!(!css.contains("@import"));
        assert_eq!(out.path, root.join("dist/css/main.css"));
    }

    #[test]
    fn compile_expands_utilities() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(root, "site/css/main.css", "@tailwind components;\n@tailwind utilities;\n");
        let out = compile(&project(root)).unwrap();
        let css = fs::read_to_string(&out.path).unwrap();
        assert!(has_class(&css, "container"));
        assert!(has_class(&css, "p-4"));
        assert!(has_class(&css, "sm:p-4"));
        assert!(has_class(&css, "hover:bg-red-500"));
        assert!(has_class(&css, "w-1/2"));
        assert!(!css.contains("@tailwind"));
    }

    #[test]
    fn compile_rejects_unknown_directive() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(root, "site/css/main.css", "@tailwind variants;\n");
        let err = compile(&project(root)).unwrap_err();
        assert!(matches!(err, CssError::Utility(UtilityError::UnknownDirective(_))));
    }

    #[test]
    fn missing_entry_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = compile(&project(tmp.path())).unwrap_err();
        assert!(matches!(err, CssError::MissingEntry(_)));
    }

    #[test]
    fn minify_purges_unused_utilities() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(root, "site/css/main.css", "@tailwind utilities;\n.keep-me { color: red; }\n");
        write_file(root, "site/index.njk", r#"<p class="p-4 sm:text-center">hi</p>"#);
        let project = project(root);

        let compiled = compile(&project).unwrap();
        let dev = fs::read_to_string(&compiled.path).unwrap();
        assert!(has_class(&dev, "bg-red-500"));

        let min = minify(&project).unwrap();
        let prod = fs::read_to_string(&min.path).unwrap();
        assert_eq!(min.path, root.join("dist/css/main.min.css"));
        assert!(has_class(&prod, "p-4"));
        assert!(has_class(&prod, "sm:text-center"));
        assert!(has_class(&prod, "keep-me"));
        assert!(!has_class(&prod, "bg-red-500"));
        assert!(!has_class(&prod, "sm:p-4"));
        assert!(!has_class(&prod, "hover:p-4"));
        assert!(min.bytes <= compiled.bytes);
        assert!(min.purged > 0);
    }

    #[test]
    fn minify_follows_configured_destination() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file(root, "site/styles/site.css", ".a { color: red; }\n");
        let mut config = SiteConfig::default();
        config.css.entry = "styles/site.css".to_string();
        config.css.dest = "assets/css".to_string();
        let project = Project::new(root, config);

        compile(&project).unwrap();
        let min = minify(&project).unwrap();
        assert_eq!(min.path, project.css_min_output());
        assert_eq!(min.path, root.join("dist/assets/css/site.min.css"));
        assert!(min.path.is_file());
    }

    #[test]
    fn minify_without_compiled_css_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = minify(&project(tmp.path())).unwrap_err();
        assert!(matches!(err, CssError::MissingCompiled(_)));
    }

    #[test]
    fn transform_minifies() {
        let css = transform(
            ".a {\n  color: #ff0000;\n}\n",
            Targets::default(),
            HashSet::new(),
            true,
        )
        .unwrap();
        assert_eq!(css, ".a{color:red}");
    }

    #[test]
    fn invalid_browser_query_is_error() {
        assert!(matches!(
            targets(&["unknownbrowser 99".to_string()]),
            Err(CssError::Browsers(_))
        ));
    }
}
