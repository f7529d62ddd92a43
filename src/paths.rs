//! Output path conventions shared by every pipeline.
//!
//! Output locations are a pure function of the source path and the task that
//! produces them, so re-running a task always targets the same file:
//!
//! - `about.md` → `about/index.html`, URL `/about/`
//! - `index.njk` → `index.html`, URL `/`
//! - `blog/blog.md` → `blog/index.html` (stem matches its directory)
//! - `images/a.png` → same relative path under the output root
//! - `css/main.css` → `css/main.min.css` for the minified variant

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Suffix inserted before the extension of minified artifacts.
pub const MIN_SUFFIX: &str = ".min";

/// `main.css` → `main.min.css`; extensionless names get the suffix appended.
pub fn with_min_suffix(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
    name.push(MIN_SUFFIX);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// Output path of a content page, relative to the output root.
///
/// `rel_source` is relative to the input root.
pub fn page_output_rel(rel_source: &Path) -> PathBuf {
    let parent = rel_source.parent().unwrap_or(Path::new(""));
    let stem = rel_source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir_name = parent.file_name().map(|n| n.to_string_lossy().into_owned());

    if stem == "index" || dir_name.as_deref() == Some(stem.as_str()) {
        parent.join("index.html")
    } else {
        parent.join(stem).join("index.html")
    }
}

/// Public URL of a page given its output path relative to the output root.
pub fn page_url(rel_output: &Path) -> String {
    let dir = if rel_output.file_name().is_some_and(|n| n == "index.html") {
        rel_output.parent().unwrap_or(Path::new(""))
    } else {
        rel_output
    };
    let segments: Vec<String> = dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if segments.is_empty() {
        "/".to_string()
    } else if dir == rel_output {
        format!("/{}", segments.join("/"))
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Short page identifier: the file stem, or the directory name for `index` files.
pub fn file_slug(rel_source: &Path) -> String {
    let stem = rel_source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem == "index" {
        rel_source
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        stem
    }
}

/// Replace the `from` root of `path` with `to`. `None` if `path` is outside `from`.
pub fn rebase(path: &Path, from: &Path, to: &Path) -> Option<PathBuf> {
    path.strip_prefix(from).ok().map(|rel| to.join(rel))
}

/// Forward-slash form of a relative path, used for template names and display.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
