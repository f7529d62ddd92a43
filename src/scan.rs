//! Content discovery.
//!
//! Walks the input root and sorts what it finds into the inputs of the
//! content track: pages to render and global data files. Nothing is read or
//! parsed here beyond directory entries, so a scan is cheap enough to run on
//! every watch event.
//!
//! ## What Counts as a Page
//!
//! Any file under the input root whose extension is listed in
//! `templates.formats`, except those inside:
//!
//! ```text
//! site/
//! ├── index.md                 # page → index.html
//! ├── about.md                 # page → about/index.html
//! ├── blog/blog.md             # page → blog/index.html
//! ├── includes/                # skipped: layouts and partials
//! ├── data/                    # skipped: global data (*.json, *.yaml)
//! ├── images/                  # skipped: passthrough
//! ├── .drafts/                 # skipped: hidden
//! └── node_modules/            # skipped
//! ```
//!
//! Pages are returned sorted by source path so every run renders and reports
//! them in the same order.

use crate::paths;
use crate::project::Project;
use crate::types::SourceFormat;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Input directory not found: {}", .0.display())]
    MissingInput(PathBuf),
}

/// Data file extensions loaded as global template data.
pub const DATA_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Everything the content track works from.
#[derive(Debug, Serialize)]
pub struct ContentScan {
    pub pages: Vec<PageSource>,
    pub data_files: Vec<PathBuf>,
}

/// A page found in the input root, with its output location already resolved.
#[derive(Debug, Clone, Serialize)]
pub struct PageSource {
    /// Absolute source path.
    pub source: PathBuf,
    /// Source path relative to the input root.
    pub rel: PathBuf,
    pub format: SourceFormat,
    /// Output path relative to the output root.
    pub output_rel: PathBuf,
    pub url: String,
    pub file_slug: String,
}

impl PageSource {
    fn new(source: PathBuf, input: &Path) -> Option<Self> {
        let format = SourceFormat::from_path(&source)?;
        let rel = source.strip_prefix(input).ok()?.to_path_buf();
        let output_rel = paths::page_output_rel(&rel);
        Some(Self {
            url: paths::page_url(&output_rel),
            file_slug: paths::file_slug(&rel),
            format,
            output_rel,
            rel,
            source,
        })
    }
}

pub fn scan(project: &Project) -> Result<ContentScan, ScanError> {
    let input = project.input_dir();
    if !input.is_dir() {
        return Err(ScanError::MissingInput(input));
    }

    let pages = scan_pages(project, &input)?;
    let data_files = scan_data_files(&project.data_dir())?;
    Ok(ContentScan { pages, data_files })
}

fn scan_pages(project: &Project, input: &Path) -> Result<Vec<PageSource>, ScanError> {
    let mut skipped = vec![project.includes_dir(), project.data_dir(), project.output_dir()];
    skipped.extend(project.passthrough_dirs());
    let formats = &project.config.templates.formats;

    let mut pages = Vec::new();
    let walker = WalkDir::new(input)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e.path(), &skipped));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_format(entry.path(), formats.as_slice()) {
            continue;
        }
        if let Some(page) = PageSource::new(entry.into_path(), input) {
            pages.push(page);
        }
    }
    pages.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(pages)
}

fn scan_data_files(data_dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !data_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(data_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && has_format(path, DATA_EXTENSIONS) && !is_hidden(path) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_ignored(path: &Path, skipped: &[PathBuf]) -> bool {
    is_hidden(path)
        || path.file_name().is_some_and(|n| n == "node_modules")
        || skipped.iter().any(|dir| path == dir)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

fn has_format<S: AsRef<str>>(path: &Path, formats: &[S]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| formats.iter().any(|f| f.as_ref() == ext))
}
