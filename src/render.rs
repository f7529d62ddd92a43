//! Content rendering.
//!
//! Turns the pages found by [`scan`](crate::scan) into HTML under the output
//! root. A render runs in phases:
//!
//! ```text
//! 1. Scan          input root → page sources + data files
//! 2. Global data   data/*.json, *.yaml → one template variable per file stem
//! 3. Front matter  every page parsed up front (collections need all of them)
//! 4. Collections   `all` plus one list per tag, sorted by source path
//! 5. Pages         rendered in parallel on the rayon pool, then written
//! ```
//!
//! ## Per-Page Pipeline
//!
//! 1. Variables: global data, then front matter (page keys win), then `page`
//!    and `collections`.
//! 2. The body is rendered as a template, so `{{ }}` and `{% %}` work in
//!    Markdown too. Markdown bodies are then converted to HTML.
//! 3. The result is wrapped in its layout chain.
//! 4. `.html` destinations are minified when `html.minify` is set.
//!
//! ## Failure Model
//!
//! A page whose front matter, template or layout fails is recorded in the
//! [`RenderReport`] and skipped; the other pages still render. Problems that
//! affect every page (unreadable data file, missing input root) fail the
//! whole render instead.

use crate::frontmatter::{self, Document, FrontMatterError};
use crate::markdown;
use crate::minify;
use crate::paths;
use crate::project::Project;
use crate::scan::{self, PageSource, ScanError};
use crate::templates::{TemplateError, Templates, Vars};
use crate::types::SourceFormat;
use minijinja::Value;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("data file {}: {message}", .path.display())]
    Data { path: PathBuf, message: String },
    #[error("front matter: {0}")]
    FrontMatter(#[from] FrontMatterError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("output {} is also produced by {}", .output.display(), .first.display())]
    DuplicateOutput { output: PathBuf, first: PathBuf },
    #[error("{} of {total} pages failed to render", .failures.len())]
    PagesFailed {
        failures: Vec<RenderFailure>,
        total: usize,
    },
}

/// A page that rendered and was written.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Source path relative to the input root.
    pub source: PathBuf,
    /// Absolute output path.
    pub output: PathBuf,
    pub url: String,
}

/// A page that could not be rendered.
#[derive(Debug)]
pub struct RenderFailure {
    /// Source path relative to the input root.
    pub source: PathBuf,
    pub error: RenderError,
}

/// Outcome of one render run, in source path order.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub pages: Vec<RenderedPage>,
    pub failures: Vec<RenderFailure>,
}

impl RenderReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.pages.len() + self.failures.len()
    }

    /// Turn a report with failures into [`RenderError::PagesFailed`].
    pub fn into_result(self) -> Result<Vec<RenderedPage>, RenderError> {
        if self.failures.is_empty() {
            Ok(self.pages)
        } else {
            let total = self.total();
            Err(RenderError::PagesFailed {
                failures: self.failures,
                total,
            })
        }
    }
}

/// One entry of a collection, as seen by templates.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionEntry {
    pub url: String,
    pub file_slug: String,
    pub input_path: String,
    pub data: serde_json::Map<String, serde_json::Value>,
}

/// The `page` template variable.
#[derive(Debug, Serialize)]
struct PageVars<'a> {
    url: &'a str,
    input_path: String,
    output_path: String,
    file_slug: &'a str,
}

/// Collections keyed by name: `all` plus one per tag.
pub type Collections = BTreeMap<String, Vec<CollectionEntry>>;

/// A scanned page with its parsed front matter.
struct ParsedPage {
    source: PageSource,
    doc: Document,
}

/// Render every page of the project and write the results.
pub fn render_site(project: &Project) -> Result<RenderReport, RenderError> {
    let content = scan::scan(project)?;
    let data = load_global_data(&content.data_files)?;
    debug!(
        pages = content.pages.len(),
        data_files = content.data_files.len(),
        "scanned content"
    );

    let mut report = RenderReport::default();
    let mut parsed = Vec::with_capacity(content.pages.len());
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    for page in content.pages {
        if let Some(first) = claimed.get(&page.output_rel) {
            report.failures.push(RenderFailure {
                error: RenderError::DuplicateOutput {
                    output: page.output_rel.clone(),
                    first: first.clone(),
                },
                source: page.rel,
            });
            continue;
        }
        claimed.insert(page.output_rel.clone(), page.rel.clone());

        match read_page(&page.source) {
            Ok(doc) => parsed.push(ParsedPage { source: page, doc }),
            Err(error) => report.failures.push(RenderFailure {
                source: page.rel,
                error,
            }),
        }
    }

    let collections = Value::from_serialize(build_collections(&parsed));
    let templates = Templates::new(&project.includes_dir(), &project.config.templates);
    let output_dir = project.output_dir();

    let results: Vec<Result<RenderedPage, RenderFailure>> = parsed
        .par_iter()
        .map(|page| {
            render_page(project, &templates, &data, &collections, page, &output_dir).map_err(
                |error| RenderFailure {
                    source: page.source.rel.clone(),
                    error,
                },
            )
        })
        .collect();

    for result in results {
        match result {
            Ok(page) => report.pages.push(page),
            Err(failure) => report.failures.push(failure),
        }
    }
    report.pages.sort_by(|a, b| a.source.cmp(&b.source));
    report.failures.sort_by(|a, b| a.source.cmp(&b.source));
    info!(
        rendered = report.pages.len(),
        failed = report.failures.len(),
        "render finished"
    );
    Ok(report)
}

fn read_page(path: &Path) -> Result<Document, RenderError> {
    let source = fs::read_to_string(path)?;
    Ok(frontmatter::parse(&source)?)
}

/// Load every data file into a map keyed by file stem.
///
/// A file that cannot be read or parsed fails the whole render.
pub fn load_global_data(files: &[PathBuf]) -> Result<BTreeMap<String, Value>, RenderError> {
    let mut data = BTreeMap::new();
    for path in files {
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let text = fs::read_to_string(path)?;
        let parsed: serde_json::Value = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text).map_err(|e| data_error(path, e))?,
            _ => serde_yaml::from_str(&text).map_err(|e| data_error(path, e))?,
        };
        data.insert(stem, Value::from_serialize(&parsed));
    }
    Ok(data)
}

fn data_error(path: &Path, err: impl std::fmt::Display) -> RenderError {
    RenderError::Data {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn build_collections(pages: &[ParsedPage]) -> Collections {
    let mut collections = Collections::new();
    collections.insert("all".to_string(), Vec::new());
    for page in pages {
        let entry = CollectionEntry {
            url: page.source.url.clone(),
            file_slug: page.source.file_slug.clone(),
            input_path: paths::slash_path(&page.source.rel),
            data: page.doc.data.clone(),
        };
        for tag in page.doc.tags() {
            collections.entry(tag).or_default().push(entry.clone());
        }
        collections.entry("all".to_string()).or_default().push(entry);
    }
    for entries in collections.values_mut() {
        entries.sort_by(|a, b| a.input_path.cmp(&b.input_path));
    }
    collections
}

fn render_page(
    project: &Project,
    templates: &Templates,
    data: &BTreeMap<String, Value>,
    collections: &Value,
    page: &ParsedPage,
    output_dir: &Path,
) -> Result<RenderedPage, RenderError> {
    let source = &page.source;
    let output = output_dir.join(&source.output_rel);

    let mut vars: Vars = data.clone();
    for (key, value) in &page.doc.data {
        vars.insert(key.clone(), Value::from_serialize(value));
    }
    let page_vars = PageVars {
        url: &source.url,
        input_path: paths::slash_path(&source.rel),
        output_path: paths::slash_path(&source.output_rel),
        file_slug: &source.file_slug,
    };
    vars.insert("page".to_string(), Value::from_serialize(&page_vars));
    vars.insert("collections".to_string(), collections.clone());

    let name = paths::slash_path(&source.rel);
    let mut body = templates.render_str(&name, &page.doc.body, &vars)?;
    if source.format == SourceFormat::Markdown {
        body = markdown::render(&body);
    }

    let layout = templates.page_layout(&page.doc.layout());
    let mut html = templates.apply_layouts(layout, body, &vars)?;
    if project.config.html.minify {
        html = minify::transform(&output, html);
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, html)?;
    debug!(source = %source.rel.display(), output = %output.display(), "rendered page");

    Ok(RenderedPage {
        source: source.rel.clone(),
        output,
        url: source.url.clone(),
    })
}
