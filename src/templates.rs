//! Template environment and layout chains.
//!
//! Pages and layouts are rendered with [minijinja](https://docs.rs/minijinja),
//! whose `{% extends %}`, `{% include %}`, `{% block %}` and filter syntax
//! match Nunjucks closely enough for `.njk` sources. The environment loads
//! named templates from the includes directory, so
//! `{% include "partials/nav.njk" %}` resolves to
//! `<input>/<includes>/partials/nav.njk`.
//!
//! ## Layouts
//!
//! A page names its layout in front matter. The name is looked up in
//! `[templates.layout_aliases]` first and otherwise used as a path relative
//! to the includes directory:
//!
//! ```text
//! layout: base                → includes/layouts/base.njk (via alias)
//! layout: layouts/post.njk    → includes/layouts/post.njk
//! ```
//!
//! The layout receives the rendered page as `content` (marked safe) plus every
//! variable the page had. A layout's own front matter fills in keys the page
//! does not set and may name a further layout, forming a chain that ends at a
//! layout without one. Revisiting a layout in the same chain is an error.

use crate::config::TemplatesConfig;
use crate::frontmatter::{self, FrontMatterError, LayoutChoice};
use crate::markdown;
use crate::paths;
use minijinja::{AutoEscape, Environment, Value, path_loader};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Variables passed to a template render.
pub type Vars = BTreeMap<String, Value>;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),
    #[error("layout '{name}' not found at {}", .path.display())]
    LayoutNotFound { name: String, path: PathBuf },
    #[error("layout {name}: {source}")]
    LayoutFrontMatter {
        name: String,
        #[source]
        source: FrontMatterError,
    },
    #[error("layout cycle: {}", .chain.join(" -> "))]
    LayoutCycle { chain: Vec<String> },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared template state for one render run.
pub struct Templates {
    env: Environment<'static>,
    includes_dir: PathBuf,
    aliases: BTreeMap<String, String>,
    default_layout: Option<String>,
}

impl Templates {
    pub fn new(includes_dir: &Path, config: &TemplatesConfig) -> Self {
        Self {
            env: environment(includes_dir),
            includes_dir: includes_dir.to_path_buf(),
            aliases: config.layout_aliases.clone(),
            default_layout: config.default_layout.clone(),
        }
    }

    /// Render a page or layout body under `name` (used in error messages).
    pub fn render_str(&self, name: &str, source: &str, vars: &Vars) -> Result<String, TemplateError> {
        Ok(self.env.render_named_str(name, source, vars)?)
    }

    /// Path of a layout, relative to the includes directory.
    pub fn resolve_layout(&self, name: &str) -> String {
        self.aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// The first layout a page is wrapped in, if any.
    pub fn page_layout(&self, choice: &LayoutChoice) -> Option<String> {
        match choice {
            LayoutChoice::Named(name) => Some(name.clone()),
            LayoutChoice::Unset => self.default_layout.clone(),
            LayoutChoice::Disabled => None,
        }
    }

    /// Wrap `content` in `layout` and whatever layouts it chains to.
    pub fn apply_layouts(
        &self,
        layout: Option<String>,
        content: String,
        vars: &Vars,
    ) -> Result<String, TemplateError> {
        let mut vars = vars.clone();
        let mut content = content;
        let mut chain: Vec<String> = Vec::new();
        let mut next = layout;

        while let Some(name) = next.take() {
            let rel = self.resolve_layout(&name);
            if chain.contains(&rel) {
                chain.push(rel);
                return Err(TemplateError::LayoutCycle { chain });
            }

            let path = self.includes_dir.join(&rel);
            if !path.is_file() {
                return Err(TemplateError::LayoutNotFound { name, path });
            }
            let source = fs::read_to_string(&path)?;
            let doc = frontmatter::parse(&source).map_err(|source| {
                TemplateError::LayoutFrontMatter {
                    name: name.clone(),
                    source,
                }
            })?;

            for (key, value) in &doc.data {
                if key == "layout" {
                    continue;
                }
                vars.entry(key.clone())
                    .or_insert_with(|| Value::from_serialize(value));
            }
            vars.insert("content".to_string(), Value::from_safe_string(content));

            let template_name = paths::slash_path(Path::new(&rel));
            content = self.render_str(&template_name, &doc.body, &vars)?;

            chain.push(rel);
            if let LayoutChoice::Named(parent) = doc.layout() {
                next = Some(parent);
            }
        }
        Ok(content)
    }
}

/// Build the template environment rooted at `includes_dir`.
///
/// HTML auto-escaping is on for every template; `content` and the output of
/// the `markdown` filter are safe strings and pass through unescaped.
pub fn environment(includes_dir: &Path) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_loader(path_loader(includes_dir));
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_filter("markdown", |markup: String| {
        Value::from_safe_string(markdown::render(&markup))
    });
    env
}
