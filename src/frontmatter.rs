//! YAML front matter.
//!
//! A content file or layout may start with a YAML block fenced by `---`
//! lines. Its keys become template variables for that file; `layout` and
//! `tags` are also read by the renderer.
//!
//! ```text
//! ---
//! title: About
//! layout: base
//! tags: [nav]
//! ---
//! # About
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("invalid YAML front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("front matter must be a mapping of keys to values")]
    NotAMapping,
}

/// A file split into its front matter data and the remaining body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub data: Map<String, Value>,
    pub body: String,
}

/// What a file's `layout` key asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutChoice {
    /// No `layout` key: fall back to the configured default, if any.
    Unset,
    /// `layout: false` or `layout: null`.
    Disabled,
    Named(String),
}

impl Document {
    pub fn layout(&self) -> LayoutChoice {
        match self.data.get("layout") {
            None => LayoutChoice::Unset,
            Some(Value::Null | Value::Bool(false)) => LayoutChoice::Disabled,
            Some(Value::String(name)) if name.trim().is_empty() => LayoutChoice::Disabled,
            Some(Value::String(name)) => LayoutChoice::Named(name.trim().to_string()),
            Some(other) => LayoutChoice::Named(other.to_string()),
        }
    }

    /// Tags from a `tags` key holding a string or a list of strings.
    pub fn tags(&self) -> Vec<String> {
        match self.data.get("tags") {
            Some(Value::String(tag)) => vec![tag.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Split `source` into front matter and body.
///
/// Files without an opening `---` line, or without a closing one, have no
/// front matter and are returned whole as the body.
pub fn parse(source: &str) -> Result<Document, FrontMatterError> {
    let Some((yaml, body)) = split(source) else {
        return Ok(Document {
            data: Map::new(),
            body: source.to_string(),
        });
    };
    if yaml.trim().is_empty() {
        return Ok(Document {
            data: Map::new(),
            body: body.to_string(),
        });
    }

    let data = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        _ => return Err(FrontMatterError::NotAMapping),
    };
    Ok(Document {
        data,
        body: body.to_string(),
    })
}

/// Returns `(yaml, body)` when `source` opens with a fenced block.
fn split(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix('\u{feff}').unwrap_or(source);
    let rest = rest
        .strip_prefix("---\r\n")
        .or_else(|| rest.strip_prefix("---\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}
