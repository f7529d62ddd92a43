//! Shared types used across the content and asset tracks.

use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// What kind of source a file is, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// `.md`: template-preprocessed, then converted from Markdown.
    Markdown,
    /// `.njk` / `.html`: rendered by the template engine.
    Template,
    /// `.css`
    Style,
    /// `.js`
    Script,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
        match ext.as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "njk" | "html" => Some(Self::Template),
            "css" => Some(Self::Style),
            "js" => Some(Self::Script),
            _ => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Markdown => "markdown",
            Self::Template => "template",
            Self::Style => "style",
            Self::Script => "script",
        };
        f.write_str(label)
    }
}

/// A source file read for one pipeline run.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
    pub format: SourceFormat,
}

impl SourceFile {
    /// Read `path`. Returns `Ok(None)` for files with no recognised format.
    pub fn read(path: &Path) -> io::Result<Option<Self>> {
        let Some(format) = SourceFormat::from_path(path) else {
            return Ok(None);
        };
        let content = std::fs::read_to_string(path)?;
        Ok(Some(Self {
            path: path.to_path_buf(),
            content,
            format,
        }))
    }
}
