//! Resolved project paths.
//!
//! A [`Project`] pairs the project root with its loaded [`SiteConfig`] and
//! turns every relative directory name in the config into a concrete path.
//! All pipelines take a `&Project` so that path resolution lives in one place.

use crate::config::{self, ConfigError, SiteConfig};
use crate::paths;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    pub config: SiteConfig,
}

impl Project {
    /// Load `sitepipe.toml` from `root` (defaults when absent).
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config = config::load_config(root)?;
        Ok(Self::new(root, config))
    }

    pub fn new(root: &Path, config: SiteConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root.join(&self.config.site.input)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.site.output)
    }

    pub fn includes_dir(&self) -> PathBuf {
        self.input_dir().join(&self.config.site.includes)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.input_dir().join(&self.config.site.data)
    }

    /// Passthrough source directories, in config order.
    pub fn passthrough_dirs(&self) -> Vec<PathBuf> {
        let input = self.input_dir();
        self.config.passthrough.iter().map(|d| input.join(d)).collect()
    }

    pub fn utilities_config_path(&self) -> PathBuf {
        self.root.join(&self.config.css.utilities_config)
    }

    pub fn css_entry(&self) -> PathBuf {
        self.input_dir().join(&self.config.css.entry)
    }

    /// Directory holding the CSS sources, used for watch rules.
    pub fn css_source_dir(&self) -> PathBuf {
        self.css_entry()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.input_dir())
    }

    /// Compiled stylesheet: `<output>/<css.dest>/<entry file name>`.
    pub fn css_output(&self) -> PathBuf {
        let name = Path::new(&self.config.css.entry)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "main.css".into());
        self.output_dir().join(&self.config.css.dest).join(name)
    }

    pub fn css_min_output(&self) -> PathBuf {
        paths::with_min_suffix(&self.css_output())
    }

    pub fn js_output(&self) -> PathBuf {
        self.output_dir()
            .join(&self.config.js.dest)
            .join(&self.config.js.bundle)
    }

    pub fn js_min_output(&self) -> PathBuf {
        paths::with_min_suffix(&self.js_output())
    }

    /// Path relative to the project root, for display and glob matching.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}
