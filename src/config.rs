//! Project configuration module.
//!
//! Handles loading, validating, and merging `sitepipe.toml`. Stock defaults
//! are serialized to a TOML table and the user's file is merged on top of
//! them, so a project file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! `sitepipe.toml` lives in the project root, next to the input directory:
//!
//! ```text
//! project/
//! ├── sitepipe.toml            # Build configuration (optional)
//! ├── utilities.toml           # Utility-class theme (optional)
//! └── site/                    # Input root
//!     ├── index.md
//!     ├── includes/layouts/base.njk
//!     ├── data/site.json
//!     ├── css/main.css
//!     └── js/*.js
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! passthrough = ["images", "fonts"]   # Copied verbatim, relative to input
//!
//! [site]
//! input = "site"
//! output = "dist"
//! includes = "includes"               # Relative to input
//! data = "data"                       # Relative to input
//!
//! [templates]
//! formats = ["md", "njk"]
//! markdown_engine = "njk"
//! html_engine = "njk"
//! # default_layout = "base"
//!
//! [templates.layout_aliases]
//! base = "layouts/base.njk"           # Relative to includes
//!
//! [html]
//! minify = true
//!
//! [css]
//! entry = "css/main.css"              # Relative to input
//! dest = "css"                        # Relative to output
//! utilities_config = "utilities.toml" # Relative to project root
//! browsers = ["defaults"]
//!
//! [js]
//! sources = ["js/*.js"]               # Relative to input
//! dest = "js"                         # Relative to output
//! bundle = "main.js"
//! target = "es2015"                   # Newer syntax is lowered to this
//! transpile = []                      # e.g. ["npx", "babel", "--presets", "@babel/env"]
//!
//! [processing]
//! max_processes = 4                   # Omit for auto = CPU cores
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

/// Name of the project configuration file within the project root.
pub const CONFIG_FILENAME: &str = "sitepipe.toml";

/// Content formats the template track knows how to render.
pub const KNOWN_FORMATS: &[&str] = &["md", "njk", "html"];

/// The only template engine available for Markdown and HTML preprocessing.
pub const TEMPLATE_ENGINE: &str = "njk";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `sitepipe.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directories under the input root copied verbatim to the output root.
    pub passthrough: Vec<String>,
    /// Source and output directory layout.
    pub site: SiteDirs,
    /// Template engine settings.
    pub templates: TemplatesConfig,
    /// Post-render HTML transform settings.
    pub html: HtmlConfig,
    /// CSS pipeline settings.
    pub css: CssConfig,
    /// JS pipeline settings.
    pub js: JsConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            passthrough: vec!["images".to_string(), "fonts".to_string()],
            site: SiteDirs::default(),
            templates: TemplatesConfig::default(),
            html: HtmlConfig::default(),
            css: CssConfig::default(),
            js: JsConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.input == self.site.output {
            return Err(ConfigError::Validation(
                "site.input and site.output must differ".into(),
            ));
        }
        if self.templates.formats.is_empty() {
            return Err(ConfigError::Validation(
                "templates.formats must not be empty".into(),
            ));
        }
        if let Some(unknown) = self
            .templates
            .formats
            .iter()
            .find(|f| !KNOWN_FORMATS.contains(&f.as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "templates.formats: unknown format '{unknown}' (expected one of {KNOWN_FORMATS:?})"
            )));
        }
        for (key, engine) in [
            ("markdown_engine", &self.templates.markdown_engine),
            ("html_engine", &self.templates.html_engine),
        ] {
            if engine != TEMPLATE_ENGINE {
                return Err(ConfigError::Validation(format!(
                    "templates.{key} must be \"{TEMPLATE_ENGINE}\", got \"{engine}\""
                )));
            }
        }
        for dir in &self.passthrough {
            if !is_plain_relative(dir) {
                return Err(ConfigError::Validation(format!(
                    "passthrough entry '{dir}' must be a relative path inside the input root"
                )));
            }
        }
        if !self.css.entry.ends_with(".css") {
            return Err(ConfigError::Validation(
                "css.entry must name a .css file".into(),
            ));
        }
        if !self.js.bundle.ends_with(".js") || self.js.bundle.contains('/') {
            return Err(ConfigError::Validation(
                "js.bundle must be a bare .js file name".into(),
            ));
        }
        if self.js.sources.is_empty() {
            return Err(ConfigError::Validation(
                "js.sources must not be empty".into(),
            ));
        }
        if self.js.target.trim().is_empty() {
            return Err(ConfigError::Validation(
                "js.target must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// A relative path with no `..` or root components.
fn is_plain_relative(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Source and output directory names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteDirs {
    /// Input root, relative to the project root.
    pub input: String,
    /// Output root, relative to the project root.
    pub output: String,
    /// Shared includes and layouts, relative to the input root.
    pub includes: String,
    /// Global data files, relative to the input root.
    pub data: String,
}

impl Default for SiteDirs {
    fn default() -> Self {
        Self {
            input: "site".to_string(),
            output: "dist".to_string(),
            includes: "includes".to_string(),
            data: "data".to_string(),
        }
    }
}

/// Template engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    /// File extensions rendered as pages.
    pub formats: Vec<String>,
    /// Engine that preprocesses Markdown before it is converted to HTML.
    pub markdown_engine: String,
    /// Engine used for `.html` and `.njk` pages.
    pub html_engine: String,
    /// Layout applied when a page's front matter does not name one.
    pub default_layout: Option<String>,
    /// Short layout names mapped to paths relative to the includes directory.
    pub layout_aliases: BTreeMap<String, String>,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            formats: vec!["md".to_string(), "njk".to_string()],
            markdown_engine: TEMPLATE_ENGINE.to_string(),
            html_engine: TEMPLATE_ENGINE.to_string(),
            default_layout: None,
            layout_aliases: BTreeMap::from([(
                "base".to_string(),
                "layouts/base.njk".to_string(),
            )]),
        }
    }
}

/// Post-render HTML transform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlConfig {
    /// Minify every rendered `.html` output.
    pub minify: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self { minify: true }
    }
}

/// CSS pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CssConfig {
    /// Entry stylesheet, relative to the input root.
    pub entry: String,
    /// Output directory for compiled CSS, relative to the output root.
    pub dest: String,
    /// Utility theme file, relative to the project root.
    pub utilities_config: String,
    /// Browserslist queries used to lower modern syntax.
    pub browsers: Vec<String>,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            entry: "css/main.css".to_string(),
            dest: "css".to_string(),
            utilities_config: "utilities.toml".to_string(),
            browsers: vec!["defaults".to_string()],
        }
    }
}

/// JS pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JsConfig {
    /// Source globs, relative to the input root. Matches are concatenated in path order.
    pub sources: Vec<String>,
    /// Output directory for the bundle, relative to the output root.
    pub dest: String,
    /// File name of the concatenated bundle.
    pub bundle: String,
    /// Syntax level scripts are lowered to: `es2015` … `esnext`, or engines such as `chrome80,safari14`.
    pub target: String,
    /// Optional downleveling command that replaces the built-in lowering.
    /// Reads a script on stdin, writes it to stdout.
    pub transpile: Vec<String>,
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            sources: vec!["js/*.js".to_string()],
            dest: "js".to_string(),
            bundle: "main.js".to_string(),
            target: "es2015".to_string(),
            transpile: Vec::new(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page-rendering workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Serialize a defaults struct into a `toml::Value` to use as the merge base.
pub fn defaults_value<T: Serialize>(defaults: &T) -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(defaults)?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a TOML file as a raw value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_toml(file: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !file.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(file)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize.
pub fn resolve_layered<T: DeserializeOwned>(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<T, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Load `file` layered over `T::default()`. A missing file yields the defaults.
pub fn load_layered<T>(file: &Path) -> Result<T, ConfigError>
where
    T: Default + Serialize + DeserializeOwned,
{
    let base = defaults_value(&T::default())?;
    let overlay = load_raw_toml(file)?;
    resolve_layered(base, overlay)
}

/// Load `sitepipe.toml` from the project root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = load_layered(&root.join(CONFIG_FILENAME))?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `sitepipe.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sitepipe configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Directories under the input root copied verbatim into the output root.
passthrough = ["images", "fonts"]

# ---------------------------------------------------------------------------
# Directory layout
# ---------------------------------------------------------------------------
[site]
# Input root, relative to the project root.
input = "site"
# Output root, relative to the project root. Overwritten on every build.
output = "dist"
# Shared includes and layouts, relative to the input root.
includes = "includes"
# Global data files (*.json, *.yaml), relative to the input root.
data = "data"

# ---------------------------------------------------------------------------
# Templates
# ---------------------------------------------------------------------------
[templates]
# File extensions rendered as pages ("md", "njk", "html").
formats = ["md", "njk"]
# Engine that preprocesses Markdown and HTML pages. Only "njk" is supported.
markdown_engine = "njk"
html_engine = "njk"
# Layout used when a page's front matter has no `layout` key.
# default_layout = "base"

# Short layout names usable in front matter (`layout: base`).
# Paths are relative to the includes directory.
[templates.layout_aliases]
base = "layouts/base.njk"

# ---------------------------------------------------------------------------
# HTML post-processing
# ---------------------------------------------------------------------------
[html]
# Collapse whitespace, strip comments and shorten the doctype of .html output.
minify = true

# ---------------------------------------------------------------------------
# CSS pipeline
# ---------------------------------------------------------------------------
[css]
# Entry stylesheet, relative to the input root. @import is resolved from here.
entry = "css/main.css"
# Output directory, relative to the output root.
dest = "css"
# Utility-class theme, relative to the project root.
utilities_config = "utilities.toml"
# Browserslist queries used to lower modern syntax and add prefixes.
browsers = ["defaults"]

# ---------------------------------------------------------------------------
# JS pipeline
# ---------------------------------------------------------------------------
[js]
# Source globs, relative to the input root, concatenated in path order.
sources = ["js/*.js"]
# Output directory, relative to the output root.
dest = "js"
# File name of the concatenated bundle.
bundle = "main.js"
# Syntax newer than this is lowered before concatenation: "es2015" up to
# "esnext", or a list of engines such as "chrome80,safari14".
target = "es2015"
# External downleveling command that replaces the built-in lowering. It
# receives each script on stdin and prints the result.
transpile = []

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page-rendering workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
