//! Utility-class generation.
//!
//! Expands `@tailwind base;`, `@tailwind components;` and
//! `@tailwind utilities;` in the bundled stylesheet into plain CSS generated
//! from a theme in `utilities.toml`:
//!
//! | Layer | Contents |
//! |-------|----------|
//! | `base` | A small reset (box sizing, body margin, media elements) |
//! | `components` | `.container`, with max widths per screen and optional centering/padding |
//! | `utilities` | The families below, a `hover:` and `focus:` variant of each, and a `<screen>:` variant of each inside a `min-width` media query |
//!
//! Utility families:
//!
//! | Family | Classes |
//! |--------|---------|
//! | Spacing | `p-*`, `px-*` … `pl-*`, `m-*`, `mx-*` … `ml-*`, `mx-auto`, `gap-*` (keys from `theme.spacing`) |
//! | Sizing | `w-*`, `h-*` from `theme.spacing`, plus `auto`, `full`, `screen` and `w-1/2`-style fractions |
//! | Layout | `block`, `inline-block`, `inline`, `flex`, `inline-flex`, `grid`, `hidden` |
//! | Flexbox and grid | `flex-row`, `flex-col`, `flex-wrap`, `items-*`, `justify-*`, `grid-cols-1` … `grid-cols-12` |
//! | Typography | `text-left` … `text-justify`, `text-*` sizes, `font-*` weights |
//! | Color | `text-*`, `bg-*` and `border-*` per `theme.colors` entry |
//! | Borders | `border`, `border-0`, `border-2`, `border-4`, `border-8`, `rounded-*` |
//!
//! Classes in content `class` attributes that look like utilities from a
//! family or variant not listed here are reported with a warning when the
//! stylesheet is compiled. They produce no CSS.
//!
//! The development stylesheet carries every generated class. For production
//! [`UtilityEngine::unused_classes`] compares the generated names with the
//! class candidates found in the files matched by `content`, and the CSS
//! minifier drops rules for the rest.
//!
//! ## Config
//!
//! `utilities.toml` is layered over the stock theme the same way
//! `sitepipe.toml` is: tables merge key by key (so `[theme.colors]` adds
//! colors), arrays replace. Run `sitepipe gen-config --utilities` for the
//! documented defaults.

use crate::config::{self, ConfigError};
use crate::project::Project;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Directive names accepted after `@tailwind`.
pub const DIRECTIVE_NAMES: &[&str] = &["base", "components", "utilities"];

/// Pseudo-class variants generated for every utility.
pub const STATE_VARIANTS: &[&str] = &["hover", "focus"];

/// Class-name stems of utility families, generated or not. Used to tell a
/// utility the engine cannot produce from an ordinary class name.
const FAMILY_STEMS: &[&str] = &[
    "p", "px", "py", "pt", "pr", "pb", "pl", "m", "mx", "my", "mt", "mr", "mb", "ml",
    "space-x", "space-y", "gap", "gap-x", "gap-y", "w", "h", "min-w", "min-h", "max-w",
    "max-h", "size", "text", "font", "leading", "tracking", "bg", "border", "rounded",
    "shadow", "opacity", "ring", "outline", "flex", "grow", "shrink", "basis", "items",
    "justify", "grid-cols", "grid-rows", "col-span", "row-span", "inset", "z", "overflow",
    "cursor", "duration", "ease", "translate", "scale", "rotate",
];

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@tailwind\s+([A-Za-z0-9_-]+)\s*;").expect("directive pattern is a valid regex")
});

/// A `class` attribute value, double or single quoted.
static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("class attribute pattern is a valid regex")
});

/// A class candidate: a run of characters that can appear in a class
/// attribute, not ending in `:`.
static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^<>"'`\s]*[^<>"'`\s:]"#).expect("candidate pattern is a valid regex")
});

#[derive(Error, Debug)]
pub enum UtilityError {
    #[error("utilities config: {0}")]
    Config(#[from] ConfigError),
    #[error("unknown directive '@tailwind {0}' (expected one of {DIRECTIVE_NAMES:?})")]
    UnknownDirective(String),
    #[error("invalid content glob: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("content glob: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Utility theme loaded from `utilities.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UtilitiesConfig {
    /// Globs, relative to the project root, scanned for used class names.
    pub content: Vec<String>,
    pub theme: Theme,
}

impl Default for UtilitiesConfig {
    fn default() -> Self {
        Self {
            content: vec!["site/**/*.njk".to_string()],
            theme: Theme::default(),
        }
    }
}

impl UtilitiesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, width) in &self.theme.screens {
            if screen_width(width).is_none() {
                return Err(ConfigError::Validation(format!(
                    "theme.screens.{name}: '{width}' is not a px, rem or em length"
                )));
            }
        }
        for key in self.theme.container.padding.keys() {
            if key != "default" && !self.theme.screens.contains_key(key) {
                return Err(ConfigError::Validation(format!(
                    "theme.container.padding.{key}: expected 'default' or a screen name"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    /// Breakpoint name → minimum width.
    pub screens: BTreeMap<String, String>,
    pub container: ContainerConfig,
    pub spacing: BTreeMap<String, String>,
    pub colors: BTreeMap<String, String>,
    pub font_size: BTreeMap<String, String>,
    pub font_weight: BTreeMap<String, String>,
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            screens: string_map(&[
                ("sm", "640px"),
                ("md", "768px"),
                ("lg", "1024px"),
                ("xl", "1280px"),
            ]),
            container: ContainerConfig::default(),
            spacing: string_map(&[
                ("0", "0px"),
                ("0.5", "0.125rem"),
                ("1", "0.25rem"),
                ("2", "0.5rem"),
                ("3", "0.75rem"),
                ("4", "1rem"),
                ("6", "1.5rem"),
                ("8", "2rem"),
                ("12", "3rem"),
                ("16", "4rem"),
                ("px", "1px"),
            ]),
            colors: string_map(&[
                ("black", "#000000"),
                ("white", "#ffffff"),
                ("gray-100", "#f3f4f6"),
                ("gray-500", "#6b7280"),
                ("gray-900", "#111827"),
                ("red-500", "#ef4444"),
                ("green-500", "#22c55e"),
                ("blue-500", "#3b82f6"),
            ]),
            font_size: string_map(&[
                ("xs", "0.75rem"),
                ("sm", "0.875rem"),
                ("base", "1rem"),
                ("lg", "1.125rem"),
                ("xl", "1.25rem"),
                ("2xl", "1.5rem"),
                ("3xl", "1.875rem"),
            ]),
            font_weight: string_map(&[
                ("normal", "400"),
                ("medium", "500"),
                ("semibold", "600"),
                ("bold", "700"),
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
    /// Center the container with auto side margins.
    pub center: bool,
    /// Horizontal padding: `default` for all widths, or per screen name.
    pub padding: BTreeMap<String, String>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            center: true,
            padding: string_map(&[("default", "0.75rem"), ("sm", "1rem"), ("lg", "2rem")]),
        }
    }
}

/// Load `utilities.toml`, layered over the stock theme. Missing file → defaults.
pub fn load_utilities_config(path: &Path) -> Result<UtilitiesConfig, ConfigError> {
    let config: UtilitiesConfig = config::load_layered(path)?;
    config.validate()?;
    Ok(config)
}

/// Width of a screen value in px. Accepts `px`, `rem` and `em` (16px per em).
pub fn screen_width(value: &str) -> Option<f64> {
    let value = value.trim();
    if let Some(px) = value.strip_suffix("px") {
        return px.trim().parse().ok();
    }
    if let Some(rem) = value.strip_suffix("rem").or_else(|| value.strip_suffix("em")) {
        return rem.trim().parse::<f64>().ok().map(|n| n * 16.0);
    }
    None
}

/// Escape a class name for use in a selector: `sm:p-0.5` → `sm\:p-0\.5`.
pub fn escape_class(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if !(c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Class candidates in a piece of markup.
pub fn candidates(text: &str) -> impl Iterator<Item = &str> {
    CANDIDATE.find_iter(text).map(|m| m.as_str())
}

/// Class names listed in `class="…"` attributes.
pub fn class_attribute_names(text: &str) -> impl Iterator<Item = &str> {
    CLASS_ATTR
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .flat_map(|m| m.as_str().split_whitespace())
}

/// Whether `name` reads as a utility class: any `variant:` prefixes, then a
/// known family stem followed by `-value`.
pub fn is_utility_shaped(name: &str) -> bool {
    if name.contains(['{', '}', '%']) {
        return false;
    }
    let base = name.rsplit(':').next().unwrap_or(name);
    let base = base.strip_prefix('-').unwrap_or(base);
    FAMILY_STEMS.iter().any(|stem| {
        base.strip_prefix(stem)
            .is_some_and(|rest| rest.len() > 1 && rest.starts_with('-'))
    })
}

/// One generated class and its declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Utility {
    pub class: String,
    pub declarations: Vec<(&'static str, String)>,
}

impl Utility {
    fn new(class: impl Into<String>, declarations: Vec<(&'static str, String)>) -> Self {
        Self {
            class: class.into(),
            declarations,
        }
    }

    /// Write the rule for `<variant><class>`, with `pseudo` appended to the selector.
    fn write_rule(&self, variant: &str, pseudo: &str, indent: &str, out: &mut String) {
        let name = format!("{variant}{}", self.class);
        let _ = writeln!(out, "{indent}.{}{pseudo} {{", escape_class(&name));
        for (property, value) in &self.declarations {
            let _ = writeln!(out, "{indent}  {property}: {value};");
        }
        let _ = writeln!(out, "{indent}}}");
    }
}

const BASE: &str = "\
*, ::before, ::after {
  box-sizing: border-box;
  border-width: 0;
  border-style: solid;
}
html {
  line-height: 1.5;
  -webkit-text-size-adjust: 100%;
}
body {
  margin: 0;
}
img, svg, video {
  display: block;
  max-width: 100%;
  height: auto;
}
";

const DISPLAY: &[(&str, &str)] = &[
    ("block", "block"),
    ("inline-block", "inline-block"),
    ("inline", "inline"),
    ("flex", "flex"),
    ("inline-flex", "inline-flex"),
    ("grid", "grid"),
    ("hidden", "none"),
];

const FLEX: &[(&str, &str, &str)] = &[
    ("flex-row", "flex-direction", "row"),
    ("flex-col", "flex-direction", "column"),
    ("flex-wrap", "flex-wrap", "wrap"),
    ("items-start", "align-items", "flex-start"),
    ("items-center", "align-items", "center"),
    ("items-end", "align-items", "flex-end"),
    ("justify-start", "justify-content", "flex-start"),
    ("justify-center", "justify-content", "center"),
    ("justify-between", "justify-content", "space-between"),
    ("justify-end", "justify-content", "flex-end"),
];

const TEXT_ALIGN: &[&str] = &["left", "center", "right", "justify"];

const SIZES: &[(&str, &str, &str)] = &[
    ("auto", "auto", "auto"),
    ("full", "100%", "100%"),
    ("screen", "100vw", "100vh"),
];

const FRACTIONS: &[(&str, &str)] = &[
    ("1/2", "50%"),
    ("1/3", "33.333333%"),
    ("2/3", "66.666667%"),
    ("1/4", "25%"),
    ("3/4", "75%"),
];

const GRID_COLUMNS: u32 = 12;

const BORDER_WIDTHS: &[(&str, &str)] = &[
    ("border", "1px"),
    ("border-0", "0px"),
    ("border-2", "2px"),
    ("border-4", "4px"),
    ("border-8", "8px"),
];

const ROUNDED: &[(&str, &str)] = &[
    ("rounded-none", "0px"),
    ("rounded-sm", "0.125rem"),
    ("rounded", "0.25rem"),
    ("rounded-md", "0.375rem"),
    ("rounded-lg", "0.5rem"),
    ("rounded-full", "9999px"),
];

const SPACING: &[(&str, &[&str])] = &[
    ("p", &["padding"]),
    ("px", &["padding-left", "padding-right"]),
    ("py", &["padding-top", "padding-bottom"]),
    ("pt", &["padding-top"]),
    ("pr", &["padding-right"]),
    ("pb", &["padding-bottom"]),
    ("pl", &["padding-left"]),
    ("m", &["margin"]),
    ("mx", &["margin-left", "margin-right"]),
    ("my", &["margin-top", "margin-bottom"]),
    ("mt", &["margin-top"]),
    ("mr", &["margin-right"]),
    ("mb", &["margin-bottom"]),
    ("ml", &["margin-left"]),
];

/// Generates the three layers from a theme.
#[derive(Debug, Clone)]
pub struct UtilityEngine {
    config: UtilitiesConfig,
}

impl UtilityEngine {
    pub fn new(config: UtilitiesConfig) -> Self {
        Self { config }
    }

    /// Load the project's utilities config.
    pub fn load(project: &Project) -> Result<Self, UtilityError> {
        let config = load_utilities_config(&project.utilities_config_path())?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &UtilitiesConfig {
        &self.config
    }

    /// Screens ordered by width, narrowest first.
    pub fn screens(&self) -> Vec<(&str, &str)> {
        let mut screens: Vec<(&str, &str)> = self
            .config
            .theme
            .screens
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        screens.sort_by(|a, b| {
            let wa = screen_width(a.1).unwrap_or(0.0);
            let wb = screen_width(b.1).unwrap_or(0.0);
            wa.total_cmp(&wb).then_with(|| a.0.cmp(b.0))
        });
        screens
    }

    pub fn base(&self) -> String {
        BASE.to_string()
    }

    /// The `.container` component.
    pub fn components(&self) -> String {
        let container = &self.config.theme.container;
        let mut declarations = vec![("width", "100%".to_string())];
        if container.center {
            declarations.push(("margin-left", "auto".to_string()));
            declarations.push(("margin-right", "auto".to_string()));
        }
        if let Some(padding) = container.padding.get("default") {
            declarations.push(("padding-left", padding.clone()));
            declarations.push(("padding-right", padding.clone()));
        }

        let mut out = String::new();
        Utility::new("container", declarations).write_rule("", "", "", &mut out);
        for (screen, width) in self.screens() {
            let mut declarations = vec![("max-width", width.to_string())];
            if let Some(padding) = container.padding.get(screen) {
                declarations.push(("padding-left", padding.clone()));
                declarations.push(("padding-right", padding.clone()));
            }
            let _ = writeln!(out, "@media (min-width: {width}) {{");
            Utility::new("container", declarations).write_rule("", "", "  ", &mut out);
            out.push_str("}\n");
        }
        out
    }

    /// Unprefixed utilities in output order.
    pub fn utility_set(&self) -> Vec<Utility> {
        let theme = &self.config.theme;
        let mut set = Vec::new();

        for (class, value) in DISPLAY {
            set.push(Utility::new(*class, vec![("display", value.to_string())]));
        }
        for (class, property, value) in FLEX {
            set.push(Utility::new(*class, vec![(*property, value.to_string())]));
        }
        for n in 1..=GRID_COLUMNS {
            set.push(Utility::new(
                format!("grid-cols-{n}"),
                vec![("grid-template-columns", format!("repeat({n}, minmax(0, 1fr))"))],
            ));
        }
        for (prefix, properties) in SPACING {
            for (key, value) in &theme.spacing {
                let declarations = properties.iter().map(|p| (*p, value.clone())).collect();
                set.push(Utility::new(format!("{prefix}-{key}"), declarations));
            }
        }
        set.push(Utility::new(
            "mx-auto",
            vec![("margin-left", "auto".to_string()), ("margin-right", "auto".to_string())],
        ));
        for (key, value) in &theme.spacing {
            set.push(Utility::new(format!("gap-{key}"), vec![("gap", value.clone())]));
        }
        for (key, value) in &theme.spacing {
            set.push(Utility::new(format!("w-{key}"), vec![("width", value.clone())]));
        }
        for (key, width, _) in SIZES {
            set.push(Utility::new(format!("w-{key}"), vec![("width", width.to_string())]));
        }
        for (key, value) in FRACTIONS {
            set.push(Utility::new(format!("w-{key}"), vec![("width", value.to_string())]));
        }
        for (key, value) in &theme.spacing {
            set.push(Utility::new(format!("h-{key}"), vec![("height", value.clone())]));
        }
        for (key, _, height) in SIZES {
            set.push(Utility::new(format!("h-{key}"), vec![("height", height.to_string())]));
        }
        for align in TEXT_ALIGN {
            set.push(Utility::new(format!("text-{align}"), vec![("text-align", align.to_string())]));
        }
        for (key, value) in &theme.font_size {
            set.push(Utility::new(format!("text-{key}"), vec![("font-size", value.clone())]));
        }
        for (key, value) in &theme.font_weight {
            set.push(Utility::new(format!("font-{key}"), vec![("font-weight", value.clone())]));
        }
        for (key, value) in &theme.colors {
            set.push(Utility::new(format!("text-{key}"), vec![("color", value.clone())]));
            set.push(Utility::new(format!("bg-{key}"), vec![("background-color", value.clone())]));
            set.push(Utility::new(format!("border-{key}"), vec![("border-color", value.clone())]));
        }
        for (class, width) in BORDER_WIDTHS {
            set.push(Utility::new(*class, vec![("border-width", width.to_string())]));
        }
        for (class, radius) in ROUNDED {
            set.push(Utility::new(*class, vec![("border-radius", radius.to_string())]));
        }
        set
    }

    /// Every utility, every utility again per state variant, then once more
    /// per screen inside its media query.
    pub fn utilities(&self) -> String {
        let set = self.utility_set();
        let mut out = String::new();
        for utility in &set {
            utility.write_rule("", "", "", &mut out);
        }
        for state in STATE_VARIANTS {
            let variant = format!("{state}:");
            let pseudo = format!(":{state}");
            for utility in &set {
                utility.write_rule(&variant, &pseudo, "", &mut out);
            }
        }
        for (screen, width) in self.screens() {
            let variant = format!("{screen}:");
            let _ = writeln!(out, "@media (min-width: {width}) {{");
            for utility in &set {
                utility.write_rule(&variant, "", "  ", &mut out);
            }
            out.push_str("}\n");
        }
        out
    }

    /// Every class name the engine can generate, unescaped.
    pub fn class_names(&self) -> BTreeSet<String> {
        let set = self.utility_set();
        let mut names: BTreeSet<String> = set.iter().map(|u| u.class.clone()).collect();
        for state in STATE_VARIANTS {
            names.extend(set.iter().map(|u| format!("{state}:{}", u.class)));
        }
        for (screen, _) in self.screens() {
            names.extend(set.iter().map(|u| format!("{screen}:{}", u.class)));
        }
        names.insert("container".to_string());
        names
    }

    /// Replace each `@tailwind <layer>;` directive with the generated layer.
    pub fn expand_directives(&self, css: &str) -> Result<String, UtilityError> {
        if let Some(unknown) = DIRECTIVE
            .captures_iter(css)
            .map(|c| c[1].to_string())
            .find(|name| !DIRECTIVE_NAMES.contains(&name.as_str()))
        {
            return Err(UtilityError::UnknownDirective(unknown));
        }
        let expanded = DIRECTIVE.replace_all(css, |caps: &regex::Captures<'_>| match &caps[1] {
            "base" => self.base(),
            "components" => self.components(),
            _ => self.utilities(),
        });
        Ok(expanded.into_owned())
    }

    /// Files matched by the `content` globs, sorted.
    pub fn content_files(&self, root: &Path) -> Result<Vec<PathBuf>, UtilityError> {
        let base = glob::Pattern::escape(&root.to_string_lossy());
        let mut files = Vec::new();
        for pattern in &self.config.content {
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

    /// Class candidates found in the content files.
    pub fn used_candidates(&self, root: &Path) -> Result<HashSet<String>, UtilityError> {
        let mut used = HashSet::new();
        for file in self.content_files(root)? {
            let bytes = fs::read(&file)?;
            let text = String::from_utf8_lossy(&bytes);
            used.extend(candidates(&text).map(str::to_string));
        }
        Ok(used)
    }

    /// Utility-shaped names in content `class` attributes that the engine
    /// does not generate, such as an unknown family or variant.
    pub fn unsupported_classes(&self, root: &Path) -> Result<BTreeSet<String>, UtilityError> {
        let generated = self.class_names();
        let mut unsupported = BTreeSet::new();
        for file in self.content_files(root)? {
            let bytes = fs::read(&file)?;
            let text = String::from_utf8_lossy(&bytes);
            unsupported.extend(
                class_attribute_names(&text)
                    .filter(|name| !generated.contains(*name) && is_utility_shaped(name))
                    .map(str::to_string),
            );
        }
        Ok(unsupported)
    }

    /// Generated class names that no content file mentions.
    pub fn unused_classes(&self, root: &Path) -> Result<HashSet<String>, UtilityError> {
        let used = self.used_candidates(root)?;
        let unused: HashSet<String> = self
            .class_names()
            .into_iter()
            .filter(|name| !used.contains(name))
            .collect();
        debug!(used = used.len(), unused = unused.len(), "computed unused utility classes");
        Ok(unused)
    }
}

/// Returns a fully-commented stock `utilities.toml` matching the defaults.
///
/// Used by `gen-config --utilities`.
pub fn stock_utilities_toml() -> &'static str {
    r##"# sitepipe utility classes
# ========================
# Every table below is merged over the defaults shown, so adding a key adds
# a class. Arrays replace the default entirely.

# Files scanned for class names, relative to the project root. Generated
# classes that appear in none of them are dropped from the minified CSS.
content = ["site/**/*.njk"]

# Breakpoints. Each one adds a `<name>:` variant of every utility, applied
# from the given minimum width up.
[theme.screens]
sm = "640px"
md = "768px"
lg = "1024px"
xl = "1280px"

# The `.container` class: full width, capped at each screen's width.
[theme.container]
center = true

# Horizontal padding: `default` applies at every width, screen names override.
[theme.container.padding]
default = "0.75rem"
sm = "1rem"
lg = "2rem"

# p-*, px-*, py-*, pt-*, pr-*, pb-*, pl-*, the same for margin (m-*), gap-*,
# w-* and h-*.
[theme.spacing]
"0" = "0px"
"0.5" = "0.125rem"
"1" = "0.25rem"
"2" = "0.5rem"
"3" = "0.75rem"
"4" = "1rem"
"6" = "1.5rem"
"8" = "2rem"
"12" = "3rem"
"16" = "4rem"
px = "1px"

# text-*, bg-* and border-* for each color.
[theme.colors]
black = "#000000"
white = "#ffffff"
gray-100 = "#f3f4f6"
gray-500 = "#6b7280"
gray-900 = "#111827"
red-500 = "#ef4444"
green-500 = "#22c55e"
blue-500 = "#3b82f6"

# text-* font sizes.
[theme.font_size]
xs = "0.75rem"
sm = "0.875rem"
base = "1rem"
lg = "1.125rem"
xl = "1.25rem"
2xl = "1.5rem"
3xl = "1.875rem"

# font-* weights.
[theme.font_weight]
normal = "400"
medium = "500"
semibold = "600"
bold = "700"
"##
}
