//! # sitepipe
//!
//! A static site builder with an asset pipeline. A project directory holds
//! content pages, shared layouts, data files, one CSS entry point and a
//! handful of scripts; sitepipe turns them into a deployable `dist/`.
//!
//! # Architecture: Two Tracks, One Trigger
//!
//! ```text
//! content   site/**/*.{md,njk} ─ front matter ─ templates ─ markdown ─ layouts ─ minify ─→ dist/**/index.html
//! static    site/{images,fonts}/** ─────────────────────────────────────────────────────→ dist/{images,fonts}/**
//! css       site/css/main.css ─ @import ─ @tailwind ─ lower ─→ dist/css/main.css ─ purge + minify ─→ main.min.css
//! js        site/js/*.js ─ downlevel ─ concatenate ─→ dist/js/main.js ─ minify ─→ main.min.js
//! ```
//!
//! The tracks share nothing but the trigger. Each stage is a [`tasks::Task`];
//! an ordered slice of tasks is a sequence. `build` runs the production
//! sequence once and stops at the first failure. `dev` runs the development
//! sequence and then [`watch`]es the project, re-running whichever tasks a
//! changed file maps to.
//!
//! Every task is synchronous and returns only once its files are written, so
//! a later task always reads the finished output of an earlier one.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `sitepipe.toml` loading: stock defaults, layered merge, validation |
//! | [`project`] | Project root + config, resolves every configured path |
//! | [`paths`] | Pure output-path mapping: pretty URLs, `.min` suffix, rebasing |
//! | [`types`] | Source file kinds by extension |
//! | [`frontmatter`] | YAML front matter split and typed accessors |
//! | [`markdown`] | Markdown to HTML, also registered as the `markdown` filter |
//! | [`minify`] | Post-render HTML minification |
//! | [`templates`] | minijinja environment, layout aliases and layout chains |
//! | [`scan`] | Finds pages and data files under the input root |
//! | [`render`] | Renders every page in parallel and writes the HTML |
//! | [`passthrough`] | Copies static directories verbatim |
//! | [`utilities`] | Utility-class engine behind the `@tailwind` directives |
//! | [`css`] | CSS compile and minify stages on lightningcss |
//! | [`js`] | JS downlevel, concatenate and minify stages |
//! | [`tasks`] | Tasks, the dev/build sequences and failure notifications |
//! | [`watch`] | Path-pattern rules and the notify-driven watch loop |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Glue Over Reimplementation
//!
//! Markdown, templating, script lowering, HTML/CSS/JS minification and file
//! watching are delegated to established crates. The code here is
//! configuration, sequencing and the seams between them.
//!
//! ## Page Failures Are Local
//!
//! A broken template or bad front matter fails that page only; the others
//! still render and the content task reports every failure at once. A
//! malformed data file fails the whole task since every page reads it.
//!
//! ## Purge Only In Production
//!
//! The compiled stylesheet carries every generated utility so a new class in
//! a template works without a rebuild. The minified stylesheet drops every
//! generated class that no content file mentions.

pub mod config;
pub mod css;
pub mod frontmatter;
pub mod js;
pub mod markdown;
pub mod minify;
pub mod output;
pub mod passthrough;
pub mod paths;
pub mod project;
pub mod render;
pub mod scan;
pub mod tasks;
pub mod templates;
pub mod types;
pub mod utilities;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_helpers;
