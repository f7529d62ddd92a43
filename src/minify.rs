//! Post-render HTML transform.
//!
//! Every rendered page passes through [`transform`] before it is written.
//! Pages whose destination ends in `.html` are minified with
//! [minify-html](https://docs.rs/minify-html): insignificant whitespace is
//! collapsed, comments are dropped and the doctype is shortened to
//! `<!doctype html>`. Any other destination is returned unchanged.
//!
//! Closing tags and the `<html>`/`<head>` opening tags are kept so the output
//! stays readable with view-source and diffable between builds.

use minify_html::{Cfg, minify};
use std::path::Path;

fn html_cfg() -> Cfg {
    let mut cfg = Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg
}

/// Whether a destination path is minified.
pub fn is_html_destination(output_path: &Path) -> bool {
    output_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}

/// Minify `content` if `output_path` is an HTML destination, otherwise return it as is.
pub fn transform(output_path: &Path, content: String) -> String {
    if !is_html_destination(output_path) {
        return content;
    }
    let minified = minify(content.as_bytes(), &html_cfg());
    String::from_utf8(minified).unwrap_or(content)
}
