//! Markdown filter.
//!
//! Converts Markdown to HTML with [pulldown-cmark](https://docs.rs/pulldown-cmark).
//! The same function backs the `markdown` template filter and the conversion
//! step for `.md` pages, so both produce identical output.
//!
//! Behaviour:
//!
//! - **Raw HTML passes through** untouched (no escaping of inline or block HTML).
//! - **Bare URLs are linked**: `http://`, `https://` and `www.` runs in plain
//!   text become anchors. Text already inside a link, image, raw `<a>` element
//!   or code is left alone.
//! - **Smart punctuation**: straight quotes become curly quotes, `--` and
//!   `---` become en and em dashes, `...` becomes an ellipsis.
//! - Tables and strikethrough are enabled.

use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream, html};
use regex::Regex;
use std::sync::LazyLock;

/// Bare URL in running text. Trailing sentence punctuation is not part of the link.
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:https?://|www\.)[^\s<>]*[^\s<>.,;:!?'")\]]"#)
        .expect("bare URL pattern is a valid regex")
});

/// Opening or closing raw `<a>` tag.
static ANCHOR_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(/?)a(?:\s[^>]*)?>").expect("anchor tag pattern is a valid regex")
});

/// Parser options used for every Markdown conversion.
pub fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options
}

/// Render Markdown to an HTML fragment.
pub fn render(markup: &str) -> String {
    let parser = TextMergeStream::new(Parser::new_ext(markup, options()));
    let events = linkify(parser);
    let mut out = String::with_capacity(markup.len() + markup.len() / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

fn linkify<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    // Links and images can't nest anchors; code spans arrive as Event::Code.
    let mut link_depth = 0usize;
    let mut html_anchor_depth = 0usize;
    let mut in_code_block = false;

    for event in events {
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => link_depth += 1,
            Event::End(TagEnd::Link | TagEnd::Image) => link_depth = link_depth.saturating_sub(1),
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Html(html) | Event::InlineHtml(html) => {
                html_anchor_depth = anchor_depth_after(html, html_anchor_depth);
            }
            _ => {}
        }
        match event {
            Event::Text(text) if link_depth == 0 && html_anchor_depth == 0 && !in_code_block => {
                push_linked_text(text, &mut out);
            }
            other => out.push(other),
        }
    }
    out
}

/// Raw `<a>` nesting depth after the tags in `html`.
fn anchor_depth_after(html: &str, mut depth: usize) -> usize {
    for tag in ANCHOR_TAG.captures_iter(html) {
        if tag[1].is_empty() {
            depth += 1;
        } else {
            depth = depth.saturating_sub(1);
        }
    }
    depth
}

fn push_linked_text<'a>(text: CowStr<'a>, out: &mut Vec<Event<'a>>) {
    if !BARE_URL.is_match(&text) {
        out.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for m in BARE_URL.find_iter(&text) {
        if m.start() > last {
            out.push(Event::Text(text[last..m.start()].to_string().into()));
        }
        let url = m.as_str();
        let href = if url.starts_with("www.") {
            format!("http://{url}")
        } else {
            url.to_string()
        };
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: href.into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(url.to_string().into()));
        out.push(Event::End(TagEnd::Link));
        last = m.end();
    }
    if last < text.len() {
        out.push(Event::Text(text[last..].to_string().into()));
    }
}
