//! Message text rendering.
//!
//! Chat text is plain text with two light conventions: bare `http(s)://` URLs
//! become links and `**text**` becomes bold. Text is parsed into typed inline
//! nodes that components render directly; [`to_html`] serialises the same nodes
//! for contexts that need a markup string.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"'*]+"#).expect("url pattern compiles"));

// No nested asterisks; may span lines.
static BOLD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(Vec<Inline>),
    Link(String),
    LineBreak,
}

/// Split message text into inline nodes.
///
/// Bold spans are found on the raw text first, so links and line breaks can
/// sit inside them.
pub fn parse_message(text: &str) -> Vec<Inline> {
    let text = text.replace("\r\n", "\n");
    let mut nodes = Vec::new();
    let mut cursor = 0;
    for caps in BOLD_PATTERN.captures_iter(&text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        parse_plain(&text[cursor..whole.start()], &mut nodes);
        let mut children = Vec::new();
        parse_plain(inner.as_str(), &mut children);
        nodes.push(Inline::Bold(children));
        cursor = whole.end();
    }
    parse_plain(&text[cursor..], &mut nodes);
    nodes
}

fn parse_plain(segment: &str, nodes: &mut Vec<Inline>) {
    for (index, line) in segment.split('\n').enumerate() {
        if index > 0 {
            nodes.push(Inline::LineBreak);
        }
        parse_links(line, nodes);
    }
}

fn parse_links(line: &str, nodes: &mut Vec<Inline>) {
    let mut cursor = 0;
    for url in URL_PATTERN.find_iter(line) {
        push_text(&line[cursor..url.start()], nodes);
        nodes.push(Inline::Link(url.as_str().to_string()));
        cursor = url.end();
    }
    push_text(&line[cursor..], nodes);
}

fn push_text(text: &str, nodes: &mut Vec<Inline>) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(previous)) = nodes.last_mut() {
        previous.push_str(text);
    } else {
        nodes.push(Inline::Text(text.to_string()));
    }
}

/// Serialise inline nodes to HTML. Every piece of message text is escaped
/// exactly once.
pub fn to_html(nodes: &[Inline]) -> String {
    let mut html = String::new();
    write_html(nodes, &mut html);
    html
}

fn write_html(nodes: &[Inline], html: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(text) => html.push_str(&escape_html(text)),
            Inline::Bold(children) => {
                html.push_str("<strong>");
                write_html(children, html);
                html.push_str("</strong>");
            }
            Inline::Link(url) => {
                let url = escape_html(url);
                html.push_str(&format!(
                    r#"<a href="{url}" target="_blank" rel="noopener noreferrer">{url}</a>"#
                ));
            }
            Inline::LineBreak => html.push_str("<br>"),
        }
    }
}

pub fn render_html(text: &str) -> String {
    to_html(&parse_message(text))
}

/// Escape HTML special characters
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}
