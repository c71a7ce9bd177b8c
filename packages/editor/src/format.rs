//! # Text Formats
//!
//! Appended text is plain, HTML, or lightweight markup. Markup is rendered
//! to an HTML fragment before it is sent, so the server only ever sees
//! plain text or HTML.
//!
//! ## Markup
//!
//! Blocks are separated by blank lines.
//!
//! ```text
//! h1. Heading            → <h1>Heading</h1>
//! bq. Quote              → <blockquote>Quote</blockquote>
//! * item                 → <ul><li>item</li></ul>
//! # item                 → <ol><li>item</li></ol>
//! anything else          → <p>…</p>, single newlines become <br />
//! ```
//!
//! Inline: `*strong*`, `_emphasis_`, `@code@`, `"label":http://link`.

use crate::EditorError;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
    /// Lightweight markup, rendered to HTML before sending
    Markup,
}

impl FromStr for TextFormat {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(TextFormat::Plain),
            "html" => Ok(TextFormat::Html),
            "markup" | "textile" => Ok(TextFormat::Markup),
            other => Err(EditorError::InvalidFormat(other.to_string())),
        }
    }
}

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]*>").unwrap());
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^h([1-6])\.\s+").unwrap());
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)":(https?://[^\s<]+)"#).unwrap());
static STRONG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*\s][^*]*)\*").unwrap());
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b_([^_]+)_\b").unwrap());
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@([^@\s][^@]*)@").unwrap());

/// Plain text the server derives from an HTML fragment
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn inline(text: &str) -> String {
    let text = escape(text);
    let text = LINK.replace_all(&text, r#"<a href="$2">$1</a>"#);
    let text = STRONG.replace_all(&text, "<strong>$1</strong>");
    let text = EMPHASIS.replace_all(&text, "<em>$1</em>");
    CODE.replace_all(&text, "<code>$1</code>").into_owned()
}

fn list(lines: &[&str], marker: &str, tag: &str) -> Option<String> {
    let items = lines
        .iter()
        .map(|line| line.strip_prefix(marker).map(|item| format!("<li>{}</li>", inline(item.trim()))))
        .collect::<Option<Vec<_>>>()?;
    Some(format!("<{tag}>{}</{tag}>", items.join("")))
}

fn block(block: &str) -> String {
    let lines: Vec<&str> = block.lines().map(str::trim_end).collect();

    if let Some(caps) = HEADING.captures(block) {
        let level = &caps[1];
        let body = &block[caps[0].len()..];
        return format!("<h{level}>{}</h{level}>", inline(body.trim()));
    }
    if let Some(body) = block.strip_prefix("bq. ") {
        return format!("<blockquote>{}</blockquote>", inline(body.trim()));
    }
    if let Some(html) = list(&lines, "* ", "ul") {
        return html;
    }
    if let Some(html) = list(&lines, "# ", "ol") {
        return html;
    }

    let body: Vec<String> = lines.iter().map(|line| inline(line)).collect();
    format!("<p>{}</p>", body.join("<br />"))
}

/// Render markup to an HTML fragment
pub fn markup_to_html(markup: &str) -> String {
    let normalized = markup.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(block)
        .collect::<Vec<_>>()
        .join("")
}
