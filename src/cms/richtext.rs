//! Rich text blocks and their plain-text / markup renderings
//!
//! Post bodies arrive from the content API as structured rich text. This
//! module is the only place that turns those blocks into plain text (for
//! word counting) or HTML (for the page body). All escaping of text content
//! happens here; downstream layers treat the produced markup as
//! pre-sanitized and inject it without re-escaping or re-parsing.

use serde::{Deserialize, Serialize};

use crate::helpers::html_escape;

/// A single rich text block as returned by the content API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RichTextBlock {
    /// Block kind: "paragraph", "heading1".."heading6", "list-item",
    /// "o-list-item", "preformatted" or "image".
    #[serde(rename = "type")]
    pub kind: String,

    /// Plain text content of the block.
    #[serde(default)]
    pub text: String,

    /// Inline formatting spans, as character offsets into `text`.
    #[serde(default)]
    pub spans: Vec<Span>,

    /// Image URL, present on "image" blocks.
    #[serde(default)]
    pub url: Option<String>,
}

/// An inline formatting span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,

    /// Span kind: "strong", "em" or "hyperlink".
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub data: Option<SpanData>,
}

/// Extra payload for spans that carry one (hyperlink targets).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub url: Option<String>,
}

/// Render blocks as plain text, block texts joined with a single space.
///
/// An empty slice yields the empty string.
pub fn as_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render blocks as HTML.
///
/// Consecutive list items are grouped under a single `<ul>` / `<ol>`.
pub fn as_html(blocks: &[RichTextBlock]) -> String {
    let mut out = String::new();
    // Currently open list wrapper, if any
    let mut open_list: Option<&str> = None;

    for block in blocks {
        let list_tag = match block.kind.as_str() {
            "list-item" => Some("ul"),
            "o-list-item" => Some("ol"),
            _ => None,
        };

        if open_list != list_tag {
            if let Some(tag) = open_list {
                out.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list_tag {
                out.push_str(&format!("<{}>", tag));
            }
            open_list = list_tag;
        }

        match block.kind.as_str() {
            "heading1" | "heading2" | "heading3" | "heading4" | "heading5" | "heading6" => {
                let level = &block.kind[7..8];
                out.push_str(&format!(
                    "<h{}>{}</h{}>",
                    level,
                    render_spans(&block.text, &block.spans),
                    level
                ));
            }
            "preformatted" => {
                out.push_str(&format!(
                    "<pre>{}</pre>",
                    render_spans(&block.text, &block.spans)
                ));
            }
            "image" => {
                let src = block.url.as_deref().unwrap_or("");
                out.push_str(&format!(
                    r#"<img src="{}" alt="{}">"#,
                    html_escape(src),
                    html_escape(&block.text)
                ));
            }
            "list-item" | "o-list-item" => {
                out.push_str(&format!(
                    "<li>{}</li>",
                    render_spans(&block.text, &block.spans)
                ));
            }
            // Unknown kinds render as paragraphs rather than dropping text
            _ => {
                out.push_str(&format!(
                    "<p>{}</p>",
                    render_spans(&block.text, &block.spans)
                ));
            }
        }
    }

    if let Some(tag) = open_list {
        out.push_str(&format!("</{}>", tag));
    }

    out
}

/// Apply inline spans to a block's text, escaping the text itself.
///
/// Span offsets are character positions. Spans ending at a position close
/// before spans opening at it, later-starting spans close first.
fn render_spans(text: &str, spans: &[Span]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for i in 0..=chars.len() {
        for span in spans.iter().rev() {
            if span.end == i {
                out.push_str(close_tag(span));
            }
        }
        for span in spans.iter() {
            if span.start == i {
                out.push_str(&open_tag(span));
            }
        }
        if i < chars.len() {
            match chars[i] {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                c => out.push(c),
            }
        }
    }

    out
}

fn open_tag(span: &Span) -> String {
    match span.kind.as_str() {
        "strong" => "<strong>".to_string(),
        "em" => "<em>".to_string(),
        "hyperlink" => {
            let url = span
                .data
                .as_ref()
                .and_then(|data| data.url.as_deref())
                .unwrap_or("");
            format!(r#"<a href="{}">"#, html_escape(url))
        }
        _ => String::new(),
    }
}

fn close_tag(span: &Span) -> &'static str {
    match span.kind.as_str() {
        "strong" => "</strong>",
        "em" => "</em>",
        "hyperlink" => "</a>",
        _ => "",
    }
}
