use super::{Block, Span};
use std::fmt::Write as _;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_spans(out: &mut String, spans: &[Span]) {
    for span in spans {
        let mut text = escape(&span.text);
        if span.italic {
            text = format!("<em>{text}</em>");
        }
        if span.bold {
            text = format!("<strong>{text}</strong>");
        }
        // Every color renders as the same accent
        if span.color.is_some() {
            text = format!("<span class=\"accent\">{text}</span>");
        }
        out.push_str(&text);
    }
}

/// Render blocks as an HTML fragment, one element per line
pub fn to_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Spacer => out.push_str("<div class=\"spacer\"></div>"),
            Block::Highlight { color, content } => {
                let _ = write!(
                    out,
                    "<div class=\"highlight\" data-color=\"{}\">",
                    escape(color)
                );
                push_spans(&mut out, content);
                out.push_str("</div>");
            }
            Block::SubHeading { text } => {
                let _ = write!(out, "<h4>{}</h4>", escape(text));
            }
            Block::Heading { text } => {
                let _ = write!(out, "<h3>{}</h3>", escape(text));
            }
            Block::Bullet { content } => {
                out.push_str("<div class=\"bullet\">");
                push_spans(&mut out, content);
                out.push_str("</div>");
            }
            Block::Numbered { label, content } => {
                let _ = write!(
                    out,
                    "<div class=\"numbered\"><span class=\"label\">{}</span>",
                    escape(label)
                );
                push_spans(&mut out, content);
                out.push_str("</div>");
            }
            Block::Paragraph { content } => {
                out.push_str("<p>");
                push_spans(&mut out, content);
                out.push_str("</p>");
            }
        }
        out.push('\n');
    }
    out
}
