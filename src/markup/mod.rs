//! Renderer for the small markdown-like syntax used in speaker bios.
//!
//! Each line maps to one [`Block`]. There is no escaping: `{`, `*` and
//! `[block:` always start markup.

pub mod html;
mod inline;

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub use html::to_html;
pub use inline::Span;

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[block:([A-Za-z0-9_]+):(.+)\]$").expect("valid block regex")
});

static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.\s(.+)$").expect("valid numbered regex"));

/// One rendered line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Spacer,
    Highlight { color: String, content: Vec<Span> },
    /// `### text`, not inline-processed
    SubHeading { text: String },
    /// `## text`, not inline-processed
    Heading { text: String },
    Bullet { content: Vec<Span> },
    Numbered { label: String, content: Vec<Span> },
    Paragraph { content: Vec<Span> },
}

/// Render `text` into one block per line
pub fn render(text: &str) -> Vec<Block> {
    text.split('\n').map(|line| render_line(line.trim())).collect()
}

fn render_line(line: &str) -> Block {
    if line.is_empty() {
        return Block::Spacer;
    }

    if let Some(caps) = BLOCK_RE.captures(line) {
        return Block::Highlight {
            color: caps[1].to_string(),
            content: inline::parse(&caps[2]),
        };
    }

    if let Some(text) = line.strip_prefix("### ") {
        return Block::SubHeading {
            text: text.to_string(),
        };
    }

    if let Some(text) = line.strip_prefix("## ") {
        return Block::Heading {
            text: text.to_string(),
        };
    }

    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Block::Bullet {
            content: inline::parse(rest),
        };
    }

    if let Some(caps) = NUMBERED_RE.captures(line) {
        return Block::Numbered {
            label: caps[1].to_string(),
            content: inline::parse(&caps[2]),
        };
    }

    Block::Paragraph {
        content: inline::parse(line),
    }
}
