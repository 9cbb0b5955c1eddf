use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;

// Private-use code points mark span boundaries between the substitution passes
const COLOR_OPEN: char = '\u{E000}';
const COLOR_SEP: char = '\u{E001}';
const COLOR_CLOSE: char = '\u{E002}';
const BOLD_OPEN: char = '\u{E003}';
const BOLD_CLOSE: char = '\u{E004}';
const ITALIC_OPEN: char = '\u{E005}';
const ITALIC_CLOSE: char = '\u{E006}';

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+):([^}]+)\}").expect("valid color regex"));

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));

static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic regex"));

/// A run of text sharing one style.
///
/// `color` is carried as metadata; renderers draw every colored span the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Span {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: false,
            italic: false,
            color: None,
        }
    }
}

/// Apply the color, bold and italic passes in that order and flatten the
/// result into styled runs. Overlapping spans split into adjacent runs.
pub fn parse(text: &str) -> Vec<Span> {
    let cleaned: String = text.chars().filter(|c| !is_marker(*c)).collect();

    let colored = COLOR_RE.replace_all(&cleaned, |caps: &Captures| {
        format!("{COLOR_OPEN}{}{COLOR_SEP}{}{COLOR_CLOSE}", &caps[1], &caps[2])
    });
    let bolded = BOLD_RE.replace_all(&colored, |caps: &Captures| {
        format!("{BOLD_OPEN}{}{BOLD_CLOSE}", &caps[1])
    });
    let marked = ITALIC_RE.replace_all(&bolded, |caps: &Captures| {
        format!("{ITALIC_OPEN}{}{ITALIC_CLOSE}", &caps[1])
    });

    flatten(&marked)
}

fn is_marker(c: char) -> bool {
    ('\u{E000}'..='\u{E006}').contains(&c)
}

fn flatten(marked: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut current = Span::plain("");
    let mut chars = marked.chars();

    while let Some(c) = chars.next() {
        if !is_marker(c) {
            current.text.push(c);
            continue;
        }

        if !current.text.is_empty() {
            let style = Span {
                text: String::new(),
                ..current.clone()
            };
            spans.push(std::mem::replace(&mut current, style));
        }

        match c {
            COLOR_OPEN => {
                let color: String = chars.by_ref().take_while(|c| *c != COLOR_SEP).collect();
                current.color = Some(color);
            }
            COLOR_CLOSE => current.color = None,
            BOLD_OPEN => current.bold = true,
            BOLD_CLOSE => current.bold = false,
            ITALIC_OPEN => current.italic = true,
            ITALIC_CLOSE => current.italic = false,
            _ => {}
        }
    }

    if !current.text.is_empty() {
        spans.push(current);
    }
    spans
}
