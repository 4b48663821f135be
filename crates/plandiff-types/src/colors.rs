//! Color markers embedded in rendered output.
//!
//! The rendering core never emits terminal escape codes. It interleaves
//! textual markers such as `<{%fg 2%}>` and `<{%reset%}>` with the text, and
//! a downstream consumer either resolves them to styles or strips them.

use std::fmt;

/// Marker that ends the current color run.
pub const RESET: &str = "<{%reset%}>";

const MARKER_OPEN: &str = "<{%";
const MARKER_CLOSE: &str = "%}>";

/// Foreground colors used by step operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Magenta,
    BrightBlack,
    BrightRed,
    BrightGreen,
}

impl Color {
    /// The marker that starts a run in this color.
    pub const fn marker(self) -> &'static str {
        match self {
            Color::Red => "<{%fg 1%}>",
            Color::Green => "<{%fg 2%}>",
            Color::Yellow => "<{%fg 3%}>",
            Color::Magenta => "<{%fg 5%}>",
            Color::BrightBlack => "<{%fg 8%}>",
            Color::BrightRed => "<{%fg 9%}>",
            Color::BrightGreen => "<{%fg 10%}>",
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Color::Red),
            2 => Some(Color::Green),
            3 => Some(Color::Yellow),
            5 => Some(Color::Magenta),
            8 => Some(Color::BrightBlack),
            9 => Some(Color::BrightRed),
            10 => Some(Color::BrightGreen),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// A run of text and the color active over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span<'a> {
    pub color: Option<Color>,
    pub text: &'a str,
}

/// Split marked-up text into colored spans.
///
/// Only recognized markers are consumed. Anything else that looks like a
/// marker, closed or not, is kept verbatim as part of the surrounding text.
pub fn spans(marked: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut color = None;
    let mut run_start = 0;
    let mut cursor = 0;

    while let Some(found) = marked[cursor..].find(MARKER_OPEN) {
        let open = cursor + found;
        let tag_start = open + MARKER_OPEN.len();
        let Some(tag_len) = marked[tag_start..].find(MARKER_CLOSE) else {
            break;
        };
        let tag_end = tag_start + tag_len;

        match parse_tag(&marked[tag_start..tag_end]) {
            Some(next) => {
                if open > run_start {
                    spans.push(Span {
                        color,
                        text: &marked[run_start..open],
                    });
                }
                color = next;
                run_start = tag_end + MARKER_CLOSE.len();
                cursor = run_start;
            }
            // Not ours: rescan from just past the opener.
            None => cursor = tag_start,
        }
    }

    if run_start < marked.len() {
        spans.push(Span {
            color,
            text: &marked[run_start..],
        });
    }
    spans
}

/// `Some(new_color)` for recognized tags, `None` for unknown ones.
fn parse_tag(tag: &str) -> Option<Option<Color>> {
    if tag == "reset" {
        return Some(None);
    }
    let code = tag.strip_prefix("fg ")?.trim().parse().ok()?;
    Color::from_code(code).map(Some)
}

/// Remove every marker, leaving plain text.
pub fn strip(marked: &str) -> String {
    spans(marked).into_iter().map(|s| s.text).collect()
}
