//! Horizontal and vertical text layout.
//!
//! Vertical text is rendered by stacking one glyph per display line. The
//! logical text (what the user typed) is kept separately so switching back
//! to horizontal restores it exactly, line breaks included.
//!
//! ```text
//! logical        display (vertical)
//! "AB\nC"   ->   "A\nB\n\nC"
//! ```
//!
//! A logical line break becomes an empty display line.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minimum width of a vertical text column.
const MIN_VERTICAL_WIDTH: f32 = 20.0;

/// Column width relative to font size for vertical text.
const VERTICAL_WIDTH_FACTOR: f32 = 1.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Horizontal,
    Vertical,
}

/// Normalize CRLF and lone CR to LF.
pub fn normalize_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Stack every character on its own line.
pub fn to_vertical_stack(logical: &str) -> String {
    normalize_breaks(logical)
        .chars()
        .map(|c| if c == '\n' { String::new() } else { c.to_string() })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recover logical text from a vertical stack.
///
/// Each non-empty line contributes its first character and each empty line
/// contributes a line break, so edits that put several characters on one
/// display line keep only the first. An empty stack is empty text.
pub fn from_vertical_stack(display: &str) -> String {
    if display.is_empty() {
        return String::new();
    }
    normalize_breaks(display)
        .split('\n')
        .map(|line| match line.chars().next() {
            Some(c) => c,
            None => '\n',
        })
        .collect()
}

/// Width of a vertical text column for the given font size.
pub fn vertical_width(font_size: f32) -> f32 {
    (font_size * VERTICAL_WIDTH_FACTOR).round().max(MIN_VERTICAL_WIDTH)
}
