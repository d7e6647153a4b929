//! Base text direction handling.
//!
//! A layout either takes its paragraph direction from an explicit request or
//! detects it from content using the first-strong rule of the Unicode
//! Bidirectional Algorithm (UAX #9, rules P2/P3).
//!
//! # Example
//!
//! ```
//! use glyphpress_render::text::{TextDirection, detect_base_direction};
//!
//! assert_eq!(detect_base_direction("Hello, World!"), TextDirection::LeftToRight);
//! assert_eq!(detect_base_direction("مرحبا بالعالم"), TextDirection::RightToLeft);
//! assert_eq!(TextDirection::Auto.resolve("שלום"), TextDirection::RightToLeft);
//! ```

use unicode_bidi::{BidiClass, bidi_class};

/// Text direction for layout and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    /// Left-to-right direction (Latin, Cyrillic, Greek, CJK, ...).
    LeftToRight,
    /// Right-to-left direction (Arabic, Hebrew, ...).
    RightToLeft,
    /// Detect the direction from the first strong character of the text.
    #[default]
    Auto,
}

impl TextDirection {
    pub fn is_ltr(self) -> bool {
        matches!(self, TextDirection::LeftToRight)
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, TextDirection::RightToLeft)
    }

    pub fn is_auto(self) -> bool {
        matches!(self, TextDirection::Auto)
    }

    /// Resolve auto direction to a concrete direction based on text content.
    ///
    /// Explicit directions are returned unchanged.
    pub fn resolve(self, text: &str) -> TextDirection {
        match self {
            TextDirection::Auto => detect_base_direction(text),
            dir => dir,
        }
    }

    /// Concrete direction from a paragraph's right-to-left flag.
    pub fn from_rtl(rtl: bool) -> Self {
        if rtl {
            TextDirection::RightToLeft
        } else {
            TextDirection::LeftToRight
        }
    }

    /// The invisible mark that forces this paragraph direction, if any.
    ///
    /// A strong mark placed first in a paragraph decides the first-strong
    /// detection without producing visible ink.
    pub fn paragraph_mark(self) -> Option<char> {
        match self {
            TextDirection::LeftToRight => Some(marks::LRM),
            TextDirection::RightToLeft => Some(marks::RLM),
            TextDirection::Auto => None,
        }
    }
}

/// Detect the base direction of text.
///
/// Returns `RightToLeft` if the first strong character is R or AL, and
/// `LeftToRight` otherwise (including text without strong characters).
pub fn detect_base_direction(text: &str) -> TextDirection {
    for c in text.chars() {
        match bidi_class(c) {
            BidiClass::L => return TextDirection::LeftToRight,
            BidiClass::R | BidiClass::AL => return TextDirection::RightToLeft,
            _ => continue,
        }
    }

    TextDirection::LeftToRight
}

/// Check if a character is a strong RTL character.
pub fn is_rtl_char(c: char) -> bool {
    matches!(bidi_class(c), BidiClass::R | BidiClass::AL)
}

/// Check if text contains any RTL characters.
pub fn contains_rtl(text: &str) -> bool {
    text.chars().any(is_rtl_char)
}

/// Zero-width directional marks.
pub mod marks {
    /// Left-to-Right Mark (U+200E)
    pub const LRM: char = '\u{200E}';
    /// Right-to-Left Mark (U+200F)
    pub const RLM: char = '\u{200F}';

    /// Check if `s` consists of exactly one directional mark.
    pub fn is_mark(s: &str) -> bool {
        s == "\u{200E}" || s == "\u{200F}"
    }
}
