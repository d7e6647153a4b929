//! Font attribute and color types shared across the pipeline.

use std::fmt;

/// Font weight on the OpenType 100..=900 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Thin weight (100).
    pub const THIN: Self = Self(100);
    /// Ultra-light weight (200).
    pub const ULTRA_LIGHT: Self = Self(200);
    /// Light weight (300).
    pub const LIGHT: Self = Self(300);
    /// Normal/regular weight (400).
    pub const NORMAL: Self = Self(400);
    /// Medium weight (500).
    pub const MEDIUM: Self = Self(500);
    /// Semi-bold weight (600).
    pub const SEMI_BOLD: Self = Self(600);
    /// Bold weight (700).
    pub const BOLD: Self = Self(700);
    /// Ultra-bold weight (800).
    pub const ULTRA_BOLD: Self = Self(800);
    /// Heavy weight (900).
    pub const HEAVY: Self = Self(900);

    /// Create a font weight, clamped to 100..=900.
    pub fn new(weight: u16) -> Self {
        Self(weight.clamp(100, 900))
    }

    /// Get the numeric weight value.
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Parse a markup weight keyword (`"bold"`, `"light"`, ...) or a number.
    pub fn from_name(name: &str) -> Option<Self> {
        let weight = match name.trim().to_ascii_lowercase().as_str() {
            "thin" => Self::THIN,
            "ultralight" | "extralight" => Self::ULTRA_LIGHT,
            "light" => Self::LIGHT,
            "normal" | "regular" | "book" => Self::NORMAL,
            "medium" => Self::MEDIUM,
            "semibold" | "demibold" => Self::SEMI_BOLD,
            "bold" => Self::BOLD,
            "ultrabold" | "extrabold" => Self::ULTRA_BOLD,
            "heavy" | "black" | "ultraheavy" => Self::HEAVY,
            other => return other.parse::<u16>().ok().map(Self::new),
        };
        Some(weight)
    }

    pub(crate) fn to_fontdb(self) -> fontdb::Weight {
        fontdb::Weight(self.0)
    }

    pub(crate) fn from_fontdb(weight: fontdb::Weight) -> Self {
        Self(weight.0)
    }

    pub(crate) fn to_cosmic(self) -> cosmic_text::Weight {
        cosmic_text::Weight(self.0)
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Normal,
    /// Designed italic glyphs.
    Italic,
    /// Slanted upright glyphs.
    Oblique,
}

impl FontStyle {
    /// Parse a markup style keyword.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(FontStyle::Normal),
            "italic" => Some(FontStyle::Italic),
            "oblique" => Some(FontStyle::Oblique),
            _ => None,
        }
    }

    /// Whether this style is slanted in any way.
    pub fn is_slanted(self) -> bool {
        !matches!(self, FontStyle::Normal)
    }

    pub(crate) fn to_fontdb(self) -> fontdb::Style {
        match self {
            FontStyle::Normal => fontdb::Style::Normal,
            FontStyle::Italic => fontdb::Style::Italic,
            FontStyle::Oblique => fontdb::Style::Oblique,
        }
    }

    pub(crate) fn from_fontdb(style: fontdb::Style) -> Self {
        match style {
            fontdb::Style::Normal => FontStyle::Normal,
            fontdb::Style::Italic => FontStyle::Italic,
            fontdb::Style::Oblique => FontStyle::Oblique,
        }
    }

    pub(crate) fn to_cosmic(self) -> cosmic_text::Style {
        match self {
            FontStyle::Normal => cosmic_text::Style::Normal,
            FontStyle::Italic => cosmic_text::Style::Italic,
            FontStyle::Oblique => cosmic_text::Style::Oblique,
        }
    }
}

/// Font width, from ultra-condensed to ultra-expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStretch {
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    #[default]
    Normal,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
    UltraExpanded,
}

impl FontStretch {
    pub(crate) fn to_fontdb(self) -> fontdb::Stretch {
        match self {
            FontStretch::UltraCondensed => fontdb::Stretch::UltraCondensed,
            FontStretch::ExtraCondensed => fontdb::Stretch::ExtraCondensed,
            FontStretch::Condensed => fontdb::Stretch::Condensed,
            FontStretch::SemiCondensed => fontdb::Stretch::SemiCondensed,
            FontStretch::Normal => fontdb::Stretch::Normal,
            FontStretch::SemiExpanded => fontdb::Stretch::SemiExpanded,
            FontStretch::Expanded => fontdb::Stretch::Expanded,
            FontStretch::ExtraExpanded => fontdb::Stretch::ExtraExpanded,
            FontStretch::UltraExpanded => fontdb::Stretch::UltraExpanded,
        }
    }

    pub(crate) fn from_fontdb(stretch: fontdb::Stretch) -> Self {
        match stretch {
            fontdb::Stretch::UltraCondensed => FontStretch::UltraCondensed,
            fontdb::Stretch::ExtraCondensed => FontStretch::ExtraCondensed,
            fontdb::Stretch::Condensed => FontStretch::Condensed,
            fontdb::Stretch::SemiCondensed => FontStretch::SemiCondensed,
            fontdb::Stretch::Normal => FontStretch::Normal,
            fontdb::Stretch::SemiExpanded => FontStretch::SemiExpanded,
            fontdb::Stretch::Expanded => FontStretch::Expanded,
            fontdb::Stretch::ExtraExpanded => FontStretch::ExtraExpanded,
            fontdb::Stretch::UltraExpanded => FontStretch::UltraExpanded,
        }
    }

    pub(crate) fn to_cosmic(self) -> cosmic_text::Stretch {
        // cosmic-text re-exports fontdb's stretch type
        self.to_fontdb()
    }
}

/// Capitalization variant of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontVariant {
    #[default]
    Normal,
    SmallCaps,
}

/// A font family, either named or generic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    /// A specific family name, e.g. "DejaVu Sans".
    Name(String),
    Serif,
    #[default]
    SansSerif,
    Monospace,
}

impl FontFamily {
    /// Create a named family.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub(crate) fn to_fontdb(&self) -> fontdb::Family<'_> {
        match self {
            FontFamily::Name(name) => fontdb::Family::Name(name.as_str()),
            FontFamily::Serif => fontdb::Family::Serif,
            FontFamily::SansSerif => fontdb::Family::SansSerif,
            FontFamily::Monospace => fontdb::Family::Monospace,
        }
    }

    pub(crate) fn to_cosmic(&self) -> cosmic_text::Family<'_> {
        self.to_fontdb()
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFamily::Name(name) => write!(f, "{}", name),
            FontFamily::Serif => write!(f, "serif"),
            FontFamily::SansSerif => write!(f, "sans-serif"),
            FontFamily::Monospace => write!(f, "monospace"),
        }
    }
}

/// Vertical font metrics in font units, read from the face tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: u16,
    /// Distance from baseline to the top of the tallest glyph (positive).
    pub ascent: i16,
    /// Distance from baseline to the bottom of the lowest glyph (negative).
    pub descent: i16,
    pub line_gap: i16,
}

impl FontMetrics {
    /// Natural line pitch in font units.
    pub fn line_height(&self) -> i32 {
        self.ascent as i32 - self.descent as i32 + self.line_gap as i32
    }

    /// Scale a font-unit value to pixels at the given size.
    pub fn scale_to_pixels(&self, font_units: i32, font_size: f32) -> f32 {
        if self.units_per_em == 0 {
            return 0.0;
        }
        font_units as f32 * font_size / self.units_per_em as f32
    }

    pub fn ascent_px(&self, font_size: f32) -> f32 {
        self.scale_to_pixels(self.ascent as i32, font_size)
    }

    /// Descent in pixels as a positive distance below the baseline.
    pub fn descent_px(&self, font_size: f32) -> f32 {
        -self.scale_to_pixels(self.descent as i32, font_size)
    }

    pub fn line_height_px(&self, font_size: f32) -> f32 {
        self.scale_to_pixels(self.line_height(), font_size)
    }
}

/// Criteria for matching a face in the font database.
#[derive(Debug, Clone, Default)]
pub struct FontQuery {
    pub families: Vec<FontFamily>,
    pub weight: FontWeight,
    pub style: FontStyle,
    pub stretch: FontStretch,
}

impl FontQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a family at the front of the search list.
    pub fn family(mut self, family: FontFamily) -> Self {
        self.families.insert(0, family);
        self
    }

    /// Append a fallback family.
    pub fn fallback(mut self, family: FontFamily) -> Self {
        self.families.push(family);
        self
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn stretch(mut self, stretch: FontStretch) -> Self {
        self.stretch = stretch;
        self
    }
}

/// Text color as four normalized channels (straight alpha).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f64 / 255.0,
            g as f64 / 255.0,
            b as f64 / 255.0,
            a as f64 / 255.0,
        )
    }

    /// Quantize to 8-bit channels, clamping out-of-range values.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub(crate) fn to_cosmic(self) -> cosmic_text::Color {
        let [r, g, b, a] = self.to_rgba8();
        cosmic_text::Color::rgba(r, g, b, a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
