//! Shaped text layout and its measured extents.
//!
//! A [`TextLayout`] shapes styled spans with cosmic-text under optional
//! width/height constraints and records two rectangles, both in layout
//! space (origin at the top-left of the first line, y grows downwards):
//!
//! - the *logical* rectangle, the space reserved by line boxes and advances
//! - the *ink* rectangle, the union of the painted glyph outlines
//!
//! Glyphs with overhang (italics, diacritics, swashes) make the ink
//! rectangle extend past the logical one; automatic padding is derived from
//! that difference.

use std::collections::HashMap;

use cosmic_text::{Align, Attrs, Buffer, CacheKeyFlags, Metrics, Shaping, Wrap};
use fontdb::ID as FontFaceId;
use tracing::trace;

use crate::error::{RenderError, RenderResult};

use super::bidi::{TextDirection, detect_base_direction, marks};
use super::font::FontDescriptor;
use super::font_system::{FaceGlyphBoxes, FontSystem};
use super::markup::{Markup, MarkupSpan};
use super::types::{Color, FontFamily, FontStyle};

/// Horizontal skew of synthesized italics (tan 14°).
pub(crate) const FAKE_ITALIC_SKEW: f32 = 0.249;

/// Horizontal text alignment, relative to the reading direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlign {
    /// Leading edge: left for LTR text, right for RTL text.
    #[default]
    Start,
    Center,
    /// Trailing edge: right for LTR text, left for RTL text.
    End,
}

/// Vertical text alignment within a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Per-axis sizing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    /// Constrain content to the box on this axis.
    #[default]
    Wrap,
    /// Let content size the box on this axis.
    Expand,
}

impl WrapMode {
    pub fn is_wrap(self) -> bool {
        matches!(self, WrapMode::Wrap)
    }
}

/// An axis-aligned rectangle in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from its edges.
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Size limits for shaping.
///
/// Only the width shapes text. Every line is kept regardless of height;
/// a box height clamps the render size instead.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Constraints {
    /// Wrapping width in pixels; `None` disables wrapping.
    pub width: Option<f32>,
}

impl Constraints {
    pub const UNCONSTRAINED: Self = Self { width: None };

    pub fn new(width: Option<f32>) -> Self {
        // A non-positive width would wrap every glyph onto its own line.
        Self {
            width: width.map(|w| w.max(1.0)),
        }
    }
}

/// Font and paragraph settings for shaping one layout.
#[derive(Debug, Clone)]
pub struct LayoutStyle {
    pub descriptor: FontDescriptor,
    /// Base font size in points.
    pub points: f32,
    /// Pixels per point.
    pub scale: f32,
    /// Line pitch in pixels at the base size.
    pub line_height: f32,
    /// Whether the line pitch is fixed rather than proportional to span size.
    pub fixed_line_height: bool,
    pub color: Color,
    pub horizontal_align: HorizontalAlign,
    pub justify: bool,
    /// Requested direction; explicit values force every paragraph.
    pub direction: TextDirection,
}

impl LayoutStyle {
    /// Base font size in pixels.
    pub fn pixel_size(&self) -> f32 {
        self.points * self.scale
    }

    fn metrics_for(&self, points: f32) -> Metrics {
        let font_size = points * self.scale;
        let line_height = if self.fixed_line_height {
            self.line_height
        } else {
            self.line_height * font_size / self.pixel_size()
        };
        Metrics::new(font_size, line_height.max(1.0))
    }

    fn align(&self) -> Option<Align> {
        if self.justify {
            return Some(Align::Justified);
        }
        match self.horizontal_align {
            // Natural alignment follows each paragraph's direction.
            HorizontalAlign::Start => None,
            HorizontalAlign::Center => Some(Align::Center),
            HorizontalAlign::End => Some(Align::End),
        }
    }
}

/// Vertical band and horizontal extent of one visual line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBand {
    /// Index of the paragraph this line belongs to.
    pub paragraph: usize,
    pub top: f32,
    pub height: f32,
    pub baseline: f32,
    pub rtl: bool,
    /// Horizontal extent of the line's glyphs, `None` for an empty line.
    pub extent: Option<(f32, f32)>,
}

impl LineBand {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Whether `y` lies inside this band.
    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.top && y < self.bottom()
    }
}

/// Shaped text with its logical and ink extents.
pub struct TextLayout {
    buffer: Buffer,
    spans: Vec<MarkupSpan>,
    text: String,
    color: Color,
    width_constraint: Option<f32>,
    direction: TextDirection,
    forced_direction: bool,
    lines: Vec<LineBand>,
    logical: Rect,
    ink: Rect,
}

impl TextLayout {
    /// Shape `content` with `style` under `constraints`.
    ///
    /// Wrapping is word-based with a per-glyph fallback when a width is
    /// given, and disabled otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NoFontsAvailable`] when non-empty text is
    /// shaped against an empty font database.
    pub fn shape(
        font_system: &mut FontSystem,
        content: &Markup,
        style: &LayoutStyle,
        constraints: Constraints,
    ) -> RenderResult<Self> {
        let text = content.plain_text();
        if !text.is_empty() && font_system.face_count() == 0 {
            return Err(RenderError::NoFontsAvailable);
        }

        let base_metrics = style.metrics_for(style.points);
        let mut buffer = Buffer::new(font_system.inner_mut(), base_metrics);
        let wrap = if constraints.width.is_some() {
            Wrap::WordOrGlyph
        } else {
            Wrap::None
        };
        buffer.set_wrap(font_system.inner_mut(), wrap);
        buffer.set_size(font_system.inner_mut(), constraints.width, None);

        let spans = content.spans().to_vec();
        let families: Vec<Option<FontFamily>> = spans
            .iter()
            .map(|span| span.style.family.as_deref().map(parse_family))
            .collect();

        let base_attrs = style
            .descriptor
            .to_attrs()
            .color(style.color.to_cosmic())
            .metadata(usize::MAX);

        let mark = style
            .direction
            .paragraph_mark()
            .filter(|_| !text.is_empty())
            .map(|m| m.to_string());
        let mut rich: Vec<(&str, Attrs<'_>)> = Vec::new();
        if let Some(mark) = mark.as_deref() {
            rich.push((mark, base_attrs));
        }
        for (index, span) in spans.iter().enumerate() {
            let attrs = span_attrs(font_system, style, base_attrs, span, index, &families[index]);
            for piece in span.text.split_inclusive(['\n', '\u{2029}']) {
                rich.push((piece, attrs));
                if let Some(mark) = mark.as_deref()
                    && piece.ends_with(['\n', '\u{2029}'])
                {
                    rich.push((mark, base_attrs));
                }
            }
        }

        buffer.set_rich_text(font_system.inner_mut(), rich, base_attrs, Shaping::Advanced);
        let align = style.align();
        for line in buffer.lines.iter_mut() {
            line.set_align(align);
        }
        buffer.shape_until_scroll(font_system.inner_mut(), false);

        if constraints.width.is_none() {
            // Align paragraphs against the widest line rather than each
            // paragraph's own width. Wrapping is off, so nothing reflows.
            let widest = buffer
                .layout_runs()
                .fold(0.0f32, |widest, run| widest.max(run.line_w));
            if widest > 0.0 {
                buffer.set_size(font_system.inner_mut(), Some(widest), None);
                buffer.shape_until_scroll(font_system.inner_mut(), false);
            }
        }

        let mut layout = Self {
            buffer,
            spans,
            text,
            color: style.color,
            width_constraint: constraints.width,
            direction: style.direction,
            forced_direction: mark.is_some(),
            lines: Vec::new(),
            logical: Rect::ZERO,
            ink: Rect::ZERO,
        };
        layout.extract_extents(font_system);

        trace!(
            target: "glyphpress_render::layout",
            lines = layout.lines.len(),
            logical = ?layout.logical,
            ink = ?layout.ink,
            direction = ?layout.direction,
            "shaped layout"
        );

        Ok(layout)
    }

    /// The plain text that was shaped (markup removed).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn logical_rect(&self) -> Rect {
        self.logical
    }

    pub fn ink_rect(&self) -> Rect {
        self.ink
    }

    /// Number of visual lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[LineBand] {
        &self.lines
    }

    /// Resolved base direction (never `Auto`).
    pub fn direction(&self) -> TextDirection {
        self.direction
    }

    /// The wrapping width, if one was applied.
    pub fn width_constraint(&self) -> Option<f32> {
        self.width_constraint
    }

    /// Width used for positioning: the wrapping width if applied, else the
    /// logical width.
    pub fn layout_width(&self) -> f32 {
        self.width_constraint.unwrap_or(self.logical.width)
    }

    pub fn layout_height(&self) -> f32 {
        self.logical.height
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Span for a glyph's metadata, `None` for unstyled glyphs.
    pub fn span(&self, metadata: usize) -> Option<&MarkupSpan> {
        self.spans.get(metadata)
    }

    /// Whether a grapheme is a direction mark inserted while shaping.
    pub(crate) fn is_direction_mark(&self, grapheme: &str) -> bool {
        self.forced_direction && marks::is_mark(grapheme)
    }

    fn extract_extents(&mut self, font_system: &FontSystem) {
        let mut lines = Vec::new();
        let mut ids_by_face: HashMap<FontFaceId, Vec<u16>> = HashMap::new();

        for run in self.buffer.layout_runs() {
            let extent = run.glyphs.iter().fold(None, |acc, g| {
                let (l, r) = (g.x, g.x + g.w);
                Some(match acc {
                    None => (l, r),
                    Some((al, ar)) => (f32::min(al, l), f32::max(ar, r)),
                })
            });
            for glyph in run.glyphs.iter() {
                ids_by_face.entry(glyph.font_id).or_default().push(glyph.glyph_id);
            }
            lines.push(LineBand {
                paragraph: run.line_i,
                top: run.line_top,
                height: run.line_height,
                baseline: run.line_y,
                rtl: run.rtl,
                extent,
            });
        }

        if self.direction.is_auto() {
            self.direction = match lines.first() {
                Some(first) if !self.text.is_empty() => TextDirection::from_rtl(first.rtl),
                _ => detect_base_direction(&self.text),
            };
        }

        let left = lines
            .iter()
            .filter_map(|l| l.extent.map(|e| e.0))
            .fold(f32::INFINITY, f32::min);
        let right = lines
            .iter()
            .filter_map(|l| l.extent.map(|e| e.1))
            .fold(f32::NEG_INFINITY, f32::max);
        let height = lines.last().map_or(0.0, |l| l.bottom());
        self.logical = if left.is_finite() {
            Rect::new(left, 0.0, right - left, height)
        } else {
            Rect::new(0.0, 0.0, 0.0, height)
        };

        let boxes: HashMap<FontFaceId, FaceGlyphBoxes> = ids_by_face
            .into_iter()
            .filter_map(|(face, ids)| font_system.glyph_boxes(face, ids).map(|b| (face, b)))
            .collect();
        self.ink = ink_rect(&self.buffer, &boxes);
        self.lines = lines;
    }
}

impl std::fmt::Debug for TextLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayout")
            .field("text", &self.text)
            .field("direction", &self.direction)
            .field("lines", &self.lines.len())
            .field("logical", &self.logical)
            .field("ink", &self.ink)
            .finish()
    }
}

/// Union of glyph outline boxes placed at their pen positions.
fn ink_rect(buffer: &Buffer, boxes: &HashMap<FontFaceId, FaceGlyphBoxes>) -> Rect {
    let mut bounds: Option<(f32, f32, f32, f32)> = None;

    for run in buffer.layout_runs() {
        for glyph in run.glyphs.iter() {
            let Some(face) = boxes.get(&glyph.font_id) else {
                continue;
            };
            let Some(bbox) = face.boxes.get(&glyph.glyph_id) else {
                continue;
            };
            let s = face.scale(glyph.font_size);
            let origin_x = glyph.x + glyph.font_size * glyph.x_offset;
            let origin_y = run.line_y + glyph.y - glyph.font_size * glyph.y_offset;

            let (y_min, y_max) = (bbox.y_min as f32 * s, bbox.y_max as f32 * s);
            let (mut x_min, mut x_max) = (bbox.x_min as f32 * s, bbox.x_max as f32 * s);
            if glyph.cache_key_flags.contains(CacheKeyFlags::FAKE_ITALIC) {
                x_min += y_min.min(0.0) * FAKE_ITALIC_SKEW;
                x_max += y_max.max(0.0) * FAKE_ITALIC_SKEW;
            }

            let glyph_bounds = (
                origin_x + x_min,
                origin_y - y_max,
                origin_x + x_max,
                origin_y - y_min,
            );
            bounds = Some(match bounds {
                None => glyph_bounds,
                Some((l, t, r, b)) => (
                    l.min(glyph_bounds.0),
                    t.min(glyph_bounds.1),
                    r.max(glyph_bounds.2),
                    b.max(glyph_bounds.3),
                ),
            });
        }
    }

    bounds.map_or(Rect::ZERO, |(l, t, r, b)| Rect::from_edges(l, t, r, b))
}

/// Map a markup family name to a family, recognizing generic names.
fn parse_family(name: &str) -> FontFamily {
    match name.to_ascii_lowercase().as_str() {
        "monospace" | "mono" => FontFamily::Monospace,
        "serif" => FontFamily::Serif,
        "sans" | "sans-serif" | "sans serif" => FontFamily::SansSerif,
        _ => FontFamily::name(name),
    }
}

/// Shaping attributes for one markup span.
fn span_attrs<'a>(
    font_system: &FontSystem,
    style: &LayoutStyle,
    base: Attrs<'a>,
    span: &MarkupSpan,
    index: usize,
    family: &'a Option<FontFamily>,
) -> Attrs<'a> {
    let span_style = &span.style;
    let mut attrs = base
        .metadata(index)
        .color(span_style.effective_color(style.color).to_cosmic());

    if let Some(family) = family {
        attrs = attrs.family(family.to_cosmic());
    }
    if let Some(weight) = span_style.weight {
        attrs = attrs.weight(weight.to_cosmic());
    }
    if let Some(slant) = span_style.style {
        let synthetic = slant.is_slanted() && slant_is_synthetic(font_system, &attrs, slant);
        attrs.cache_key_flags.set(CacheKeyFlags::FAKE_ITALIC, synthetic);
        attrs = attrs.style(if synthetic {
            FontStyle::Normal.to_cosmic()
        } else {
            slant.to_cosmic()
        });
    }
    if !span_style.size.is_base() {
        attrs = attrs.metrics(style.metrics_for(span_style.size.resolve(style.points)));
    }
    attrs
}

/// Whether the best match for a slanted request is an upright face.
fn slant_is_synthetic(font_system: &FontSystem, attrs: &Attrs<'_>, slant: FontStyle) -> bool {
    let families = [attrs.family];
    let query = fontdb::Query {
        families: &families,
        weight: attrs.weight,
        stretch: attrs.stretch,
        style: slant.to_fontdb(),
    };
    let db = font_system.database();
    db.query(&query)
        .and_then(|id| db.face(id))
        .is_some_and(|face| face.style == fontdb::Style::Normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FontSystemConfig;

    fn style(points: f32) -> LayoutStyle {
        LayoutStyle {
            descriptor: FontDescriptor::default(),
            points,
            scale: 1.0,
            line_height: points * 1.2,
            fixed_line_height: false,
            color: Color::BLACK,
            horizontal_align: HorizontalAlign::Start,
            justify: false,
            direction: TextDirection::Auto,
        }
    }

    fn system_fonts() -> Option<FontSystem> {
        let font_system = FontSystem::new();
        (font_system.face_count() > 0).then_some(font_system)
    }

    #[test]
    fn rect_edges() {
        let rect = Rect::from_edges(-2.0, 1.0, 8.0, 5.0);
        assert_eq!(rect, Rect::new(-2.0, 1.0, 10.0, 4.0));
        assert_eq!(rect.right(), 8.0);
        assert_eq!(rect.bottom(), 5.0);
        assert!(Rect::ZERO.is_empty());
    }

    #[test]
    fn constraints_clamp_to_one_pixel() {
        let c = Constraints::new(Some(-5.0));
        assert_eq!(c.width, Some(1.0));
        assert_eq!(Constraints::new(None), Constraints::UNCONSTRAINED);
    }

    #[test]
    fn shaping_without_fonts_fails() {
        let mut font_system =
            FontSystem::with_config(FontSystemConfig::new().load_system_fonts(false));
        let result = TextLayout::shape(
            &mut font_system,
            &Markup::plain("Hello"),
            &style(12.0),
            Constraints::UNCONSTRAINED,
        );
        assert!(matches!(result, Err(RenderError::NoFontsAvailable)));
    }

    #[test]
    fn empty_text_without_fonts_is_fine() {
        let mut font_system =
            FontSystem::with_config(FontSystemConfig::new().load_system_fonts(false));
        let layout = TextLayout::shape(
            &mut font_system,
            &Markup::plain(""),
            &style(12.0),
            Constraints::UNCONSTRAINED,
        )
        .unwrap();
        assert_eq!(layout.logical_rect().width, 0.0);
        assert_eq!(layout.ink_rect(), Rect::ZERO);
        assert_eq!(layout.direction(), TextDirection::LeftToRight);
    }

    #[test]
    fn single_line_extents() {
        let Some(mut font_system) = system_fonts() else {
            return;
        };
        let layout = TextLayout::shape(
            &mut font_system,
            &Markup::plain("Hello"),
            &style(20.0),
            Constraints::UNCONSTRAINED,
        )
        .unwrap();
        let logical = layout.logical_rect();
        assert_eq!(layout.line_count(), 1);
        assert!(logical.width > 0.0);
        assert!((logical.height - 24.0).abs() < 0.01);
        assert!(!layout.ink_rect().is_empty());
        assert_eq!(layout.layout_width(), logical.width);
    }

    #[test]
    fn wrapping_adds_lines() {
        let Some(mut font_system) = system_fonts() else {
            return;
        };
        let text = Markup::plain("one two three four five six seven");
        let wide = TextLayout::shape(
            &mut font_system,
            &text,
            &style(16.0),
            Constraints::UNCONSTRAINED,
        )
        .unwrap();
        let narrow = TextLayout::shape(
            &mut font_system,
            &text,
            &style(16.0),
            Constraints::new(Some(wide.logical_rect().width / 3.0)),
        )
        .unwrap();
        assert_eq!(wide.line_count(), 1);
        assert!(narrow.line_count() > 1);
        assert_eq!(narrow.width_constraint(), Some(wide.logical_rect().width / 3.0));
    }

    #[test]
    fn auto_direction_follows_content() {
        let Some(mut font_system) = system_fonts() else {
            return;
        };
        let layout = TextLayout::shape(
            &mut font_system,
            &Markup::plain("שלום"),
            &style(16.0),
            Constraints::UNCONSTRAINED,
        )
        .unwrap();
        assert_eq!(layout.direction(), TextDirection::RightToLeft);
        assert!(layout.lines()[0].rtl);
    }

    #[test]
    fn explicit_direction_forces_paragraphs() {
        let Some(mut font_system) = system_fonts() else {
            return;
        };
        let mut forced = style(16.0);
        forced.direction = TextDirection::RightToLeft;
        let layout = TextLayout::shape(
            &mut font_system,
            &Markup::plain("Hello\nWorld"),
            &forced,
            Constraints::UNCONSTRAINED,
        )
        .unwrap();
        assert_eq!(layout.direction(), TextDirection::RightToLeft);
        assert!(layout.lines().iter().all(|line| line.rtl));
        assert_eq!(layout.text(), "Hello\nWorld");
    }
}
