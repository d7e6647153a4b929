//! Staged resolution of a style request into a committed layout.
//!
//! Resolution runs in five stages, each with an inspectable result:
//!
//! 1. [`resolve_font`](LayoutResolver::resolve_font): family/face lookup
//!    with default substitution, effective pixel size and line pitch
//! 2. [`measure`](LayoutResolver::measure): shaping under the box width
//!    when wrapping horizontally
//! 3. [`derive_padding`](LayoutResolver::derive_padding): ink overhang
//!    past the logical rectangle
//! 4. [`remeasure`](LayoutResolver::remeasure): shaping inside the box
//!    minus padding
//! 5. [`commit`](LayoutResolver::commit): render size and cached metrics
//!
//! [`LayoutResolver::resolve`] runs them in order.
//!
//! # Example
//!
//! ```no_run
//! use glyphpress_render::text::{FontSystem, LayoutResolver, StyleRequest, WrapMode};
//!
//! let font_system = FontSystem::new();
//! let request = StyleRequest::new("Hello")
//!     .font_size(20.0)
//!     .box_size(200, 50)
//!     .wrap(WrapMode::Expand, WrapMode::Wrap);
//!
//! let layout = LayoutResolver::new(font_system.fork()).resolve(&request)?;
//! let info = layout.info();
//! println!("{}x{} in {} lines", info.render_width, info.render_height, info.line_count);
//! # Ok::<(), glyphpress_render::RenderError>(())
//! ```

use fontdb::ID as FontFaceId;
use tracing::{debug, trace, warn};

use crate::error::{RenderError, RenderResult};

use super::alignment::paint_offset;
use super::bidi::TextDirection;
use super::clusters::collect_clusters;
use super::font::FontDescriptor;
use super::font_system::FontSystem;
use super::glyph_cache::GlyphCache;
use super::layout::{
    Constraints, HorizontalAlign, LayoutStyle, Rect, TextLayout, VerticalAlign, WrapMode,
};
use super::markup::Markup;
use super::types::{Color, FontFamily, FontMetrics, FontQuery, FontStyle};

/// Line pitch relative to the font size when a face has no usable metrics.
const FALLBACK_LINE_HEIGHT: f32 = 1.2;

/// Four-sided padding in output pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Padding {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Padding {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub const fn uniform(value: u32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> u32 {
        self.left.saturating_add(self.right)
    }

    pub fn vertical(&self) -> u32 {
        self.top.saturating_add(self.bottom)
    }
}

/// How a request's padding is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// Derive padding from ink overhang.
    #[default]
    Automatic,
    /// Use the given padding as is.
    Explicit(Padding),
}

/// Everything needed to lay out and paint one piece of text.
///
/// Construct with [`StyleRequest::new`] and the builder methods; every
/// field is public for direct use as well.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRequest {
    pub text: String,
    /// Parse `text` as markup.
    pub use_markup: bool,
    /// Family name; empty selects the default family.
    pub family: String,
    /// Face name within the family; empty selects the default face.
    pub face: String,
    /// Font size in points; values below 1 are treated as 1.
    pub font_size: f32,
    /// Line pitch in pixels at multiplier 1; values `<= 0` keep the font's
    /// natural line height.
    pub line_spacing: f32,
    pub color: Color,
    pub box_width: u32,
    pub box_height: u32,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub justify: bool,
    pub direction: TextDirection,
    pub horizontal_wrap: WrapMode,
    pub vertical_wrap: WrapMode,
    /// Output pixels per layout pixel; must be finite and positive.
    pub resolution_multiplier: f32,
    pub padding: PaddingMode,
}

impl Default for StyleRequest {
    fn default() -> Self {
        Self {
            text: String::new(),
            use_markup: false,
            family: String::new(),
            face: String::new(),
            font_size: 12.0,
            line_spacing: 0.0,
            color: Color::BLACK,
            box_width: 256,
            box_height: 256,
            horizontal_align: HorizontalAlign::Start,
            vertical_align: VerticalAlign::Top,
            justify: false,
            direction: TextDirection::Auto,
            horizontal_wrap: WrapMode::Wrap,
            vertical_wrap: WrapMode::Wrap,
            resolution_multiplier: 1.0,
            padding: PaddingMode::Automatic,
        }
    }
}

impl StyleRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn markup(mut self, use_markup: bool) -> Self {
        self.use_markup = use_markup;
        self
    }

    pub fn font(mut self, family: impl Into<String>, face: impl Into<String>) -> Self {
        self.family = family.into();
        self.face = face.into();
        self
    }

    pub fn font_size(mut self, points: f32) -> Self {
        self.font_size = points;
        self
    }

    pub fn line_spacing(mut self, pixels: f32) -> Self {
        self.line_spacing = pixels;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn box_size(mut self, width: u32, height: u32) -> Self {
        self.box_width = width;
        self.box_height = height;
        self
    }

    pub fn align(mut self, horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        self.horizontal_align = horizontal;
        self.vertical_align = vertical;
        self
    }

    pub fn justify(mut self, justify: bool) -> Self {
        self.justify = justify;
        self
    }

    pub fn direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn wrap(mut self, horizontal: WrapMode, vertical: WrapMode) -> Self {
        self.horizontal_wrap = horizontal;
        self.vertical_wrap = vertical;
        self
    }

    pub fn resolution_multiplier(mut self, multiplier: f32) -> Self {
        self.resolution_multiplier = multiplier;
        self
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = PaddingMode::Explicit(padding);
        self
    }

    pub fn automatic_padding(mut self) -> Self {
        self.padding = PaddingMode::Automatic;
        self
    }

    /// The request's text as styled spans.
    pub fn content(&self) -> Markup {
        if self.use_markup {
            Markup::parse_or_literal(&self.text)
        } else {
            Markup::plain(self.text.as_str())
        }
    }

    /// Box width in output pixels.
    fn scaled_box_width(&self) -> f32 {
        self.box_width as f32 * self.resolution_multiplier
    }

    /// Box height in output pixels.
    fn scaled_box_height(&self) -> f32 {
        self.box_height as f32 * self.resolution_multiplier
    }
}

/// Metrics reported after a layout is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextInfo {
    pub render_width: u32,
    pub render_height: u32,
    pub logical_width: i32,
    pub logical_height: i32,
    pub ink_width: i32,
    pub ink_height: i32,
    /// Resolved direction, never `Auto`.
    pub direction: TextDirection,
    pub line_count: usize,
    pub character_count: usize,
    pub ascent: i32,
    pub descent: i32,
    pub line_height: i32,
}

/// Logical and ink size of text measured without a layout box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextSize {
    pub logical_width: i32,
    pub logical_height: i32,
    pub ink_width: i32,
    pub ink_height: i32,
}

/// Output of the font resolution stage.
#[derive(Debug, Clone)]
pub struct ResolvedFont {
    pub descriptor: FontDescriptor,
    /// Whether the requested family/face was replaced by the default.
    pub substituted: bool,
    /// Font size in points after clamping.
    pub points: f32,
    /// Pixels per point.
    pub scale: f32,
    /// Line pitch in pixels.
    pub line_height: f32,
    /// Whether `line_height` came from an explicit spacing.
    pub fixed_line_height: bool,
    /// Face used for vertical metrics, if one matched.
    pub face: Option<FontFaceId>,
    pub metrics: Option<FontMetrics>,
}

impl ResolvedFont {
    /// Effective font size in pixels.
    pub fn pixel_size(&self) -> f32 {
        self.points * self.scale
    }

    pub fn ascent(&self) -> f32 {
        self.metrics
            .map_or(self.pixel_size() * 0.8, |m| m.ascent_px(self.pixel_size()))
    }

    pub fn descent(&self) -> f32 {
        self.metrics
            .map_or(self.pixel_size() * 0.2, |m| m.descent_px(self.pixel_size()))
    }
}

/// Output of a measuring stage: a shaped layout and its extents.
#[derive(Debug)]
pub struct Measurement {
    layout: TextLayout,
}

impl Measurement {
    pub fn logical(&self) -> Rect {
        self.layout.logical_rect()
    }

    pub fn ink(&self) -> Rect {
        self.layout.ink_rect()
    }

    pub fn line_count(&self) -> usize {
        self.layout.line_count()
    }

    /// Resolved direction, never `Auto`.
    pub fn direction(&self) -> TextDirection {
        self.layout.direction()
    }

    pub fn layout(&self) -> &TextLayout {
        &self.layout
    }

    /// Logical and ink size in whole pixels.
    pub fn size(&self) -> TextSize {
        let (logical, ink) = (self.logical(), self.ink());
        TextSize {
            logical_width: pixels(logical.width),
            logical_height: pixels(logical.height),
            ink_width: pixels(ink.width),
            ink_height: pixels(ink.height),
        }
    }
}

/// Round a layout extent up to whole pixels.
fn pixels(extent: f32) -> i32 {
    extent.max(0.0).ceil() as i32
}

/// Runs the resolution stages against a private font system.
///
/// The resolver owns its font system; [`commit`](Self::commit) hands it to
/// the committed layout, which keeps shaping state for its lifetime.
pub struct LayoutResolver {
    font_system: FontSystem,
    default_family: FontFamily,
}

impl LayoutResolver {
    pub fn new(font_system: FontSystem) -> Self {
        Self {
            font_system,
            default_family: FontFamily::SansSerif,
        }
    }

    /// Family substituted when a request's family/face cannot be found.
    pub fn with_default_family(mut self, family: FontFamily) -> Self {
        self.default_family = family;
        self
    }

    pub fn font_system(&self) -> &FontSystem {
        &self.font_system
    }

    /// Run every stage and commit the result.
    pub fn resolve(mut self, request: &StyleRequest) -> RenderResult<CommittedLayout> {
        let font = self.resolve_font(request)?;
        let padding = match request.padding {
            PaddingMode::Automatic => {
                let initial = self.measure(&font, request, initial_constraints(request))?;
                self.derive_padding(&initial)
            }
            PaddingMode::Explicit(padding) => padding,
        };
        let measurement = self.remeasure(&font, request, padding)?;
        Ok(self.commit(request, font, padding, measurement))
    }

    /// Stage 1: pick the font description, size and line pitch.
    ///
    /// An unknown family or face is replaced by the default family; that is
    /// never an error.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidResolutionMultiplier`] when the
    /// multiplier is not finite and positive.
    pub fn resolve_font(&self, request: &StyleRequest) -> RenderResult<ResolvedFont> {
        resolve_font(&self.font_system, &self.default_family, request)
    }

    /// Stage 2: shape the request's text under `constraints`.
    pub fn measure(
        &mut self,
        font: &ResolvedFont,
        request: &StyleRequest,
        constraints: Constraints,
    ) -> RenderResult<Measurement> {
        measure(&mut self.font_system, font, request, constraints)
    }

    /// Stage 3: padding that keeps overhanging ink inside the render area.
    pub fn derive_padding(&self, measurement: &Measurement) -> Padding {
        let padding = overhang_padding(measurement.logical(), measurement.ink());
        trace!(
            target: "glyphpress_render::resolver",
            ?padding,
            "derived padding"
        );
        padding
    }

    /// Stage 4: shape again inside the box width minus `padding`.
    ///
    /// The box height never drops lines; [`commit`](Self::commit) clamps
    /// the render height instead.
    pub fn remeasure(
        &mut self,
        font: &ResolvedFont,
        request: &StyleRequest,
        padding: Padding,
    ) -> RenderResult<Measurement> {
        let width = request
            .horizontal_wrap
            .is_wrap()
            .then(|| request.scaled_box_width() - padding.horizontal() as f32);
        self.measure(font, request, Constraints::new(width))
    }

    /// Stage 5: compute the render size and freeze the layout.
    pub fn commit(
        self,
        request: &StyleRequest,
        font: ResolvedFont,
        padding: Padding,
        measurement: Measurement,
    ) -> CommittedLayout {
        let size = measurement.size();

        let mut render_width =
            (size.logical_width.max(0) as u32).saturating_add(padding.horizontal());
        if request.horizontal_wrap.is_wrap() {
            render_width = render_width.min(request.scaled_box_width().round() as u32);
        }
        let mut render_height =
            (size.logical_height.max(0) as u32).saturating_add(padding.vertical());
        if request.vertical_wrap.is_wrap() {
            render_height = render_height.min(request.scaled_box_height().round() as u32);
        }

        let character_count = collect_clusters(measurement.layout()).len();
        let info = TextInfo {
            render_width,
            render_height,
            logical_width: size.logical_width,
            logical_height: size.logical_height,
            ink_width: size.ink_width,
            ink_height: size.ink_height,
            direction: measurement.direction(),
            line_count: measurement.line_count(),
            character_count,
            ascent: font.ascent().round() as i32,
            descent: font.descent().round() as i32,
            line_height: font.line_height.round() as i32,
        };

        debug!(
            target: "glyphpress_render::resolver",
            render_width,
            render_height,
            lines = info.line_count,
            characters = info.character_count,
            direction = ?info.direction,
            ?padding,
            "committed layout"
        );

        CommittedLayout {
            font_system: self.font_system,
            glyph_cache: GlyphCache::new(),
            layout: measurement.layout,
            request: request.clone(),
            font,
            padding,
            info,
        }
    }
}

fn resolve_font(
    font_system: &FontSystem,
    default_family: &FontFamily,
    request: &StyleRequest,
) -> RenderResult<ResolvedFont> {
    let scale = request.resolution_multiplier;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(RenderError::InvalidResolutionMultiplier(scale));
    }
    let points = request.font_size.max(1.0);

    let found = font_system.resolve_font_description(&request.family, &request.face);
    let substituted = found.is_none();
    let descriptor = found.unwrap_or_else(|| {
        if request.family.is_empty() {
            debug!(
                target: "glyphpress_render::resolver",
                fallback = %default_family,
                "no family requested, using default"
            );
        } else {
            warn!(
                target: "glyphpress_render::resolver",
                family = %request.family,
                face = %request.face,
                fallback = %default_family,
                "font not found, using default"
            );
        }
        FontDescriptor::default_for(default_family.clone())
    });

    let query = FontQuery::new()
        .family(descriptor.family().clone())
        .fallback(default_family.clone())
        .weight(descriptor.weight())
        .stretch(descriptor.stretch())
        .style(if descriptor.is_synthesized() {
            FontStyle::Normal
        } else {
            descriptor.style()
        });
    let face = font_system.query(&query);
    let metrics = face.and_then(|id| font_system.face_metrics(id));

    let pixel_size = points * scale;
    let fixed_line_height = request.line_spacing > 0.0;
    let line_height = if fixed_line_height {
        request.line_spacing * scale
    } else {
        metrics
            .map(|m| m.line_height_px(pixel_size))
            .filter(|h| *h > 0.0)
            .unwrap_or(pixel_size * FALLBACK_LINE_HEIGHT)
    };

    let font = ResolvedFont {
        descriptor,
        substituted,
        points,
        scale,
        line_height,
        fixed_line_height,
        face,
        metrics,
    };
    trace!(
        target: "glyphpress_render::resolver",
        family = %font.descriptor.family(),
        pixel_size,
        line_height,
        substituted,
        "resolved font"
    );
    Ok(font)
}

fn measure(
    font_system: &mut FontSystem,
    font: &ResolvedFont,
    request: &StyleRequest,
    constraints: Constraints,
) -> RenderResult<Measurement> {
    let style = LayoutStyle {
        descriptor: font.descriptor.clone(),
        points: font.points,
        scale: font.scale,
        line_height: font.line_height,
        fixed_line_height: font.fixed_line_height,
        color: request.color,
        horizontal_align: request.horizontal_align,
        justify: request.justify,
        direction: request.direction,
    };
    let layout = TextLayout::shape(font_system, &request.content(), &style, constraints)?;
    Ok(Measurement { layout })
}

/// Constraints of the first measuring pass: the full box width under wrap.
fn initial_constraints(request: &StyleRequest) -> Constraints {
    Constraints::new(
        request
            .horizontal_wrap
            .is_wrap()
            .then(|| request.scaled_box_width()),
    )
}

/// Whole-pixel overhang of `ink` past `logical` on each side.
pub fn overhang_padding(logical: Rect, ink: Rect) -> Padding {
    if ink.width <= 0.0 && ink.height <= 0.0 {
        return Padding::ZERO;
    }
    let side = |overhang: f32| overhang.max(0.0).ceil() as u32;
    Padding {
        top: side(-ink.y),
        left: side(-ink.x),
        bottom: side(ink.bottom() - logical.bottom()),
        right: side(ink.right() - logical.right()),
    }
}

/// A resolved layout ready to be painted and queried.
///
/// The layout owns its font system and glyph cache, so distinct layouts can
/// be painted concurrently.
pub struct CommittedLayout {
    pub(crate) font_system: FontSystem,
    pub(crate) glyph_cache: GlyphCache,
    pub(crate) layout: TextLayout,
    request: StyleRequest,
    font: ResolvedFont,
    padding: Padding,
    info: TextInfo,
}

impl CommittedLayout {
    pub fn info(&self) -> TextInfo {
        self.info
    }

    pub fn request(&self) -> &StyleRequest {
        &self.request
    }

    pub fn font(&self) -> &ResolvedFont {
        &self.font
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn render_size(&self) -> (u32, u32) {
        (self.info.render_width, self.info.render_height)
    }

    /// Resolved direction, never `Auto`.
    pub fn direction(&self) -> TextDirection {
        self.info.direction
    }

    pub fn character_count(&self) -> usize {
        self.info.character_count
    }

    pub fn layout(&self) -> &TextLayout {
        &self.layout
    }

    pub fn glyph_cache(&self) -> &GlyphCache {
        &self.glyph_cache
    }

    /// Where the layout origin lands in a `width` x `height` surface.
    pub fn paint_offset(&self, width: u32, height: u32) -> (f64, f64) {
        paint_offset(
            width,
            height,
            self.request.horizontal_align,
            self.request.vertical_align,
            self.padding,
            self.info.direction,
            self.layout.layout_width(),
            self.layout.layout_height(),
        )
    }
}

impl std::fmt::Debug for CommittedLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommittedLayout")
            .field("info", &self.info)
            .field("padding", &self.padding)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

/// Measure text without a box: no wrapping, no multiplier.
///
/// Font sizes below 1 point are treated as 1. A positive `line_spacing` is
/// the line pitch here as it is for committed layouts, not extra leading
/// between lines.
pub fn measure_text(
    font_system: &mut FontSystem,
    request: &StyleRequest,
) -> RenderResult<TextSize> {
    let unboxed = StyleRequest {
        resolution_multiplier: 1.0,
        horizontal_wrap: WrapMode::Expand,
        vertical_wrap: WrapMode::Expand,
        ..request.clone()
    };
    let font = resolve_font(font_system, &FontFamily::SansSerif, &unboxed)?;
    let measurement = measure(font_system, &font, &unboxed, Constraints::UNCONSTRAINED)?;
    Ok(measurement.size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FontSystemConfig;

    fn empty_resolver() -> LayoutResolver {
        LayoutResolver::new(FontSystem::with_config(
            FontSystemConfig::new().load_system_fonts(false),
        ))
    }

    fn system_resolver() -> Option<LayoutResolver> {
        let font_system = FontSystem::new();
        (font_system.face_count() > 0).then(|| LayoutResolver::new(font_system))
    }

    #[test]
    fn request_defaults() {
        let request = StyleRequest::new("x");
        assert_eq!(request.font_size, 12.0);
        assert_eq!(request.resolution_multiplier, 1.0);
        assert_eq!(request.horizontal_align, HorizontalAlign::Start);
        assert_eq!(request.vertical_align, VerticalAlign::Top);
        assert_eq!(request.horizontal_wrap, WrapMode::Wrap);
        assert_eq!(request.vertical_wrap, WrapMode::Wrap);
        assert_eq!(request.padding, PaddingMode::Automatic);
        assert_eq!(request.color, Color::BLACK);
        assert_eq!(request.direction, TextDirection::Auto);
    }

    #[test]
    fn overhang_formulas() {
        let logical = Rect::new(0.0, 0.0, 100.0, 20.0);
        let ink = Rect::new(-3.0, -1.5, 106.0, 23.0);
        assert_eq!(overhang_padding(logical, ink), Padding::new(3, 3, 2, 2));

        let inside = Rect::new(1.0, 2.0, 90.0, 15.0);
        assert_eq!(overhang_padding(logical, inside), Padding::ZERO);
        assert_eq!(overhang_padding(logical, Rect::ZERO), Padding::ZERO);
    }

    #[test]
    fn invalid_multiplier_is_rejected() {
        let resolver = empty_resolver();
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let request = StyleRequest::new("x").resolution_multiplier(bad);
            assert!(matches!(
                resolver.resolve_font(&request),
                Err(RenderError::InvalidResolutionMultiplier(_))
            ));
        }
    }

    #[test]
    fn font_size_is_clamped_and_scaled() {
        let resolver = empty_resolver();
        let font = resolver
            .resolve_font(&StyleRequest::new("x").font_size(0.0).resolution_multiplier(2.0))
            .unwrap();
        assert_eq!(font.points, 1.0);
        assert_eq!(font.pixel_size(), 2.0);
        assert!(font.substituted);
        assert_eq!(font.line_height, 2.0 * FALLBACK_LINE_HEIGHT);
    }

    #[test]
    fn explicit_line_spacing_is_scaled() {
        let resolver = empty_resolver();
        let font = resolver
            .resolve_font(
                &StyleRequest::new("x")
                    .line_spacing(30.0)
                    .resolution_multiplier(2.0),
            )
            .unwrap();
        assert!(font.fixed_line_height);
        assert_eq!(font.line_height, 60.0);
    }

    #[test]
    fn unknown_font_falls_back() {
        let resolver = empty_resolver();
        let font = resolver
            .resolve_font(&StyleRequest::new("x").font("No Such Family", "Bold"))
            .unwrap();
        assert!(font.substituted);
        assert_eq!(font.descriptor, FontDescriptor::default_for(FontFamily::SansSerif));
    }

    #[test]
    fn empty_text_commits_without_fonts() {
        let layout = empty_resolver()
            .resolve(&StyleRequest::new("").box_size(64, 32))
            .unwrap();
        let info = layout.info();
        assert_eq!(info.character_count, 0);
        assert_eq!(info.logical_width, 0);
        assert_eq!(info.ink_width, 0);
        assert_eq!(layout.padding(), Padding::ZERO);
    }

    #[test]
    fn text_without_fonts_is_an_error() {
        let result = empty_resolver().resolve(&StyleRequest::new("Hello"));
        assert!(matches!(result, Err(RenderError::NoFontsAvailable)));
    }

    #[test]
    fn render_size_respects_box() {
        let Some(resolver) = system_resolver() else {
            return;
        };
        let request = StyleRequest::new("a fairly long line of text that will not fit")
            .font_size(20.0)
            .box_size(60, 30);
        let info = resolver.resolve(&request).unwrap().info();
        assert!(info.render_width <= 60);
        assert!(info.render_height <= 30);
    }

    #[test]
    fn padding_sums_saturate() {
        let wide = Padding::new(u32::MAX, 1, 0, 0);
        assert_eq!(wide.horizontal(), u32::MAX);
        assert_eq!(Padding::new(0, 0, u32::MAX, u32::MAX).vertical(), u32::MAX);

        let layout = empty_resolver()
            .resolve(
                &StyleRequest::new("")
                    .box_size(64, 32)
                    .padding(Padding::new(u32::MAX, 1, u32::MAX, 7)),
            )
            .unwrap();
        assert_eq!(layout.render_size(), (64, 32));

        let expanded = empty_resolver()
            .resolve(
                &StyleRequest::new("")
                    .wrap(WrapMode::Expand, WrapMode::Expand)
                    .padding(wide),
            )
            .unwrap();
        assert_eq!(expanded.info().render_width, u32::MAX);
    }

    #[test]
    fn short_box_keeps_every_line() {
        let (Some(tall_resolver), Some(short_resolver)) = (system_resolver(), system_resolver())
        else {
            return;
        };
        let text = "first line\nsecond line\nthird line\nfourth line\nfifth";
        let tall = StyleRequest::new(text).font_size(16.0).box_size(300, 500);
        let short = tall.clone().box_size(300, 20);

        let tall = tall_resolver.resolve(&tall).unwrap().info();
        let short = short_resolver.resolve(&short).unwrap().info();

        assert_eq!(tall.line_count, 5);
        assert!(tall.render_height > 20);
        assert_eq!(short.line_count, tall.line_count);
        assert_eq!(short.character_count, tall.character_count);
        assert_eq!(short.logical_height, tall.logical_height);
        assert_eq!(short.render_height, 20);
    }

    #[test]
    fn expand_lets_content_size_the_box() {
        let Some(resolver) = system_resolver() else {
            return;
        };
        let request = StyleRequest::new("a fairly long line of text")
            .font_size(20.0)
            .box_size(20, 10)
            .wrap(WrapMode::Expand, WrapMode::Expand);
        let layout = resolver.resolve(&request).unwrap();
        let info = layout.info();
        assert_eq!(info.line_count, 1);
        assert!(info.render_width > 20);
        assert!(info.render_height > 10);
        assert_eq!(
            info.render_width,
            info.logical_width as u32 + layout.padding().horizontal()
        );
    }

    #[test]
    fn staged_pipeline_matches_resolve() {
        let Some(mut resolver) = system_resolver() else {
            return;
        };
        let request = StyleRequest::new("Hello").font_size(20.0).box_size(200, 50);
        let font = resolver.resolve_font(&request).unwrap();
        let first = resolver
            .measure(&font, &request, initial_constraints(&request))
            .unwrap();
        let padding = resolver.derive_padding(&first);
        if first.ink().x < 0.0 {
            assert_eq!(padding.left, (-first.ink().x).ceil() as u32);
        }
        let second = resolver.remeasure(&font, &request, padding).unwrap();
        let staged = resolver.commit(&request, font, padding, second).info();

        let direct = system_resolver().unwrap().resolve(&request).unwrap().info();
        assert_eq!(staged, direct);
    }

    #[test]
    fn measure_text_is_deterministic() {
        let mut font_system = FontSystem::new();
        if font_system.face_count() == 0 {
            return;
        }
        let request = StyleRequest::new("Hello, World").font_size(18.0);
        let first = measure_text(&mut font_system, &request).unwrap();
        let second = measure_text(&mut font_system, &request).unwrap();
        assert_eq!(first, second);
        assert!(first.logical_width > 0);
        assert!(font_system.face_count() > 0);
    }
}
