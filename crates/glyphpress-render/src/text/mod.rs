//! The text pipeline: fonts, markup, layout, painting and cluster geometry.
//!
//! Text flows through the pipeline in this order:
//!
//! 1. a [`StyleRequest`] describes text, font, box, alignment and wrapping
//! 2. a [`LayoutResolver`] turns it into a [`CommittedLayout`]
//! 3. the committed layout is painted with
//!    [`rasterize`](CommittedLayout::rasterize) and queried with
//!    [`cluster_rects`]
//!
//! # Getting Started
//!
//! ```no_run
//! use glyphpress_render::text::{
//!     Background, FontSystem, HorizontalAlign, LayoutResolver, StyleRequest, VerticalAlign,
//! };
//!
//! // Load system fonts once and fork a private copy per layout.
//! let fonts = FontSystem::new();
//!
//! let request = StyleRequest::new("<b>Hello</b>, World")
//!     .markup(true)
//!     .font_size(18.0)
//!     .box_size(240, 60)
//!     .align(HorizontalAlign::Center, VerticalAlign::Middle);
//!
//! let mut layout = LayoutResolver::new(fonts.fork()).resolve(&request)?;
//! let (w, h) = layout.render_size();
//! let pixels = layout.rasterize(w, h, Background::Transparent);
//! println!("{} characters, {} pixels", layout.character_count(), pixels.pixels().len());
//! # Ok::<(), glyphpress_render::RenderError>(())
//! ```
//!
//! # Font Queries
//!
//! ```no_run
//! use glyphpress_render::text::{FontFamily, FontQuery, FontStyle, FontSystem, FontWeight};
//!
//! let font_system = FontSystem::new();
//! let query = FontQuery::new()
//!     .family(FontFamily::name("Inter"))
//!     .weight(FontWeight::BOLD)
//!     .style(FontStyle::Normal);
//!
//! if let Some(face_id) = font_system.query(&query) {
//!     println!("found {face_id:?}");
//! }
//! for family in font_system.list_families() {
//!     println!("{family}: {:?}", font_system.list_faces(&family));
//! }
//! ```

mod alignment;
mod bidi;
mod clusters;
mod font;
mod font_system;
mod glyph_cache;
mod layout;
mod markup;
mod raster;
mod resolver;
mod types;

pub use alignment::paint_offset;
pub use bidi::{TextDirection, contains_rtl, detect_base_direction, is_rtl_char, marks};
pub use clusters::{ClusterRect, ClusterRects, cluster_rects, count_clusters};
pub use font::FontDescriptor;
pub use font_system::{
    FaceGlyphBoxes, FontFaceDescription, FontLoadError, FontSystem, FontSystemConfig, GlyphBox,
};
pub use glyph_cache::{GlyphCache, GlyphCacheStats, GlyphImage, GlyphPixelFormat};
pub use layout::{
    Constraints, HorizontalAlign, LayoutStyle, LineBand, Rect, TextLayout, VerticalAlign,
    WrapMode,
};
pub use markup::{Markup, MarkupError, MarkupSpan, SpanSize, SpanStyle, parse_color};
pub use raster::{Background, PixelBuffer};
pub use resolver::{
    CommittedLayout, LayoutResolver, Measurement, Padding, PaddingMode, ResolvedFont,
    StyleRequest, TextInfo, TextSize, measure_text, overhang_padding,
};
pub use types::{
    Color, FontFamily, FontMetrics, FontQuery, FontStretch, FontStyle, FontVariant, FontWeight,
};

// Re-export fontdb::ID for users who need to work with font face IDs
pub use fontdb::ID as FontFaceId;
