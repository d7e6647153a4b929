//! Painting a committed layout into a pixel buffer.
//!
//! Glyphs are composited source-over into a premultiplied tiny-skia pixmap,
//! decorations are filled as rectangles, and the result is converted to
//! straight-alpha `0xAARRGGBB` words with the first row at the bottom.

use cosmic_text::LayoutRun;
use tiny_skia::{Paint, Pixmap, PremultipliedColorU8, Transform};
use tracing::trace;

use super::glyph_cache::GlyphImage;
use super::resolver::CommittedLayout;
use super::types::Color;

/// Decoration thickness relative to the font size, never under one pixel.
const DECORATION_THICKNESS: f32 = 1.0 / 12.0;
/// Underline position below the baseline relative to the font size.
const UNDERLINE_OFFSET: f32 = 0.15;
/// Strikethrough position above the baseline relative to the font size.
const STRIKETHROUGH_OFFSET: f32 = 0.3;

/// Initial contents of a surface before text is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Background {
    #[default]
    Transparent,
    White,
}

/// A painted surface: `0xAARRGGBB` straight-alpha words, bottom row first.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// A fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at column `x` of row `y`, counting rows from the bottom.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.pixels.iter().all(|p| p >> 24 == 0)
    }

    /// Straight RGBA rows ordered top to bottom.
    pub fn to_rgba_top_down(&self) -> Vec<u8> {
        let row = self.width as usize;
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        if row == 0 {
            return out;
        }
        for line in self.pixels.chunks_exact(row).rev() {
            for &p in line {
                out.extend_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, p as u8, (p >> 24) as u8]);
            }
        }
        out
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl CommittedLayout {
    /// Paint the layout into a `width` x `height` surface.
    ///
    /// The layout is placed with [`paint_offset`](Self::paint_offset); ink
    /// outside the surface is clipped. A zero dimension yields an empty
    /// buffer.
    pub fn rasterize(&mut self, width: u32, height: u32, background: Background) -> PixelBuffer {
        let Some(mut pixmap) = Pixmap::new(width, height) else {
            return PixelBuffer::transparent(width, height);
        };
        if background == Background::White {
            pixmap.fill(tiny_skia::Color::WHITE);
        }

        let (offset_x, offset_y) = self.paint_offset(width, height);
        let origin = (offset_x.floor() as f32, offset_y.floor() as f32);

        let mut painted = 0usize;
        for run in self.layout.buffer().layout_runs() {
            // Lines past either edge by more than a line height paint nothing.
            let top = origin.1 + run.line_top;
            if top + 2.0 * run.line_height < 0.0 || top - run.line_height > height as f32 {
                continue;
            }
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((origin.0, origin.1 + run.line_y), 1.0);
                let color = glyph
                    .color_opt
                    .map_or(self.layout.color().to_rgba8(), |c| {
                        [c.r(), c.g(), c.b(), c.a()]
                    });
                if let Some(image) = self
                    .glyph_cache
                    .rasterize(&mut self.font_system, physical.cache_key)
                {
                    blend_glyph(&mut pixmap, &image, physical.x, physical.y, color);
                    painted += 1;
                }
            }
            self.paint_decorations(&mut pixmap, &run, origin);
        }

        trace!(
            target: "glyphpress_render::raster",
            width,
            height,
            glyphs = painted,
            "rasterized layout"
        );
        to_pixel_buffer(&pixmap)
    }

    fn paint_decorations(&self, pixmap: &mut Pixmap, run: &LayoutRun<'_>, origin: (f32, f32)) {
        let mut i = 0;
        while i < run.glyphs.len() {
            let metadata = run.glyphs[i].metadata;
            let mut end = i + 1;
            while end < run.glyphs.len() && run.glyphs[end].metadata == metadata {
                end += 1;
            }
            let glyphs = &run.glyphs[i..end];
            i = end;

            let Some(span) = self.layout.span(metadata) else {
                continue;
            };
            if !span.style.has_decoration() {
                continue;
            }

            let left = glyphs.iter().map(|g| g.x).fold(f32::INFINITY, f32::min);
            let right = glyphs.iter().map(|g| g.x + g.w).fold(f32::NEG_INFINITY, f32::max);
            let font_size = glyphs.iter().map(|g| g.font_size).fold(0.0, f32::max);
            let thickness = (font_size * DECORATION_THICKNESS).max(1.0);
            let baseline = origin.1 + run.line_y;
            let color = span.style.effective_color(self.layout.color());

            let mut lines = Vec::with_capacity(2);
            if span.style.underline {
                lines.push(baseline + font_size * UNDERLINE_OFFSET);
            }
            if span.style.strikethrough {
                lines.push(baseline - font_size * STRIKETHROUGH_OFFSET);
            }
            for y in lines {
                fill_line(
                    pixmap,
                    origin.0 + left,
                    y - thickness / 2.0,
                    right - left,
                    thickness,
                    color,
                );
            }
        }
    }
}

fn fill_line(pixmap: &mut Pixmap, x: f32, y: f32, width: f32, height: f32, color: Color) {
    let Some(rect) = tiny_skia::Rect::from_xywh(x, y, width, height) else {
        return;
    };
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = false;
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Composite a glyph image source-over at pen position (`x`, `y`).
fn blend_glyph(pixmap: &mut Pixmap, image: &GlyphImage<'_>, x: i32, y: i32, color: [u8; 4]) {
    let (surface_w, surface_h) = (pixmap.width() as i32, pixmap.height() as i32);
    let left = x + image.offset_x;
    let top = y - image.offset_y;
    let pixels = pixmap.pixels_mut();

    for gy in 0..image.height {
        let py = top + gy as i32;
        if py < 0 || py >= surface_h {
            continue;
        }
        for gx in 0..image.width {
            let px = left + gx as i32;
            if px < 0 || px >= surface_w {
                continue;
            }
            let src = image.pixel(gx, gy, color);
            if src[3] == 0 {
                continue;
            }
            let index = py as usize * surface_w as usize + px as usize;
            pixels[index] = source_over(src, pixels[index]);
        }
    }
}

/// Straight-alpha `src` over premultiplied `dst`.
fn source_over(src: [u8; 4], dst: PremultipliedColorU8) -> PremultipliedColorU8 {
    use super::glyph_cache::mul_u8;

    let a = src[3];
    let inverse = 255 - a;
    let channel = |s: u8, d: u8| mul_u8(s, a).saturating_add(mul_u8(d, inverse));
    let out_a = a.saturating_add(mul_u8(dst.alpha(), inverse));
    let r = channel(src[0], dst.red()).min(out_a);
    let g = channel(src[1], dst.green()).min(out_a);
    let b = channel(src[2], dst.blue()).min(out_a);
    PremultipliedColorU8::from_rgba(r, g, b, out_a).unwrap_or(dst)
}

fn to_pixel_buffer(pixmap: &Pixmap) -> PixelBuffer {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for row in pixmap.pixels().chunks_exact(width as usize).rev() {
        for p in row {
            let c = p.demultiply();
            pixels.push(
                (c.alpha() as u32) << 24
                    | (c.red() as u32) << 16
                    | (c.green() as u32) << 8
                    | c.blue() as u32,
            );
        }
    }
    PixelBuffer {
        width,
        height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{
        FontSystem, FontSystemConfig, GlyphPixelFormat, LayoutResolver, StyleRequest, WrapMode,
    };

    fn resolve(request: &StyleRequest) -> Option<CommittedLayout> {
        let font_system = FontSystem::new();
        if font_system.face_count() == 0 {
            return None;
        }
        Some(LayoutResolver::new(font_system).resolve(request).unwrap())
    }

    #[test]
    fn buffer_rows_are_bottom_up() {
        let mut pixmap = Pixmap::new(1, 2).unwrap();
        pixmap.pixels_mut()[0] = PremultipliedColorU8::from_rgba(255, 0, 0, 255).unwrap();
        let buffer = to_pixel_buffer(&pixmap);
        assert_eq!(buffer.pixel(0, 1), Some(0xFFFF0000));
        assert_eq!(buffer.pixel(0, 0), Some(0));
        assert_eq!(buffer.pixel(1, 0), None);
        assert_eq!(&buffer.to_rgba_top_down()[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn blending_is_straight_alpha_after_conversion() {
        let mut pixmap = Pixmap::new(1, 1).unwrap();
        let data = [128u8];
        let image = GlyphImage {
            data: &data,
            width: 1,
            height: 1,
            offset_x: 0,
            offset_y: 0,
            format: GlyphPixelFormat::Alpha,
        };
        blend_glyph(&mut pixmap, &image, 0, 0, [255, 0, 0, 255]);
        let p = to_pixel_buffer(&pixmap).pixel(0, 0).unwrap();
        assert_eq!(p >> 24, 128);
        assert!((p >> 16 & 0xFF) >= 254);
    }

    #[test]
    fn clipped_glyph_is_ignored() {
        let mut pixmap = Pixmap::new(2, 2).unwrap();
        let data = [255u8; 4];
        let image = GlyphImage {
            data: &data,
            width: 2,
            height: 2,
            offset_x: 0,
            offset_y: 0,
            format: GlyphPixelFormat::Alpha,
        };
        blend_glyph(&mut pixmap, &image, 10, 10, [0, 0, 0, 255]);
        assert!(to_pixel_buffer(&pixmap).is_fully_transparent());
    }

    #[test]
    fn zero_size_is_empty() {
        let mut layout = LayoutResolver::new(FontSystem::with_config(
            FontSystemConfig::new().load_system_fonts(false),
        ))
        .resolve(&StyleRequest::new(""))
        .unwrap();
        let buffer = layout.rasterize(0, 10, Background::Transparent);
        assert!(buffer.is_empty());
        assert_eq!(buffer.height(), 10);
    }

    #[test]
    fn white_background_is_opaque() {
        let mut layout = LayoutResolver::new(FontSystem::with_config(
            FontSystemConfig::new().load_system_fonts(false),
        ))
        .resolve(&StyleRequest::new(""))
        .unwrap();
        let buffer = layout.rasterize(4, 4, Background::White);
        assert!(buffer.pixels().iter().all(|&p| p == 0xFFFFFFFF));
    }

    #[test]
    fn text_paints_pixels() {
        let Some(mut layout) = resolve(
            &StyleRequest::new("Hello")
                .font_size(24.0)
                .wrap(WrapMode::Expand, WrapMode::Expand),
        ) else {
            return;
        };
        let (w, h) = layout.render_size();
        let buffer = layout.rasterize(w, h, Background::Transparent);
        assert!(!buffer.is_fully_transparent());
        assert!(layout.glyph_cache().stats().glyphs_rasterized > 0);

        // Second paint reuses cached glyphs and produces identical pixels.
        let again = layout.rasterize(w, h, Background::Transparent);
        assert_eq!(buffer, again);
    }

    #[test]
    fn underline_extends_ink_below_text() {
        let plain = StyleRequest::new("ab")
            .font_size(24.0)
            .wrap(WrapMode::Expand, WrapMode::Expand);
        let Some(mut plain) = resolve(&plain) else {
            return;
        };
        let underlined = StyleRequest::new("<u>ab</u>")
            .markup(true)
            .font_size(24.0)
            .wrap(WrapMode::Expand, WrapMode::Expand);
        let mut underlined = resolve(&underlined).unwrap();

        let (w, h) = plain.render_size();
        let lowest_ink = |buffer: &PixelBuffer| {
            (0..buffer.height())
                .find(|&y| (0..buffer.width()).any(|x| buffer.pixel(x, y).unwrap_or(0) >> 24 != 0))
        };
        let plain_low = lowest_ink(&plain.rasterize(w, h, Background::Transparent));
        let underlined_low = lowest_ink(&underlined.rasterize(w, h, Background::Transparent));
        // Rows count from the bottom, so the underline reaches a lower row.
        assert!(underlined_low <= plain_low);
    }
}
