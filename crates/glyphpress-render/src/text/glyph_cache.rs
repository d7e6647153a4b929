//! Glyph rasterization and caching.
//!
//! Glyph images come from cosmic-text's `SwashCache`, which keeps every
//! rasterized glyph keyed by font, glyph, size, subpixel bin and flags.
//! Each committed layout owns one cache, so repeated renders of the same
//! layout only rasterize each glyph once.

use cosmic_text::{CacheKey, SwashCache, SwashContent};

use super::FontSystem;

/// Pixel format of a rasterized glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphPixelFormat {
    /// 8-bit coverage mask.
    Alpha,
    /// 32-bit RGBA with per-channel coverage.
    SubpixelRgba,
    /// 32-bit RGBA color (emoji and color bitmaps).
    ColorRgba,
}

impl GlyphPixelFormat {
    /// Bytes per pixel for this format.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            GlyphPixelFormat::Alpha => 1,
            GlyphPixelFormat::SubpixelRgba | GlyphPixelFormat::ColorRgba => 4,
        }
    }
}

/// A rasterized glyph borrowed from the cache.
#[derive(Debug, Clone, Copy)]
pub struct GlyphImage<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
    /// X offset from the glyph origin to the left edge of the bitmap.
    pub offset_x: i32,
    /// Y offset from the glyph origin up to the top edge of the bitmap.
    pub offset_y: i32,
    pub format: GlyphPixelFormat,
}

impl GlyphImage<'_> {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Straight-alpha RGBA of the pixel at (`x`, `y`) for a glyph painted in
    /// `color`.
    ///
    /// Mask coverage is multiplied into the color's alpha; color glyphs
    /// keep their own channels and only take the color's alpha.
    pub fn pixel(&self, x: u32, y: u32, color: [u8; 4]) -> [u8; 4] {
        let bpp = self.format.bytes_per_pixel();
        let i = (y as usize * self.width as usize + x as usize) * bpp;
        let Some(px) = self.data.get(i..i + bpp) else {
            return [0; 4];
        };
        match self.format {
            GlyphPixelFormat::Alpha => [color[0], color[1], color[2], mul_u8(px[0], color[3])],
            GlyphPixelFormat::SubpixelRgba => {
                let coverage = ((px[0] as u32 + px[1] as u32 + px[2] as u32) / 3) as u8;
                [color[0], color[1], color[2], mul_u8(coverage, color[3])]
            }
            GlyphPixelFormat::ColorRgba => [px[0], px[1], px[2], mul_u8(px[3], color[3])],
        }
    }
}

/// Multiply two 8-bit fractions with rounding.
pub(crate) fn mul_u8(a: u8, b: u8) -> u8 {
    let t = a as u32 * b as u32 + 128;
    ((t + (t >> 8)) >> 8) as u8
}

/// Statistics about glyph cache usage.
#[derive(Debug, Clone, Default)]
pub struct GlyphCacheStats {
    /// Number of rasterization requests.
    pub rasterize_calls: u64,
    /// Number of requests that produced a bitmap.
    pub glyphs_rasterized: u64,
    /// Number of empty/missing glyphs.
    pub empty_glyphs: u64,
    /// Number of color glyphs (emoji).
    pub color_glyphs: u64,
}

/// Glyph rasterization cache using cosmic-text's SwashCache.
pub struct GlyphCache {
    swash_cache: SwashCache,
    stats: GlyphCacheStats,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self {
            swash_cache: SwashCache::new(),
            stats: GlyphCacheStats::default(),
        }
    }

    /// Get cache statistics.
    pub fn stats(&self) -> &GlyphCacheStats {
        &self.stats
    }

    /// Rasterize a glyph.
    ///
    /// Returns `None` if the glyph has no bitmap (e.g., whitespace).
    pub fn rasterize(
        &mut self,
        font_system: &mut FontSystem,
        cache_key: CacheKey,
    ) -> Option<GlyphImage<'_>> {
        self.stats.rasterize_calls += 1;

        let image = match self.swash_cache.get_image(font_system.inner_mut(), cache_key) {
            Some(img) if img.placement.width > 0 && img.placement.height > 0 => img,
            _ => {
                self.stats.empty_glyphs += 1;
                return None;
            }
        };

        let format = match image.content {
            SwashContent::Mask => GlyphPixelFormat::Alpha,
            SwashContent::SubpixelMask => GlyphPixelFormat::SubpixelRgba,
            SwashContent::Color => {
                self.stats.color_glyphs += 1;
                GlyphPixelFormat::ColorRgba
            }
        };
        self.stats.glyphs_rasterized += 1;

        Some(GlyphImage {
            data: &image.data,
            width: image.placement.width,
            height: image.placement.height,
            offset_x: image.placement.left,
            offset_y: image.placement.top,
            format,
        })
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GlyphCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphCache")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
