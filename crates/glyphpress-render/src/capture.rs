//! Saving painted surfaces to image files.
//!
//! # Example
//!
//! ```no_run
//! use glyphpress_render::{capture, text::{Background, FontSystem, LayoutResolver, StyleRequest}};
//!
//! # fn example() -> glyphpress_render::RenderResult<()> {
//! let mut layout = LayoutResolver::new(FontSystem::new()).resolve(&StyleRequest::new("Hi"))?;
//! let (w, h) = layout.render_size();
//! let pixels = layout.rasterize(w, h, Background::Transparent);
//! capture::export_to_file(&pixels, "hi.png")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::text::PixelBuffer;

/// Save a painted surface to an image file.
///
/// The format follows the file extension (`.png`, `.bmp`, `.tga`, ...).
/// Rows are written top to bottom with straight alpha.
///
/// # Errors
///
/// Returns [`RenderError::InvalidDimensions`] for an empty buffer and
/// [`RenderError::ImageSave`] when encoding or writing fails.
pub fn export_to_file(buffer: &PixelBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    let image = to_image(buffer).ok_or(RenderError::InvalidDimensions {
        width: buffer.width(),
        height: buffer.height(),
    })?;

    image
        .save(path)
        .map_err(|e| RenderError::ImageSave(e.to_string()))?;

    debug!(
        target: "glyphpress_render::capture",
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        "saved image to file"
    );

    Ok(())
}

/// Convert a painted surface to a top-down RGBA image.
///
/// Returns `None` for an empty buffer.
pub fn to_image(buffer: &PixelBuffer) -> Option<image::RgbaImage> {
    if buffer.is_empty() {
        return None;
    }
    image::ImageBuffer::from_raw(buffer.width(), buffer.height(), buffer.to_rgba_top_down())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_to_file(&PixelBuffer::transparent(0, 4), dir.path().join("x.png"));
        assert!(matches!(
            result,
            Err(RenderError::InvalidDimensions { width: 0, height: 4 })
        ));
    }

    #[test]
    fn png_roundtrips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        export_to_file(&PixelBuffer::transparent(3, 2), &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert!(loaded.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_to_file(&PixelBuffer::transparent(1, 1), dir.path().join("x.nope"));
        assert!(matches!(result, Err(RenderError::ImageSave(_))));
    }
}
