//! Text layout and rasterization for Glyphpress.
//!
//! This crate resolves styled text requests into shaped layouts built on
//! cosmic-text, paints them into straight-alpha pixel buffers with
//! tiny-skia, and reports per-character rectangles for caret and selection
//! handling. It holds no global state: every layout owns its font system
//! and glyph cache.
//!
//! # Getting Started
//!
//! ```no_run
//! use glyphpress_render::text::{
//!     Background, FontSystem, LayoutResolver, StyleRequest, WrapMode, cluster_rects,
//! };
//!
//! let fonts = FontSystem::new();
//! let request = StyleRequest::new("Hello")
//!     .font_size(20.0)
//!     .box_size(200, 50)
//!     .wrap(WrapMode::Expand, WrapMode::Wrap);
//!
//! let mut layout = LayoutResolver::new(fonts.fork()).resolve(&request)?;
//! let info = layout.info();
//! let pixels = layout.rasterize(info.render_width, info.render_height, Background::White);
//! let clusters = cluster_rects(&layout, info.render_width, info.render_height, 16);
//! assert_eq!(clusters.len(), info.character_count.min(16));
//! # let _ = pixels;
//! # Ok::<(), glyphpress_render::RenderError>(())
//! ```
//!
//! # Measuring Without a Box
//!
//! ```no_run
//! use glyphpress_render::text::{FontSystem, StyleRequest, measure_text};
//!
//! let mut fonts = FontSystem::new();
//! let size = measure_text(&mut fonts, &StyleRequest::new("Hello").font_size(14.0))?;
//! println!("{}x{}", size.logical_width, size.logical_height);
//! # Ok::<(), glyphpress_render::RenderError>(())
//! ```

pub mod capture;
mod error;
pub mod text;

pub use error::{RenderError, RenderResult};
