//! Host-facing engine for Glyphpress text rendering.
//!
//! This crate sits between a host render loop and the text pipeline in
//! [`glyphpress_render`]:
//!
//! - **Registry**: committed layouts keyed by [`Handle`], restyled and torn
//!   down from any thread
//! - **Handoff**: the begin/end [`TextureEvent`] protocol that leases painted
//!   buffers to the host
//! - **Measuring**: [`RenderRegistry::measure_only`] sizes text without a
//!   handle
//! - **Engine**: an optional process-wide registry
//!
//! # Example
//!
//! ```no_run
//! use glyphpress::{
//!     EngineConfig, RenderRegistry, StyleRequest, TextureEvent, TextureUpdateParams, WrapMode,
//! };
//!
//! let registry = RenderRegistry::new(EngineConfig::default());
//! let handle = registry.create_handle();
//!
//! let request = StyleRequest::new("Hello, <i>World</i>")
//!     .markup(true)
//!     .font_size(16.0)
//!     .box_size(300, 40)
//!     .wrap(WrapMode::Expand, WrapMode::Wrap);
//! let info = registry.set_style(handle, &request)?;
//!
//! // In the host render loop:
//! let mut params = TextureUpdateParams::new(handle, info.render_width, info.render_height);
//! registry.on_texture_event(TextureEvent::Begin, &mut params);
//! // ... upload params.texture ...
//! registry.on_texture_event(TextureEvent::End, &mut params);
//!
//! // Caret positions:
//! let clusters = registry.cluster_rects(handle, info.character_count);
//! # let _ = clusters;
//! # Ok::<(), glyphpress::EngineError>(())
//! ```

mod config;
mod engine;
mod error;
mod handoff;
pub mod logging;
mod registry;

pub use config::{DEFAULT_HANDLE_SEED, EngineConfig};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use handoff::{
    TEXTURE_EVENT_BEGIN, TEXTURE_EVENT_END, TextureEvent, TextureUpdateParams, UnknownTextureEvent,
};
pub use logging::PerfSpan;
pub use registry::{Handle, RenderLease, RenderRegistry};

// Re-export the text pipeline types hosts work with
pub use glyphpress_render::text::{
    Background, ClusterRect, ClusterRects, Color, FontDescriptor, FontFaceDescription, FontFamily,
    FontStretch, FontStyle, FontSystem, FontSystemConfig, FontVariant, FontWeight,
    HorizontalAlign, Padding, PaddingMode, PixelBuffer, StyleRequest, TextDirection, TextInfo,
    TextSize, VerticalAlign, WrapMode,
};
pub use glyphpress_render::{RenderError, RenderResult};
pub use glyphpress_render as render;
