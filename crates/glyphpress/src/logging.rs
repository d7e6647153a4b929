//! Logging facilities for Glyphpress.
//!
//! Glyphpress uses the `tracing` crate for instrumentation and never
//! installs a subscriber itself. To see logs, install one in the host:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("glyphpress=debug,glyphpress_render=info")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Engine lifecycle target.
    pub const ENGINE: &str = "glyphpress::engine";
    /// Handle registry target.
    pub const REGISTRY: &str = "glyphpress::registry";
    /// Texture handoff target.
    pub const HANDOFF: &str = "glyphpress::handoff";
    /// Performance spans target.
    pub const PERF: &str = "glyphpress::perf";

    /// Font loading in the render crate.
    pub const FONTS: &str = "glyphpress_render::fonts";
    /// Markup parsing in the render crate.
    pub const MARKUP: &str = "glyphpress_render::markup";
    /// Staged layout resolution in the render crate.
    pub const RESOLVER: &str = "glyphpress_render::resolver";
    /// Shaping in the render crate.
    pub const LAYOUT: &str = "glyphpress_render::layout";
    /// Painting in the render crate.
    pub const RASTER: &str = "glyphpress_render::raster";
    /// Image export in the render crate.
    pub const CAPTURE: &str = "glyphpress_render::capture";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span for `operation`.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: "glyphpress::perf", "perf", operation);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perf_span_with_subscriber() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new("test_operation");
            tracing::debug!(target: targets::REGISTRY, "inside span");
        });
    }

    #[test]
    fn targets_are_namespaced() {
        for target in [targets::ENGINE, targets::REGISTRY, targets::HANDOFF, targets::PERF] {
            assert!(target.starts_with("glyphpress::"));
        }
        for target in [targets::FONTS, targets::RESOLVER, targets::RASTER] {
            assert!(target.starts_with("glyphpress_render::"));
        }
    }
}
