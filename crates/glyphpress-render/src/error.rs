//! Error types for the render crate.

use thiserror::Error;

use crate::text::FontLoadError;

/// Errors that can occur while resolving, painting or exporting text.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The font database holds no faces, so text cannot be shaped.
    #[error("no fonts available to shape text")]
    NoFontsAvailable,

    /// The resolution multiplier must be finite and greater than zero.
    #[error("invalid resolution multiplier: {0}")]
    InvalidResolutionMultiplier(f32),

    /// Invalid pixel dimensions for a buffer or image.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Failed to encode or write an image file.
    #[error("failed to save image: {0}")]
    ImageSave(String),

    /// Failed to load a font source.
    #[error("failed to load font: {0}")]
    FontLoad(#[from] FontLoadError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
