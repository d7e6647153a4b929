//! Error types for the Glyphpress engine.

use thiserror::Error;

use glyphpress_render::RenderError;

use crate::registry::Handle;

/// The main error type for engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Resolving or exporting text failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The handle was never issued by this registry.
    #[error("unknown handle {0}")]
    UnknownHandle(Handle),

    /// The process-wide engine has already been initialized.
    #[error("engine has already been initialized")]
    AlreadyInitialized,

    /// The process-wide engine has not been initialized yet.
    #[error("engine has not been initialized, call Engine::init() first")]
    NotInitialized,
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            EngineError::UnknownHandle(Handle::from_raw(7691)).to_string(),
            "unknown handle 7691"
        );
        let render: EngineError = RenderError::NoFontsAvailable.into();
        assert_eq!(render.to_string(), RenderError::NoFontsAvailable.to_string());
    }
}
