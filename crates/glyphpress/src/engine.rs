//! The process-wide engine instance.

use std::sync::OnceLock;

use tracing::info;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::registry::RenderRegistry;

/// Global registry instance.
static ENGINE: OnceLock<RenderRegistry> = OnceLock::new();

/// Access to the process-wide [`RenderRegistry`].
///
/// Hosts that need a single registry per process initialize it once with
/// [`Engine::init`]. Embedders and tests may create free-standing
/// registries with [`RenderRegistry::new`] instead.
///
/// # Example
///
/// ```no_run
/// use glyphpress::{Engine, EngineConfig, StyleRequest};
///
/// let registry = Engine::init(EngineConfig::default())?;
/// let handle = registry.create_handle();
/// registry.set_style(handle, &StyleRequest::new("Hello"))?;
///
/// // Elsewhere:
/// let registry = Engine::get()?;
/// # Ok::<(), glyphpress::EngineError>(())
/// ```
pub struct Engine;

impl Engine {
    /// Create the global registry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AlreadyInitialized`] if called more than once.
    pub fn init(config: EngineConfig) -> Result<&'static RenderRegistry> {
        if ENGINE.get().is_some() {
            return Err(EngineError::AlreadyInitialized);
        }
        let registry = RenderRegistry::new(config);
        ENGINE
            .set(registry)
            .map_err(|_| EngineError::AlreadyInitialized)?;

        let registry = Self::get()?;
        info!(
            target: "glyphpress::engine",
            families = registry.list_families().len(),
            "engine initialized"
        );
        Ok(registry)
    }

    /// Get the global registry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotInitialized`] before [`Engine::init`].
    pub fn get() -> Result<&'static RenderRegistry> {
        ENGINE.get().ok_or(EngineError::NotInitialized)
    }

    /// Get the global registry, or `None` before [`Engine::init`].
    pub fn try_get() -> Option<&'static RenderRegistry> {
        ENGINE.get()
    }
}
