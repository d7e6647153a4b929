//! Engine configuration.

use glyphpress_render::text::{FontFamily, FontSystemConfig};

/// Handle seed used when none is configured; the first handle is one above.
pub const DEFAULT_HANDLE_SEED: u32 = 7690;

/// Configuration for a [`RenderRegistry`](crate::RenderRegistry).
///
/// # Example
///
/// ```
/// use glyphpress::{EngineConfig, FontFamily, FontSystemConfig};
///
/// let config = EngineConfig::new()
///     .fonts(FontSystemConfig::new().load_system_fonts(false))
///     .handle_seed(100)
///     .default_family(FontFamily::Serif);
/// assert_eq!(config.handle_seed, 100);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Font sources shared by every layout.
    pub fonts: FontSystemConfig,
    /// Handles are issued from `handle_seed + 1` upwards.
    pub handle_seed: u32,
    /// Family used when a request's family or face cannot be found.
    pub default_family: FontFamily,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fonts: FontSystemConfig::default(),
            handle_seed: DEFAULT_HANDLE_SEED,
            default_family: FontFamily::SansSerif,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fonts(mut self, fonts: FontSystemConfig) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn handle_seed(mut self, seed: u32) -> Self {
        self.handle_seed = seed;
        self
    }

    pub fn default_family(mut self, family: FontFamily) -> Self {
        self.default_family = family;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.handle_seed, DEFAULT_HANDLE_SEED);
        assert_eq!(config.default_family, FontFamily::SansSerif);
        assert!(config.fonts.load_system_fonts);
    }
}
