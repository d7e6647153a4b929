//! Begin/end texture handoff with a host render loop.
//!
//! A host polls every text surface once per frame. On `Begin` the registry
//! paints the surface and attaches a [`RenderLease`] to the host's update
//! parameters; on `End` the host hands the parameters back and the lease is
//! returned.

use thiserror::Error;
use tracing::debug;

use crate::registry::{Handle, RenderLease, RenderRegistry};

/// Raw id of [`TextureEvent::Begin`].
pub const TEXTURE_EVENT_BEGIN: u32 = 0;
/// Raw id of [`TextureEvent::End`].
pub const TEXTURE_EVENT_END: u32 = 1;

/// A texture update event from the host render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureEvent {
    /// Paint the surface and attach its pixels.
    Begin,
    /// Release the attached pixels.
    End,
}

/// A raw event id that names no [`TextureEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown texture event {0}")]
pub struct UnknownTextureEvent(pub u32);

impl TryFrom<u32> for TextureEvent {
    type Error = UnknownTextureEvent;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            TEXTURE_EVENT_BEGIN => Ok(TextureEvent::Begin),
            TEXTURE_EVENT_END => Ok(TextureEvent::End),
            other => Err(UnknownTextureEvent(other)),
        }
    }
}

/// Parameters exchanged with the host for one texture update.
#[derive(Debug, Default)]
pub struct TextureUpdateParams {
    /// Raw handle of the surface to paint.
    pub user_data: u32,
    pub width: u32,
    pub height: u32,
    /// Pixels attached on `Begin`, taken back on `End`.
    pub texture: Option<RenderLease>,
}

impl TextureUpdateParams {
    pub fn new(handle: Handle, width: u32, height: u32) -> Self {
        Self {
            user_data: handle.raw(),
            width,
            height,
            texture: None,
        }
    }

    pub fn handle(&self) -> Handle {
        Handle::from_raw(self.user_data)
    }
}

impl RenderRegistry {
    /// Handle a texture event from the host render loop.
    ///
    /// `Begin` attaches a freshly painted lease, returning any lease still
    /// attached from an unmatched earlier `Begin`. `End` returns the attached
    /// lease; with nothing attached it does nothing.
    pub fn on_texture_event(&self, event: TextureEvent, params: &mut TextureUpdateParams) {
        match event {
            TextureEvent::Begin => {
                if let Some(stale) = params.texture.take() {
                    debug!(
                        target: "glyphpress::handoff",
                        handle = %stale.handle(),
                        "begin without end, returning previous lease"
                    );
                    self.end_render(stale);
                }
                params.texture = Some(self.begin_render(params.handle(), params.width, params.height));
            }
            TextureEvent::End => match params.texture.take() {
                Some(lease) => self.end_render(lease),
                None => debug!(
                    target: "glyphpress::handoff",
                    handle = params.user_data,
                    "end without an attached texture"
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineConfig;
    use glyphpress_render::text::FontSystemConfig;

    fn registry() -> RenderRegistry {
        RenderRegistry::new(
            EngineConfig::new().fonts(FontSystemConfig::new().load_system_fonts(false)),
        )
    }

    #[test]
    fn raw_event_ids() {
        assert_eq!(TextureEvent::try_from(0), Ok(TextureEvent::Begin));
        assert_eq!(TextureEvent::try_from(1), Ok(TextureEvent::End));
        assert_eq!(TextureEvent::try_from(7), Err(UnknownTextureEvent(7)));
    }

    #[test]
    fn unknown_event_is_an_error() {
        let err = TextureEvent::try_from(42).unwrap_err();
        assert_eq!(err.to_string(), "unknown texture event 42");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn begin_then_end() {
        let registry = registry();
        let handle = registry.create_handle();
        let mut params = TextureUpdateParams::new(handle, 8, 4);

        registry.on_texture_event(TextureEvent::Begin, &mut params);
        let lease = params.texture.as_ref().unwrap();
        assert_eq!((lease.width(), lease.height()), (8, 4));
        assert_eq!(registry.outstanding_leases(), 1);

        registry.on_texture_event(TextureEvent::End, &mut params);
        assert!(params.texture.is_none());
        assert_eq!(registry.outstanding_leases(), 0);
        assert_eq!(registry.leaked_leases(), 0);
    }

    #[test]
    fn unmatched_events_do_not_leak() {
        let registry = registry();
        let mut params = TextureUpdateParams::new(registry.create_handle(), 2, 2);

        registry.on_texture_event(TextureEvent::End, &mut params);
        registry.on_texture_event(TextureEvent::Begin, &mut params);
        registry.on_texture_event(TextureEvent::Begin, &mut params);
        assert_eq!(registry.outstanding_leases(), 1);

        registry.on_texture_event(TextureEvent::End, &mut params);
        assert_eq!(registry.outstanding_leases(), 0);
        assert_eq!(registry.leaked_leases(), 0);
    }
}
