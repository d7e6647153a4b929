//! Handle registry: committed layouts keyed by handle.
//!
//! Every handle owns one slot. A slot is `Empty` until a style is set, then
//! holds exactly one committed layout until it is torn down or restyled:
//!
//! ```text
//! create_handle ──► Empty ──set_style──► Active ──teardown──► Empty
//!                                  ▲         │
//!                                  └─────────┘ set_style
//! ```
//!
//! The handle map is behind a read-write lock that is only held for lookups
//! and inserts. Each slot has its own mutex, held for the whole of a
//! restyle, teardown or paint, so a layout can never be replaced while it is
//! being painted, and distinct handles paint in parallel.
//!
//! Read operations on an empty or unknown handle never fail: they produce a
//! transparent buffer, empty cluster rectangles or `None`.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use glyphpress_render::capture;
use glyphpress_render::text::{
    Background, ClusterRects, CommittedLayout, FontDescriptor, FontFaceDescription, FontFamily,
    FontSystem, LayoutResolver, PixelBuffer, StyleRequest, TextInfo, TextSize, cluster_rects,
    measure_text,
};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::logging::PerfSpan;

/// Identifies one text surface in a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(u32);

impl Handle {
    /// Wrap a raw handle value received from a host.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Slot = Arc<Mutex<Option<CommittedLayout>>>;

/// Lease bookkeeping shared between a registry and its leases.
#[derive(Debug, Default)]
struct LeaseCounters {
    outstanding: AtomicUsize,
    leaked: AtomicUsize,
}

/// A painted buffer handed to the host between begin and end of a render.
///
/// Every lease must be returned with [`RenderRegistry::end_render`]. A lease
/// dropped without being returned still frees its buffer, but is counted as
/// leaked and logged.
pub struct RenderLease {
    handle: Handle,
    buffer: Option<PixelBuffer>,
    counters: Arc<LeaseCounters>,
}

impl RenderLease {
    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.buffer.as_ref().map_or(0, PixelBuffer::width)
    }

    pub fn height(&self) -> u32 {
        self.buffer.as_ref().map_or(0, PixelBuffer::height)
    }

    /// The painted pixels.
    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref()
    }

    fn release(mut self) {
        self.buffer = None;
        self.counters.outstanding.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Drop for RenderLease {
    fn drop(&mut self) {
        if self.buffer.take().is_some() {
            self.counters.outstanding.fetch_sub(1, Ordering::AcqRel);
            self.counters.leaked.fetch_add(1, Ordering::AcqRel);
            warn!(
                target: "glyphpress::registry",
                handle = %self.handle,
                "render lease dropped without end_render"
            );
        }
    }
}

impl fmt::Debug for RenderLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderLease")
            .field("handle", &self.handle)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Committed layouts keyed by handle, plus the shared font database.
///
/// # Example
///
/// ```no_run
/// use glyphpress::{EngineConfig, RenderRegistry, StyleRequest};
///
/// let registry = RenderRegistry::new(EngineConfig::default());
/// let handle = registry.create_handle();
/// let info = registry.set_style(handle, &StyleRequest::new("Hello").box_size(200, 50))?;
///
/// let lease = registry.begin_render(handle, info.render_width, info.render_height);
/// // ... upload lease.buffer() to a texture ...
/// registry.end_render(lease);
/// # Ok::<(), glyphpress::EngineError>(())
/// ```
pub struct RenderRegistry {
    next_handle: AtomicU32,
    slots: RwLock<HashMap<Handle, Slot>>,
    fonts: Mutex<FontSystem>,
    default_family: FontFamily,
    counters: Arc<LeaseCounters>,
}

impl RenderRegistry {
    /// Create a registry, loading fonts as configured.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_font_system(FontSystem::with_config(config.fonts.clone()), config)
    }

    /// Create a registry around an already loaded font system.
    ///
    /// The font settings of `config` are ignored.
    pub fn with_font_system(fonts: FontSystem, config: EngineConfig) -> Self {
        Self {
            next_handle: AtomicU32::new(config.handle_seed),
            slots: RwLock::new(HashMap::new()),
            fonts: Mutex::new(fonts),
            default_family: config.default_family,
            counters: Arc::new(LeaseCounters::default()),
        }
    }

    /// Issue a fresh handle in the `Empty` state. Handles are never reused.
    pub fn create_handle(&self) -> Handle {
        let handle = Handle(self.next_handle.fetch_add(1, Ordering::AcqRel).wrapping_add(1));
        self.slots
            .write()
            .insert(handle, Arc::new(Mutex::new(None)));
        trace!(target: "glyphpress::registry", %handle, "created handle");
        handle
    }

    /// Resolve `request` and make it the handle's layout.
    ///
    /// The previous layout is destroyed before the new one is resolved, so
    /// a failed resolution leaves the handle `Empty`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownHandle`] for a handle this registry
    /// never issued, and [`EngineError::Render`] when resolution fails.
    pub fn set_style(&self, handle: Handle, request: &StyleRequest) -> Result<TextInfo> {
        let _perf = PerfSpan::new("set_style");
        let slot = self.slot(handle).ok_or(EngineError::UnknownHandle(handle))?;
        let mut layout = slot.lock();
        *layout = None;

        let font_system = self.fonts.lock().fork();
        let committed = LayoutResolver::new(font_system)
            .with_default_family(self.default_family.clone())
            .resolve(request)?;
        let info = committed.info();
        *layout = Some(committed);

        debug!(
            target: "glyphpress::registry",
            %handle,
            render_width = info.render_width,
            render_height = info.render_height,
            "style set"
        );
        Ok(info)
    }

    /// Destroy the handle's layout, returning it to `Empty`. Idempotent.
    pub fn teardown(&self, handle: Handle) {
        if let Some(slot) = self.slot(handle)
            && slot.lock().take().is_some()
        {
            trace!(target: "glyphpress::registry", %handle, "tore down layout");
        }
    }

    /// Metrics of the handle's committed layout.
    pub fn text_info(&self, handle: Handle) -> Option<TextInfo> {
        let slot = self.slot(handle)?;
        let layout = slot.lock();
        layout.as_ref().map(CommittedLayout::info)
    }

    /// Paint the handle's layout into a `width` x `height` buffer and lease
    /// it to the host.
    ///
    /// An empty or unknown handle yields a transparent buffer.
    pub fn begin_render(&self, handle: Handle, width: u32, height: u32) -> RenderLease {
        let buffer = self.paint(handle, width, height, Background::Transparent);
        self.counters.outstanding.fetch_add(1, Ordering::AcqRel);
        RenderLease {
            handle,
            buffer: Some(buffer),
            counters: Arc::clone(&self.counters),
        }
    }

    /// Return a lease handed out by [`begin_render`](Self::begin_render).
    pub fn end_render(&self, lease: RenderLease) {
        trace!(target: "glyphpress::registry", handle = %lease.handle, "render ended");
        lease.release();
    }

    /// Paint the handle's layout into a buffer owned by the caller.
    ///
    /// Pair with [`release_surface`](Self::release_surface).
    pub fn render_to_surface(
        &self,
        handle: Handle,
        width: u32,
        height: u32,
        background: Background,
    ) -> PixelBuffer {
        self.paint(handle, width, height, background)
    }

    /// Dispose of a buffer from [`render_to_surface`](Self::render_to_surface).
    pub fn release_surface(&self, buffer: PixelBuffer) {
        trace!(
            target: "glyphpress::registry",
            width = buffer.width(),
            height = buffer.height(),
            "released surface"
        );
        drop(buffer);
    }

    /// Save a painted buffer to an image file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Render`] when the buffer is empty or the image
    /// cannot be written.
    pub fn export_to_file(&self, buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
        capture::export_to_file(buffer, path)?;
        Ok(())
    }

    /// Cluster rectangles placed in the layout's own render size.
    pub fn cluster_rects(&self, handle: Handle, capacity: usize) -> ClusterRects {
        let Some(slot) = self.slot(handle) else {
            return ClusterRects::empty();
        };
        let layout = slot.lock();
        layout.as_ref().map_or_else(ClusterRects::empty, |layout| {
            let (width, height) = layout.render_size();
            cluster_rects(layout, width, height, capacity)
        })
    }

    /// Cluster rectangles placed in a `width` x `height` surface.
    pub fn cluster_rects_for_size(
        &self,
        handle: Handle,
        width: u32,
        height: u32,
        capacity: usize,
    ) -> ClusterRects {
        let Some(slot) = self.slot(handle) else {
            return ClusterRects::empty();
        };
        let layout = slot.lock();
        layout.as_ref().map_or_else(ClusterRects::empty, |layout| {
            cluster_rects(layout, width, height, capacity)
        })
    }

    /// Measure text without a box. Touches no handle.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Render`] when the text cannot be shaped.
    pub fn measure_only(&self, request: &StyleRequest) -> Result<TextSize> {
        let mut fonts = self.fonts.lock();
        Ok(measure_text(&mut fonts, request)?)
    }

    /// Look up a family/face pair in the shared font database.
    pub fn resolve_font_description(&self, family: &str, face: &str) -> Option<FontDescriptor> {
        self.fonts.lock().resolve_font_description(family, face)
    }

    /// Family names in the shared font database.
    pub fn list_families(&self) -> Vec<String> {
        self.fonts.lock().list_families()
    }

    /// Faces of a family, including synthesized italics.
    pub fn list_faces(&self, family: &str) -> Vec<FontFaceDescription> {
        self.fonts.lock().list_faces(family)
    }

    /// Run `f` with the shared font system, e.g. to load extra fonts.
    ///
    /// Layouts committed earlier keep the fonts they were resolved with.
    pub fn with_fonts<T>(&self, f: impl FnOnce(&mut FontSystem) -> T) -> T {
        f(&mut self.fonts.lock())
    }

    /// Number of handles issued so far.
    pub fn handle_count(&self) -> usize {
        self.slots.read().len()
    }

    /// Number of handles in the `Active` state.
    pub fn live_layouts(&self) -> usize {
        let slots: Vec<Slot> = self.slots.read().values().cloned().collect();
        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    /// Leases handed out and not yet returned.
    pub fn outstanding_leases(&self) -> usize {
        self.counters.outstanding.load(Ordering::Acquire)
    }

    /// Leases dropped without being returned.
    pub fn leaked_leases(&self) -> usize {
        self.counters.leaked.load(Ordering::Acquire)
    }

    fn slot(&self, handle: Handle) -> Option<Slot> {
        self.slots.read().get(&handle).cloned()
    }

    fn paint(&self, handle: Handle, width: u32, height: u32, background: Background) -> PixelBuffer {
        let _perf = PerfSpan::new("paint");
        let Some(slot) = self.slot(handle) else {
            debug!(target: "glyphpress::registry", %handle, "render of unknown handle");
            return PixelBuffer::transparent(width, height);
        };
        let mut layout = slot.lock();
        match layout.as_mut() {
            Some(layout) => layout.rasterize(width, height, background),
            None => {
                debug!(target: "glyphpress::registry", %handle, "render of empty handle");
                PixelBuffer::transparent(width, height)
            }
        }
    }
}

impl fmt::Debug for RenderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderRegistry")
            .field("handles", &self.handle_count())
            .field("outstanding_leases", &self.outstanding_leases())
            .field("leaked_leases", &self.leaked_leases())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphpress_render::text::FontSystemConfig;

    fn registry() -> RenderRegistry {
        RenderRegistry::new(
            EngineConfig::new().fonts(FontSystemConfig::new().load_system_fonts(false)),
        )
    }

    #[test]
    fn handles_count_up_from_seed() {
        let registry = registry();
        assert_eq!(registry.create_handle().raw(), 7691);
        assert_eq!(registry.create_handle().raw(), 7692);
        assert_eq!(registry.handle_count(), 2);

        let seeded = RenderRegistry::new(
            EngineConfig::new()
                .fonts(FontSystemConfig::new().load_system_fonts(false))
                .handle_seed(0),
        );
        assert_eq!(seeded.create_handle().raw(), 1);
    }

    #[test]
    fn unknown_handle_set_style_fails() {
        let registry = registry();
        let result = registry.set_style(Handle::from_raw(1), &StyleRequest::new(""));
        assert!(matches!(result, Err(EngineError::UnknownHandle(h)) if h.raw() == 1));
    }

    #[test]
    fn empty_text_lifecycle() {
        let registry = registry();
        let handle = registry.create_handle();
        assert_eq!(registry.text_info(handle), None);

        let info = registry.set_style(handle, &StyleRequest::new("")).unwrap();
        assert_eq!(info.character_count, 0);
        assert_eq!(registry.text_info(handle), Some(info));
        assert_eq!(registry.live_layouts(), 1);

        registry.teardown(handle);
        registry.teardown(handle);
        assert_eq!(registry.text_info(handle), None);
        assert_eq!(registry.live_layouts(), 0);
    }

    #[test]
    fn failed_restyle_leaves_handle_empty() {
        let registry = registry();
        let handle = registry.create_handle();
        registry.set_style(handle, &StyleRequest::new("")).unwrap();
        let result = registry.set_style(handle, &StyleRequest::new("no fonts loaded"));
        assert!(matches!(
            result,
            Err(EngineError::Render(glyphpress_render::RenderError::NoFontsAvailable))
        ));
        assert_eq!(registry.text_info(handle), None);
    }

    #[test]
    fn stale_handles_render_transparent() {
        let registry = registry();
        let unknown = registry.begin_render(Handle::from_raw(42), 4, 3);
        assert_eq!((unknown.width(), unknown.height()), (4, 3));
        assert!(unknown.buffer().unwrap().is_fully_transparent());
        registry.end_render(unknown);

        let empty = registry.create_handle();
        let surface = registry.render_to_surface(empty, 2, 2, Background::White);
        assert!(surface.is_fully_transparent());
        registry.release_surface(surface);

        assert!(registry.cluster_rects(empty, 8).is_empty());
        assert!(registry.cluster_rects_for_size(Handle::from_raw(9), 8, 8, 8).is_empty());
    }

    #[test]
    fn leases_are_counted() {
        let registry = registry();
        let handle = registry.create_handle();
        let first = registry.begin_render(handle, 1, 1);
        let second = registry.begin_render(handle, 1, 1);
        assert_eq!(registry.outstanding_leases(), 2);

        registry.end_render(first);
        assert_eq!(registry.outstanding_leases(), 1);
        assert_eq!(registry.leaked_leases(), 0);

        drop(second);
        assert_eq!(registry.outstanding_leases(), 0);
        assert_eq!(registry.leaked_leases(), 1);
    }

    #[test]
    fn measure_only_needs_no_handle() {
        let registry = registry();
        let size = registry.measure_only(&StyleRequest::new("")).unwrap();
        assert_eq!(size.logical_width, 0);
        assert_eq!(registry.handle_count(), 0);
    }
}
