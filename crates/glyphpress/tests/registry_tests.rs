//! Integration tests for the handle registry and texture handoff.
//!
//! Tests that shape real text use the system fonts and return early on a
//! machine without any.

use std::sync::Arc;
use std::thread;

use glyphpress::{
    Background, EngineConfig, FontSystem, FontSystemConfig, RenderRegistry, StyleRequest,
    TextureEvent, TextureUpdateParams, WrapMode,
};

fn system_registry() -> Option<RenderRegistry> {
    let fonts = FontSystem::new();
    (fonts.face_count() > 0).then(|| RenderRegistry::with_font_system(fonts, EngineConfig::new()))
}

fn hello() -> StyleRequest {
    StyleRequest::new("Hello")
        .font_size(20.0)
        .box_size(200, 50)
        .wrap(WrapMode::Expand, WrapMode::Expand)
}

#[test]
fn test_style_render_cluster_roundtrip() {
    let Some(registry) = system_registry() else {
        return;
    };
    let handle = registry.create_handle();
    let info = registry.set_style(handle, &hello()).unwrap();
    assert_eq!(info.character_count, 5);

    let mut params = TextureUpdateParams::new(handle, info.render_width, info.render_height);
    registry.on_texture_event(TextureEvent::Begin, &mut params);
    let painted = params.texture.as_ref().unwrap().buffer().unwrap().clone();
    assert!(!painted.is_fully_transparent());
    registry.on_texture_event(TextureEvent::End, &mut params);

    let rects = registry.cluster_rects(handle, 5);
    assert_eq!(rects.len(), 5);
    assert!(rects.rects.windows(2).all(|pair| pair[0].x < pair[1].x));
    assert_eq!(registry.outstanding_leases(), 0);
}

#[test]
fn test_restyle_replaces_layout() {
    let Some(registry) = system_registry() else {
        return;
    };
    let handle = registry.create_handle();
    let short = registry.set_style(handle, &hello()).unwrap();
    let long = registry
        .set_style(handle, &StyleRequest::new("Hello, World").wrap(WrapMode::Expand, WrapMode::Expand))
        .unwrap();
    assert_eq!(registry.live_layouts(), 1);
    assert_eq!(registry.text_info(handle), Some(long));
    assert_ne!(short.character_count, long.character_count);
}

#[test]
fn test_teardown_during_parallel_renders() {
    let Some(registry) = system_registry() else {
        return;
    };
    let registry = Arc::new(registry);
    let handles: Vec<_> = (0..4).map(|_| registry.create_handle()).collect();
    for &handle in &handles {
        registry.set_style(handle, &hello()).unwrap();
    }

    let workers: Vec<_> = handles
        .iter()
        .map(|&handle| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..10 {
                    let lease = registry.begin_render(handle, 64, 32);
                    assert_eq!(lease.width(), 64);
                    registry.end_render(lease);
                }
            })
        })
        .collect();

    registry.teardown(handles[0]);
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(registry.outstanding_leases(), 0);
    assert_eq!(registry.leaked_leases(), 0);
    assert_eq!(registry.live_layouts(), 3);
}

#[test]
fn test_measure_only_matches_unboxed_layout() {
    let Some(registry) = system_registry() else {
        return;
    };
    let request = StyleRequest::new("Measure me").font_size(18.0);
    let size = registry.measure_only(&request).unwrap();

    let handle = registry.create_handle();
    let info = registry
        .set_style(
            handle,
            &request.wrap(WrapMode::Expand, WrapMode::Expand),
        )
        .unwrap();
    assert_eq!(size.logical_width, info.logical_width);
    assert_eq!(size.logical_height, info.logical_height);
}

#[test]
fn test_font_listing() {
    let Some(registry) = system_registry() else {
        return;
    };
    let families = registry.list_families();
    assert!(!families.is_empty());
    let faces = registry.list_faces(&families[0]);
    assert!(!faces.is_empty());
    let first = &faces[0];
    assert!(
        registry
            .resolve_font_description(&families[0], &first.name)
            .is_some()
    );
}

#[test]
fn test_export_surface() {
    let Some(registry) = system_registry() else {
        return;
    };
    let handle = registry.create_handle();
    let info = registry.set_style(handle, &hello()).unwrap();
    let surface =
        registry.render_to_surface(handle, info.render_width, info.render_height, Background::White);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.png");
    registry.export_to_file(&surface, &path).unwrap();
    registry.release_surface(surface);
    assert!(path.exists());
}

#[test]
fn test_fontless_registry_still_serves_empty_text() {
    let registry = RenderRegistry::new(
        EngineConfig::new().fonts(FontSystemConfig::new().load_system_fonts(false)),
    );
    let handle = registry.create_handle();
    let info = registry.set_style(handle, &StyleRequest::new("")).unwrap();
    assert_eq!(info.character_count, 0);
    assert!(registry.cluster_rects(handle, 10).is_empty());
}
