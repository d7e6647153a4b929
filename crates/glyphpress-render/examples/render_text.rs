//! Render styled text to a PNG file.
//!
//! Run with: cargo run -p glyphpress-render --example render_text -- out.png "Some <b>text</b>"

use glyphpress_render::capture;
use glyphpress_render::text::{
    Background, Color, FontSystem, HorizontalAlign, LayoutResolver, StyleRequest, VerticalAlign,
    WrapMode, cluster_rects,
};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "render_text.png".to_string());
    let text = args
        .next()
        .unwrap_or_else(|| "Hello, <i>Glyphpress</i>!\n<span foreground=\"#c03\">שלום</span> עולם".to_string());

    let fonts = FontSystem::new();
    println!("Loaded {} font faces", fonts.face_count());

    let request = StyleRequest::new(text)
        .markup(true)
        .font_size(28.0)
        .color(Color::from_rgba8(30, 30, 40, 255))
        .box_size(480, 160)
        .align(HorizontalAlign::Center, VerticalAlign::Middle)
        .wrap(WrapMode::Wrap, WrapMode::Expand)
        .resolution_multiplier(2.0);

    let mut layout = LayoutResolver::new(fonts.fork())
        .resolve(&request)
        .expect("Failed to resolve layout");
    let info = layout.info();
    println!(
        "Render size {}x{}, {} lines, {} characters, direction {:?}",
        info.render_width, info.render_height, info.line_count, info.character_count, info.direction
    );

    let (w, h) = (info.render_width, info.render_height);
    let pixels = layout.rasterize(w, h, Background::White);
    for (i, rect) in cluster_rects(&layout, w, h, 8).rects.iter().enumerate() {
        println!("  cluster {i}: {rect:?}");
    }

    capture::export_to_file(&pixels, &path).expect("Failed to save image");
    println!("Saved {path}");
}
