//! Pango-style markup parsing.
//!
//! Markup text is a small XML dialect that attaches font and color
//! attributes to runs of text:
//!
//! - `<b>`, `<i>`, `<u>`, `<s>` - bold, italic, underline, strikethrough
//! - `<tt>` - monospace family
//! - `<big>`, `<small>` - one step larger or smaller (factor 1.2)
//! - `<sub>`, `<sup>` - reduced size
//! - `<span ...>` - explicit attributes (`foreground`, `font_family`,
//!   `size`, `weight`, `style`, `font_desc`, `underline`, ...)
//!
//! The XML entities `&lt;` `&gt;` `&amp;` `&quot;` `&apos;` and numeric
//! character references are decoded.
//!
//! # Example
//!
//! ```
//! use glyphpress_render::text::Markup;
//!
//! let markup = Markup::parse("Hello <b>bold</b> <span foreground=\"#ff0000\">red</span>").unwrap();
//! assert_eq!(markup.plain_text(), "Hello bold red");
//! assert_eq!(markup.spans().len(), 4);
//!
//! // Broken markup degrades to the literal text.
//! let literal = Markup::parse_or_literal("<b>unclosed");
//! assert_eq!(literal.plain_text(), "<b>unclosed");
//! ```

use thiserror::Error;
use tracing::debug;

use super::types::{Color, FontStyle, FontWeight};

/// Size step used by `<big>`, `<small>`, `larger` and `smaller`.
const SIZE_STEP: f32 = 1.2;

/// Scale applied by `<sub>` and `<sup>`.
const SCRIPT_SCALE: f32 = 1.0 / (SIZE_STEP * SIZE_STEP);

/// Errors produced by the strict markup parser.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkupError {
    #[error("unknown tag <{0}>")]
    UnknownTag(String),
    #[error("unknown attribute '{attribute}' on <{tag}>")]
    UnknownAttribute { tag: String, attribute: String },
    #[error("invalid value '{value}' for attribute '{attribute}'")]
    InvalidValue { attribute: String, value: String },
    #[error("closing tag </{found}> does not match <{expected}>")]
    MismatchedClose { expected: String, found: String },
    #[error("closing tag </{0}> without an opening tag")]
    UnexpectedClose(String),
    #[error("tag <{0}> is never closed")]
    Unclosed(String),
    #[error("unterminated tag")]
    UnterminatedTag,
    #[error("invalid entity '&{0};'")]
    InvalidEntity(String),
}

/// Font size of a span relative to the base size of the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanSize {
    /// Absolute size in points, replacing the base size.
    pub points: Option<f32>,
    /// Factor applied on top of the absolute or base size.
    pub scale: f32,
}

impl SpanSize {
    /// Resolve against the base size in points.
    pub fn resolve(self, base_points: f32) -> f32 {
        self.points.unwrap_or(base_points) * self.scale
    }

    /// Whether the span keeps the base size.
    pub fn is_base(self) -> bool {
        self.points.is_none() && self.scale == 1.0
    }
}

impl Default for SpanSize {
    fn default() -> Self {
        Self {
            points: None,
            scale: 1.0,
        }
    }
}

/// Style attributes attached to a run of markup text.
///
/// Unset fields inherit from the layout's base font and color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanStyle {
    pub family: Option<String>,
    pub weight: Option<FontWeight>,
    pub style: Option<FontStyle>,
    pub size: SpanSize,
    pub color: Option<Color>,
    /// Alpha override in 0..=1, applied on top of the span color.
    pub alpha: Option<f64>,
    pub underline: bool,
    pub strikethrough: bool,
}

impl SpanStyle {
    /// Whether the span draws any decoration line.
    pub fn has_decoration(&self) -> bool {
        self.underline || self.strikethrough
    }

    /// The color of this span given the layout's base color.
    pub fn effective_color(&self, base: Color) -> Color {
        let mut color = self.color.unwrap_or(base);
        if let Some(alpha) = self.alpha {
            color.a = alpha;
        }
        color
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupSpan {
    pub text: String,
    pub style: SpanStyle,
}

impl MarkupSpan {
    pub fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Parsed markup: styled spans in logical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Markup {
    spans: Vec<MarkupSpan>,
}

impl Markup {
    /// Markup consisting of one unstyled span.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            spans: vec![MarkupSpan::new(text, SpanStyle::default())],
        }
    }

    /// Parse markup strictly.
    pub fn parse(markup: &str) -> Result<Self, MarkupError> {
        MarkupParser::new().run(markup)
    }

    /// Parse markup, falling back to the literal text when it is malformed.
    pub fn parse_or_literal(markup: &str) -> Self {
        match Self::parse(markup) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(
                    target: "glyphpress_render::markup",
                    error = %err,
                    "malformed markup, using literal text"
                );
                Self::plain(markup)
            }
        }
    }

    pub fn spans(&self) -> &[MarkupSpan] {
        &self.spans
    }

    /// The text content without markup.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }
}

/// One open element on the parser stack.
#[derive(Debug, Clone)]
struct OpenTag {
    name: String,
    style: SpanStyle,
}

struct MarkupParser {
    spans: Vec<MarkupSpan>,
    current_text: String,
    stack: Vec<OpenTag>,
}

impl MarkupParser {
    fn new() -> Self {
        Self {
            spans: Vec::new(),
            current_text: String::new(),
            stack: Vec::new(),
        }
    }

    fn current_style(&self) -> SpanStyle {
        self.stack
            .last()
            .map(|open| open.style.clone())
            .unwrap_or_default()
    }

    fn flush_text(&mut self) {
        if self.current_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.current_text);
        let style = self.current_style();
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&text),
            _ => self.spans.push(MarkupSpan::new(text, style)),
        }
    }

    fn run(mut self, markup: &str) -> Result<Markup, MarkupError> {
        let mut rest = markup;

        while let Some(pos) = rest.find(['<', '&']) {
            self.current_text.push_str(&rest[..pos]);
            rest = &rest[pos..];

            if rest.starts_with('<') {
                let end = rest.find('>').ok_or(MarkupError::UnterminatedTag)?;
                let tag = &rest[1..end];
                rest = &rest[end + 1..];
                self.handle_tag(tag)?;
            } else {
                let end = rest
                    .find(';')
                    .ok_or_else(|| MarkupError::InvalidEntity(rest[1..].to_string()))?;
                let entity = &rest[1..end];
                self.current_text.push(decode_entity(entity)?);
                rest = &rest[end + 1..];
            }
        }
        self.current_text.push_str(rest);

        if let Some(open) = self.stack.last() {
            return Err(MarkupError::Unclosed(open.name.clone()));
        }
        self.flush_text();

        Ok(Markup { spans: self.spans })
    }

    fn handle_tag(&mut self, tag: &str) -> Result<(), MarkupError> {
        let tag = tag.trim();

        // Markup comments and processing instructions carry no text.
        if tag.starts_with('!') || tag.starts_with('?') {
            return Ok(());
        }

        if let Some(name) = tag.strip_prefix('/') {
            return self.close_tag(name.trim());
        }

        let self_closing = tag.ends_with('/');
        let tag = tag.trim_end_matches('/').trim_end();
        let (name, attrs_str) = match tag.find(char::is_whitespace) {
            Some(idx) => (&tag[..idx], tag[idx..].trim()),
            None => (tag, ""),
        };

        let mut style = self.current_style();
        apply_tag(name, &parse_attributes(attrs_str)?, &mut style)?;

        self.flush_text();
        if !self_closing {
            self.stack.push(OpenTag {
                name: name.to_string(),
                style,
            });
        }
        Ok(())
    }

    fn close_tag(&mut self, name: &str) -> Result<(), MarkupError> {
        let Some(open) = self.stack.last() else {
            return Err(MarkupError::UnexpectedClose(name.to_string()));
        };
        if open.name != name {
            return Err(MarkupError::MismatchedClose {
                expected: open.name.clone(),
                found: name.to_string(),
            });
        }
        self.flush_text();
        self.stack.pop();
        Ok(())
    }
}

/// Apply the effect of an opening tag to the inherited style.
fn apply_tag(
    name: &str,
    attrs: &[(String, String)],
    style: &mut SpanStyle,
) -> Result<(), MarkupError> {
    match name {
        "b" => style.weight = Some(FontWeight::BOLD),
        "i" => style.style = Some(FontStyle::Italic),
        "u" => style.underline = true,
        "s" => style.strikethrough = true,
        "tt" => style.family = Some("monospace".to_string()),
        "big" => style.size.scale *= SIZE_STEP,
        "small" => style.size.scale /= SIZE_STEP,
        "sub" | "sup" => style.size.scale *= SCRIPT_SCALE,
        "span" => {
            for (key, value) in attrs {
                apply_span_attribute(key, value, style)?;
            }
        }
        other => return Err(MarkupError::UnknownTag(other.to_string())),
    }

    if name != "span" {
        if let Some((key, _)) = attrs.first() {
            return Err(MarkupError::UnknownAttribute {
                tag: name.to_string(),
                attribute: key.clone(),
            });
        }
    }
    Ok(())
}

fn apply_span_attribute(
    key: &str,
    value: &str,
    style: &mut SpanStyle,
) -> Result<(), MarkupError> {
    let invalid = || MarkupError::InvalidValue {
        attribute: key.to_string(),
        value: value.to_string(),
    };

    match key {
        "foreground" | "fgcolor" | "color" => {
            style.color = Some(parse_color(value).ok_or_else(invalid)?);
        }
        "alpha" | "fgalpha" => {
            style.alpha = Some(parse_alpha(value).ok_or_else(invalid)?);
        }
        "font_family" | "face" | "font-family" => {
            style.family = Some(value.to_string());
        }
        "size" | "font_size" | "font-size" => {
            style.size = parse_size(value, style.size).ok_or_else(invalid)?;
        }
        "weight" | "font_weight" | "font-weight" => {
            style.weight = Some(FontWeight::from_name(value).ok_or_else(invalid)?);
        }
        "style" | "font_style" | "font-style" => {
            style.style = Some(FontStyle::from_name(value).ok_or_else(invalid)?);
        }
        "font_desc" | "font" => apply_font_desc(value, style),
        "underline" => {
            style.underline = match value {
                "none" | "false" => false,
                "single" | "double" | "low" | "error" | "true" => true,
                _ => return Err(invalid()),
            };
        }
        "strikethrough" => {
            style.strikethrough = parse_bool(value).ok_or_else(invalid)?;
        }
        // Accepted but not rendered.
        "background" | "bgcolor" | "bgalpha" | "background_alpha" | "rise" | "letter_spacing"
        | "lang" | "variant" | "stretch" | "font_stretch" | "font_variant" | "gravity"
        | "gravity_hint" | "fallback" | "font_features" | "underline_color"
        | "strikethrough_color" | "allow_breaks" | "insert_hyphens" | "show" => {}
        other => {
            return Err(MarkupError::UnknownAttribute {
                tag: "span".to_string(),
                attribute: other.to_string(),
            });
        }
    }
    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a size value: 1024ths of a point, `12pt`, `150%`, or a keyword.
fn parse_size(value: &str, current: SpanSize) -> Option<SpanSize> {
    let value = value.trim();

    let keyword_step = match value {
        "xx-small" => Some(-3),
        "x-small" => Some(-2),
        "small" => Some(-1),
        "medium" => Some(0),
        "large" => Some(1),
        "x-large" => Some(2),
        "xx-large" => Some(3),
        _ => None,
    };
    if let Some(step) = keyword_step {
        return Some(SpanSize {
            points: None,
            scale: SIZE_STEP.powi(step),
        });
    }

    match value {
        "larger" => {
            return Some(SpanSize {
                scale: current.scale * SIZE_STEP,
                ..current
            });
        }
        "smaller" => {
            return Some(SpanSize {
                scale: current.scale / SIZE_STEP,
                ..current
            });
        }
        _ => {}
    }

    if let Some(percent) = value.strip_suffix('%') {
        let factor: f32 = percent.trim().parse().ok()?;
        return (factor > 0.0).then_some(SpanSize {
            scale: current.scale * factor / 100.0,
            ..current
        });
    }

    let points = match value.strip_suffix("pt") {
        Some(pt) => pt.trim().parse::<f32>().ok()?,
        None => value.parse::<f32>().ok()? / 1024.0,
    };
    (points > 0.0).then_some(SpanSize {
        points: Some(points),
        scale: 1.0,
    })
}

fn parse_alpha(value: &str) -> Option<f64> {
    let value = value.trim();
    if let Some(percent) = value.strip_suffix('%') {
        let p: f64 = percent.trim().parse().ok()?;
        return Some((p / 100.0).clamp(0.0, 1.0));
    }
    let raw: u32 = value.parse().ok()?;
    Some((raw as f64 / 65535.0).clamp(0.0, 1.0))
}

/// Apply a font description string such as `"Serif Bold Italic 12"`.
///
/// Trailing words name the style, weight and size; the remaining leading
/// words form the family.
fn apply_font_desc(desc: &str, style: &mut SpanStyle) {
    let mut words: Vec<&str> = desc.split_whitespace().collect();

    while let Some(&last) = words.last() {
        let last_trimmed = last.trim_end_matches(',');
        if let Ok(points) = last_trimmed.trim_end_matches("px").parse::<f32>() {
            if points > 0.0 {
                style.size = SpanSize {
                    points: Some(points),
                    scale: 1.0,
                };
            }
        } else if let Some(slant) = FontStyle::from_name(last_trimmed)
            .filter(|s| s.is_slanted())
        {
            style.style = Some(slant);
        } else if last_trimmed.parse::<u16>().is_err()
            && let Some(weight) = FontWeight::from_name(last_trimmed)
        {
            style.weight = Some(weight);
        } else {
            break;
        }
        words.pop();
    }

    if !words.is_empty() {
        let family = words.join(" ");
        style.family = Some(family.trim_end_matches(',').to_string());
    }
}

/// Parse `key="value"` pairs, respecting quotes.
fn parse_attributes(attrs_str: &str) -> Result<Vec<(String, String)>, MarkupError> {
    let mut result = Vec::new();
    let mut rest = attrs_str.trim_start();

    while !rest.is_empty() {
        let eq = rest.find('=').ok_or(MarkupError::UnterminatedTag)?;
        let key = rest[..eq].trim().to_string();
        rest = rest[eq + 1..].trim_start();

        let quote = rest.chars().next().ok_or(MarkupError::UnterminatedTag)?;
        if quote != '"' && quote != '\'' {
            return Err(MarkupError::InvalidValue {
                attribute: key,
                value: rest.to_string(),
            });
        }
        let body = &rest[1..];
        let close = body.find(quote).ok_or(MarkupError::UnterminatedTag)?;
        let value = decode_entities(&body[..close])?;
        rest = body[close + 1..].trim_start();

        result.push((key, value));
    }

    Ok(result)
}

fn decode_entities(raw: &str) -> Result<String, MarkupError> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let end = rest[pos..]
            .find(';')
            .ok_or_else(|| MarkupError::InvalidEntity(rest[pos + 1..].to_string()))?;
        out.push(decode_entity(&rest[pos + 1..pos + end])?);
        rest = &rest[pos + end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn decode_entity(entity: &str) -> Result<char, MarkupError> {
    let decoded = match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => entity.strip_prefix('#').and_then(|num| {
            let code_point = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code_point).filter(|&c| c != '\0')
        }),
    };
    decoded.ok_or_else(|| MarkupError::InvalidEntity(entity.to_string()))
}

/// Parse a color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `#rrrrggggbbbb`, or a name.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    match value.strip_prefix('#') {
        Some(hex) => parse_hex_color(hex),
        None => parse_named_color(value),
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| -> Option<f64> {
        let max = (1u32 << (4 * s.len())) - 1;
        Some(u32::from_str_radix(s, 16).ok()? as f64 / max as f64)
    };

    match hex.len() {
        3 | 6 | 9 | 12 => {
            let n = hex.len() / 3;
            Some(Color::rgba(
                channel(&hex[..n])?,
                channel(&hex[n..2 * n])?,
                channel(&hex[2 * n..])?,
                1.0,
            ))
        }
        4 | 8 | 16 => {
            let n = hex.len() / 4;
            Some(Color::rgba(
                channel(&hex[..n])?,
                channel(&hex[n..2 * n])?,
                channel(&hex[2 * n..3 * n])?,
                channel(&hex[3 * n..])?,
            ))
        }
        _ => None,
    }
}

fn parse_named_color(name: &str) -> Option<Color> {
    let [r, g, b] = match name.to_ascii_lowercase().replace(' ', "").as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "green" => [0, 255, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "gray" | "grey" => [190, 190, 190],
        "silver" => [192, 192, 192],
        "maroon" => [176, 48, 96],
        "olive" => [128, 128, 0],
        "lime" => [0, 255, 0],
        "navy" | "navyblue" => [0, 0, 128],
        "purple" => [160, 32, 240],
        "teal" => [0, 128, 128],
        "orange" => [255, 165, 0],
        "pink" => [255, 192, 203],
        "brown" => [165, 42, 42],
        "gold" => [255, 215, 0],
        "coral" => [255, 127, 80],
        "crimson" => [220, 20, 60],
        "darkblue" => [0, 0, 139],
        "darkgreen" => [0, 100, 0],
        "darkred" => [139, 0, 0],
        "darkgray" | "darkgrey" => [169, 169, 169],
        "lightgray" | "lightgrey" => [211, 211, 211],
        "indigo" => [75, 0, 130],
        "violet" => [238, 130, 238],
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, 255))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text() {
        let markup = Markup::parse("Hello, World!").unwrap();
        assert_eq!(markup.plain_text(), "Hello, World!");
        assert_eq!(markup.spans().len(), 1);
        assert_eq!(markup.spans()[0].style, SpanStyle::default());
    }

    #[test]
    fn empty_markup_has_no_spans() {
        let markup = Markup::parse("").unwrap();
        assert!(markup.is_empty());
        assert!(markup.spans().is_empty());
    }

    #[test]
    fn nested_tags() {
        let markup = Markup::parse("a<b>b<i>c</i></b>d").unwrap();
        let spans = markup.spans();
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[1].style.weight, Some(FontWeight::BOLD));
        assert_eq!(spans[1].style.style, None);
        assert_eq!(spans[2].style.weight, Some(FontWeight::BOLD));
        assert_eq!(spans[2].style.style, Some(FontStyle::Italic));
        assert_eq!(spans[3].style, SpanStyle::default());
    }

    #[test]
    fn adjacent_equal_styles_merge() {
        let markup = Markup::parse("<b>a</b><b>b</b>").unwrap();
        assert_eq!(markup.spans().len(), 1);
        assert_eq!(markup.spans()[0].text, "ab");
    }

    #[test]
    fn span_attributes() {
        let markup = Markup::parse(
            "<span foreground='#00ff00' font_family=\"Serif\" weight='600' style='oblique' size='20480'>x</span>",
        )
        .unwrap();
        let style = &markup.spans()[0].style;
        assert_eq!(style.color, Some(Color::rgba(0.0, 1.0, 0.0, 1.0)));
        assert_eq!(style.family.as_deref(), Some("Serif"));
        assert_eq!(style.weight, Some(FontWeight::SEMI_BOLD));
        assert_eq!(style.style, Some(FontStyle::Oblique));
        assert_eq!(style.size.resolve(12.0), 20.0);
    }

    #[test]
    fn size_forms() {
        let base = SpanSize::default();
        assert_eq!(parse_size("14pt", base).unwrap().resolve(10.0), 14.0);
        assert_eq!(parse_size("150%", base).unwrap().resolve(10.0), 15.0);
        assert_eq!(parse_size("medium", base).unwrap().resolve(10.0), 10.0);
        assert!((parse_size("large", base).unwrap().resolve(10.0) - 12.0).abs() < 1e-4);
        assert!(parse_size("-3pt", base).is_none());
        assert!(parse_size("huge", base).is_none());

        let markup = Markup::parse("<big>a</big><small>b</small>").unwrap();
        assert!((markup.spans()[0].style.size.resolve(10.0) - 12.0).abs() < 1e-4);
        assert!(markup.spans()[1].style.size.resolve(12.0) < 12.0);
    }

    #[test]
    fn font_desc() {
        let mut style = SpanStyle::default();
        apply_font_desc("DejaVu Sans Bold Italic 16", &mut style);
        assert_eq!(style.family.as_deref(), Some("DejaVu Sans"));
        assert_eq!(style.weight, Some(FontWeight::BOLD));
        assert_eq!(style.style, Some(FontStyle::Italic));
        assert_eq!(style.size.points, Some(16.0));
    }

    #[test]
    fn entities() {
        let markup = Markup::parse("&lt;a&gt; &amp; &quot;&apos; &#65;&#x42;").unwrap();
        assert_eq!(markup.plain_text(), "<a> & \"' AB");
        assert!(matches!(
            Markup::parse("&nbsp;"),
            Err(MarkupError::InvalidEntity(_))
        ));
    }

    #[test]
    fn malformed_markup() {
        assert_eq!(
            Markup::parse("<b>x"),
            Err(MarkupError::Unclosed("b".to_string()))
        );
        assert!(matches!(
            Markup::parse("<b>x</i>"),
            Err(MarkupError::MismatchedClose { .. })
        ));
        assert!(matches!(
            Markup::parse("x</b>"),
            Err(MarkupError::UnexpectedClose(_))
        ));
        assert!(matches!(
            Markup::parse("<blink>x</blink>"),
            Err(MarkupError::UnknownTag(_))
        ));
        assert!(matches!(
            Markup::parse("<span bogus='1'>x</span>"),
            Err(MarkupError::UnknownAttribute { .. })
        ));
        assert_eq!(Markup::parse("<b"), Err(MarkupError::UnterminatedTag));
    }

    #[test]
    fn literal_fallback() {
        let markup = Markup::parse_or_literal("a < b");
        assert_eq!(markup.plain_text(), "a < b");
        assert_eq!(markup.spans().len(), 1);
    }

    #[test]
    fn colors() {
        assert_eq!(parse_color("#fff"), Some(Color::WHITE));
        assert_eq!(parse_color("#000000"), Some(Color::BLACK));
        assert_eq!(parse_color("#ffffffffffff"), Some(Color::WHITE));
        assert_eq!(parse_color("#ff000000").map(|c| c.a), Some(0.0));
        assert_eq!(parse_color("red"), Some(Color::rgba(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("#ggg"), None);
        assert_eq!(parse_color("nocolor"), None);
    }

    #[test]
    fn alpha_override() {
        let markup = Markup::parse("<span alpha='50%'>x</span>").unwrap();
        let color = markup.spans()[0].style.effective_color(Color::BLACK);
        assert_eq!(color.a, 0.5);
    }
}
