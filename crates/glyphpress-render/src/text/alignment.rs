//! Placement of a layout inside an output surface.

use super::bidi::TextDirection;
use super::layout::{HorizontalAlign, VerticalAlign};
use super::resolver::Padding;

/// Offset at which a layout's origin is painted inside a surface.
///
/// Alignment is relative to the reading direction: for right-to-left text
/// `Start` places the layout against the right edge and `End` against the
/// left edge. The result may be negative when the layout is larger than the
/// usable area.
///
/// Painting and cluster geometry both position content with this function,
/// so exported rectangles line up with painted glyphs.
///
/// # Example
///
/// ```
/// use glyphpress_render::text::{
///     paint_offset, HorizontalAlign, Padding, TextDirection, VerticalAlign,
/// };
///
/// let padding = Padding::new(2, 2, 1, 1);
/// let (x, y) = paint_offset(
///     100, 40,
///     HorizontalAlign::Start, VerticalAlign::Middle,
///     padding, TextDirection::RightToLeft,
///     50.0, 20.0,
/// );
/// assert_eq!((x, y), (48.0, 10.0));
/// ```
#[allow(clippy::too_many_arguments)]
pub fn paint_offset(
    surface_width: u32,
    surface_height: u32,
    horizontal: HorizontalAlign,
    vertical: VerticalAlign,
    padding: Padding,
    direction: TextDirection,
    layout_width: f32,
    layout_height: f32,
) -> (f64, f64) {
    let horizontal = if direction.is_rtl() {
        match horizontal {
            HorizontalAlign::Start => HorizontalAlign::End,
            HorizontalAlign::End => HorizontalAlign::Start,
            HorizontalAlign::Center => HorizontalAlign::Center,
        }
    } else {
        horizontal
    };

    let usable_width = surface_width as f64 - padding.left as f64 - padding.right as f64;
    let usable_height = surface_height as f64 - padding.top as f64 - padding.bottom as f64;
    let (layout_width, layout_height) = (layout_width as f64, layout_height as f64);

    let x = padding.left as f64
        + match horizontal {
            HorizontalAlign::Start => 0.0,
            HorizontalAlign::Center => (usable_width - layout_width) / 2.0,
            HorizontalAlign::End => usable_width - layout_width,
        };
    let y = padding.top as f64
        + match vertical {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Middle => (usable_height - layout_height) / 2.0,
            VerticalAlign::Bottom => usable_height - layout_height,
        };

    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_PADDING: Padding = Padding::ZERO;

    #[test]
    fn start_top_is_padding_origin() {
        let padding = Padding::new(3, 4, 5, 6);
        let offset = paint_offset(
            100,
            50,
            HorizontalAlign::Start,
            VerticalAlign::Top,
            padding,
            TextDirection::LeftToRight,
            40.0,
            10.0,
        );
        assert_eq!(offset, (3.0, 5.0));
    }

    #[test]
    fn center_and_end() {
        let center = paint_offset(
            100,
            50,
            HorizontalAlign::Center,
            VerticalAlign::Middle,
            NO_PADDING,
            TextDirection::LeftToRight,
            40.0,
            10.0,
        );
        assert_eq!(center, (30.0, 20.0));

        let end = paint_offset(
            100,
            50,
            HorizontalAlign::End,
            VerticalAlign::Bottom,
            NO_PADDING,
            TextDirection::LeftToRight,
            40.0,
            10.0,
        );
        assert_eq!(end, (60.0, 40.0));
    }

    #[test]
    fn rtl_mirrors_start_and_end() {
        let args = |h, dir| {
            paint_offset(100, 50, h, VerticalAlign::Top, NO_PADDING, dir, 40.0, 10.0).0
        };
        assert_eq!(
            args(HorizontalAlign::Start, TextDirection::RightToLeft),
            args(HorizontalAlign::End, TextDirection::LeftToRight)
        );
        assert_eq!(
            args(HorizontalAlign::End, TextDirection::RightToLeft),
            args(HorizontalAlign::Start, TextDirection::LeftToRight)
        );
        assert_eq!(
            args(HorizontalAlign::Center, TextDirection::RightToLeft),
            args(HorizontalAlign::Center, TextDirection::LeftToRight)
        );
    }

    #[test]
    fn oversized_layout_goes_negative() {
        let (x, y) = paint_offset(
            10,
            10,
            HorizontalAlign::Center,
            VerticalAlign::Middle,
            NO_PADDING,
            TextDirection::LeftToRight,
            30.0,
            20.0,
        );
        assert_eq!((x, y), (-10.0, -5.0));
    }
}
