//! Per-character rectangles of a committed layout.
//!
//! A cluster is one grapheme that produced at least one glyph. Its
//! horizontal extent is the union of its glyph advances; a ligature glyph
//! covering several graphemes is split evenly between them. Its vertical
//! extent is the band of the line it sits on.
//!
//! Clusters are visited in paint order: left to right within a line, lines
//! top to bottom. Line assignment relies on that order (see
//! [`assign_lines`]).

use std::ops::Range;

use cosmic_text::LayoutGlyph;
use unicode_segmentation::{GraphemeCursor, UnicodeSegmentation};

use super::layout::{LineBand, TextLayout};
use super::resolver::CommittedLayout;

/// A cluster rectangle in output pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClusterRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Result of a cluster query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClusterRects {
    /// At most `capacity` rectangles.
    pub rects: Vec<ClusterRect>,
    /// Number of clusters in the layout.
    pub total: usize,
    /// Whether clusters were dropped because `capacity` was too small.
    pub truncated: bool,
}

impl ClusterRects {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// A cluster in layout space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LayoutCluster {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub height: f32,
}

impl LayoutCluster {
    fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Grapheme extents collected while walking one line's glyphs.
struct Grapheme {
    range: Range<usize>,
    extent: Option<(f32, f32)>,
}

impl Grapheme {
    fn extend(&mut self, left: f32, right: f32) {
        self.extent = Some(match self.extent {
            None => (left, right),
            Some((l, r)) => (l.min(left), r.max(right)),
        });
    }
}

/// Clusters of a layout in paint order.
pub(crate) fn collect_clusters(layout: &TextLayout) -> Vec<LayoutCluster> {
    let mut clusters = Vec::new();

    for run in layout.buffer().layout_runs() {
        let Some(bytes) = run_bytes(run.text, run.glyphs) else {
            continue;
        };
        // `run.text` is the whole paragraph; only this line's slice matters.
        let mut graphemes: Vec<Grapheme> = run.text[bytes.clone()]
            .grapheme_indices(true)
            .filter(|(_, g)| !is_line_break(g) && !layout.is_direction_mark(g))
            .map(|(offset, g)| {
                let start = bytes.start + offset;
                Grapheme {
                    range: start..start + g.len(),
                    extent: None,
                }
            })
            .collect();

        for glyph in run.glyphs.iter() {
            let first = graphemes.partition_point(|g| g.range.start < glyph.start);
            let last = graphemes.partition_point(|g| g.range.start < glyph.end);

            if first == last {
                // A mark glyph inside a grapheme that started earlier.
                if let Some(g) = first.checked_sub(1).map(|i| &mut graphemes[i])
                    && g.range.contains(&glyph.start)
                {
                    g.extend(glyph.x, glyph.x + glyph.w);
                }
                continue;
            }

            let n = last - first;
            let share = glyph.w / n as f32;
            for (k, g) in graphemes[first..last].iter_mut().enumerate() {
                let slot = if glyph.level.is_rtl() { n - 1 - k } else { k };
                let left = glyph.x + share * slot as f32;
                g.extend(left, left + share);
            }
        }

        let start = clusters.len();
        clusters.extend(graphemes.into_iter().filter_map(|g| {
            g.extent.map(|(left, right)| LayoutCluster {
                left,
                right,
                top: run.line_top,
                height: run.line_height,
            })
        }));
        clusters[start..].sort_by(|a, b| a.left.total_cmp(&b.left));
    }

    clusters
}

/// Byte range of `text` covered by a line's glyphs, widened to grapheme
/// boundaries.
fn run_bytes(text: &str, glyphs: &[LayoutGlyph]) -> Option<Range<usize>> {
    let start = glyphs.iter().map(|g| g.start).min()?;
    let end = glyphs.iter().map(|g| g.end).max()?.min(text.len());
    if start >= end {
        return None;
    }

    let mut cursor = GraphemeCursor::new(start, text.len(), true);
    let start = match cursor.is_boundary(text, 0) {
        Ok(true) => start,
        _ => cursor.prev_boundary(text, 0).ok().flatten().unwrap_or(0),
    };
    let mut cursor = GraphemeCursor::new(end, text.len(), true);
    let end = match cursor.is_boundary(text, 0) {
        Ok(true) => end,
        _ => cursor.next_boundary(text, 0).ok().flatten().unwrap_or(text.len()),
    };
    Some(start..end)
}

fn is_line_break(grapheme: &str) -> bool {
    matches!(grapheme, "\n" | "\r" | "\r\n" | "\u{2029}" | "\u{2028}")
}

/// Contiguous cluster index range of every line band.
///
/// Clusters must be visited in non-decreasing line order: each cluster is
/// matched against the bands from the current one onwards. A cluster that
/// fits no remaining band is clamped to the last matched line, so the
/// ranges always partition `clusters`.
pub(crate) fn assign_lines(clusters: &[LayoutCluster], bands: &[LineBand]) -> Vec<Range<usize>> {
    let mut ranges = vec![0..0; bands.len()];
    if bands.is_empty() {
        return ranges;
    }

    let mut current = 0;
    let mut line_of = Vec::with_capacity(clusters.len());
    for cluster in clusters {
        let y = cluster.center_y();
        if let Some(found) = (current..bands.len()).find(|&i| bands[i].contains_y(y)) {
            current = found;
        }
        line_of.push(current);
    }

    for (line, range) in ranges.iter_mut().enumerate() {
        let start = line_of.partition_point(|&l| l < line);
        let end = line_of.partition_point(|&l| l <= line);
        *range = start..end;
    }
    ranges
}

/// Rectangles of the first `capacity` clusters, placed as they are painted
/// in a `width` x `height` surface.
///
/// When the first line is right-to-left the rectangles of every line are
/// reversed, so each line reads in text order.
pub fn cluster_rects(
    layout: &CommittedLayout,
    width: u32,
    height: u32,
    capacity: usize,
) -> ClusterRects {
    if layout.character_count() == 0 {
        return ClusterRects::empty();
    }

    let clusters = collect_clusters(layout.layout());
    let total = clusters.len();
    let visible = &clusters[..total.min(capacity)];

    let (offset_x, offset_y) = layout.paint_offset(width, height);
    let (ox, oy) = (offset_x.floor() as f32, offset_y.floor() as f32);
    let mut rects: Vec<ClusterRect> = visible
        .iter()
        .map(|c| {
            let (left, right) = ((c.left + ox).round(), (c.right + ox).round());
            let (top, bottom) = ((c.top + oy).round(), (c.top + c.height + oy).round());
            ClusterRect {
                x: left as i32,
                y: top as i32,
                width: (right - left) as i32,
                height: (bottom - top) as i32,
            }
        })
        .collect();

    let bands = layout.layout().lines();
    if bands.first().is_some_and(|band| band.rtl) {
        for range in assign_lines(visible, bands) {
            rects[range].reverse();
        }
    }

    ClusterRects {
        rects,
        total,
        truncated: total > capacity,
    }
}

/// Number of clusters in a layout.
pub fn count_clusters(layout: &TextLayout) -> usize {
    collect_clusters(layout).len()
}
