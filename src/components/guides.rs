//! Guide lines for tian-zi-ge and mi-zi-ge cells.

use svg::node::element::{Group, Line};

use super::Component;
use crate::config::GridStyle;

/// Dash pattern for all guide lines.
pub const GUIDE_DASH: &str = "2 2";

/// Guide line stroke width in pixels.
pub const GUIDE_WIDTH: f32 = 0.5;

/// Dashed guide lines for a grid style.
///
/// | Style | Lines |
/// |-------|-------|
/// | `tian` | horizontal + vertical midline |
/// | `mi` | midlines + both diagonals |
/// | `none` | nothing |
pub struct GuideLines<'a> {
    style: GridStyle,
    color: &'a str,
}

impl<'a> GuideLines<'a> {
    pub fn new(style: GridStyle, color: &'a str) -> Self {
        Self { style, color }
    }

    /// Line segments `(x1, y1, x2, y2)` for a cell of side `size`.
    pub fn segments(&self, size: f32) -> Vec<(f32, f32, f32, f32)> {
        let half = size / 2.0;
        let midlines = [(0.0, half, size, half), (half, 0.0, half, size)];
        let diagonals = [(0.0, 0.0, size, size), (size, 0.0, 0.0, size)];

        match self.style {
            GridStyle::None => Vec::new(),
            GridStyle::Tian => midlines.to_vec(),
            GridStyle::Mi => midlines.into_iter().chain(diagonals).collect(),
        }
    }
}

impl Component for GuideLines<'_> {
    fn emit(&self, size: f32) -> Group {
        let mut group = Group::new()
            .set("class", "guides")
            .set("stroke", self.color)
            .set("stroke-width", GUIDE_WIDTH)
            .set("stroke-dasharray", GUIDE_DASH);

        for (x1, y1, x2, y2) in self.segments(size) {
            group = group.add(
                Line::new()
                    .set("x1", x1)
                    .set("y1", y1)
                    .set("x2", x2)
                    .set("y2", y2),
            );
        }
        group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_has_no_lines() {
        assert!(GuideLines::new(GridStyle::None, "#000").segments(56.0).is_empty());
    }

    #[test]
    fn test_tian_midlines_only() {
        let segs = GuideLines::new(GridStyle::Tian, "#000").segments(56.0);
        assert_eq!(segs, vec![(0.0, 28.0, 56.0, 28.0), (28.0, 0.0, 28.0, 56.0)]);
    }

    #[test]
    fn test_mi_adds_diagonals() {
        let segs = GuideLines::new(GridStyle::Mi, "#000").segments(40.0);
        assert_eq!(segs.len(), 4);
        assert!(segs.contains(&(0.0, 0.0, 40.0, 40.0)));
        assert!(segs.contains(&(40.0, 0.0, 0.0, 40.0)));
    }

    #[test]
    fn test_emit_dashed_in_accent() {
        let svg = GuideLines::new(GridStyle::Mi, "#F87171").emit(56.0).to_string();
        assert!(svg.contains("stroke=\"#F87171\""));
        assert!(svg.contains("stroke-dasharray=\"2 2\""));
        assert_eq!(svg.matches("<line").count(), 4);
    }
}
