//! Stroke overlay layer.

use svg::node::element::{Group, Path, SVG};

use super::Component;
use crate::stroke::{GHOST_FILL, STROKE_VIEWBOX, StrokeOverlay};

/// Share of the cell side the stroke box occupies.
pub const STROKE_INSET: f32 = 0.85;

/// Mirrors the 1024 box vertically before compositing into the cell.
pub const MIRROR_TRANSFORM: &str = "matrix(1 0 0 -1 0 1024)";

/// Renders a [`StrokeOverlay`], centered and scaled to the cell.
pub struct StrokeLayer<'a> {
    overlay: &'a StrokeOverlay,
}

impl<'a> StrokeLayer<'a> {
    pub fn new(overlay: &'a StrokeOverlay) -> Self {
        Self { overlay }
    }
}

impl Component for StrokeLayer<'_> {
    fn emit(&self, size: f32) -> Group {
        let side = size * STROKE_INSET;
        let offset = (size - side) / 2.0;

        let mut paths = Group::new()
            .set("transform", MIRROR_TRANSFORM)
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round");

        for ghost in &self.overlay.ghost {
            paths = paths.add(
                Path::new()
                    .set("class", "ghost")
                    .set("d", ghost.as_str())
                    .set("fill", GHOST_FILL),
            );
        }

        for stroke in &self.overlay.strokes {
            let mut path = Path::new()
                .set("d", stroke.path.as_str())
                .set("fill", stroke.fill);
            if stroke.opacity < 1.0 {
                path = path.set("opacity", stroke.opacity);
            }
            paths = paths.add(path);
        }

        let frame = SVG::new()
            .set("x", offset)
            .set("y", offset)
            .set("width", side)
            .set("height", side)
            .set("viewBox", format!("0 0 {} {}", STROKE_VIEWBOX, STROKE_VIEWBOX))
            .add(paths);

        Group::new()
            .set("class", format!("strokes {}", self.overlay.mode))
            .add(frame)
    }
}
