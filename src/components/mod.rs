//! # Cell Components
//!
//! SVG building blocks for a single practice cell.
//!
//! ## Layering
//!
//! A [`GridCell`] stacks its layers back to front:
//!
//! ```text
//! border ─► guide lines ─► font glyph ─► stroke overlay
//! ```
//!
//! ```
//! use hanzi_sheet::components::GridCell;
//! use hanzi_sheet::config::GridStyle;
//!
//! let svg = GridCell::new(GridStyle::Tian, "#F87171", 56)
//!     .content('永')
//!     .opacity(0.15)
//!     .to_svg_string();
//!
//! assert!(svg.contains("永"));
//! ```
//!
//! ## Component Trait
//!
//! Each layer implements [`Component`], emitting an SVG group in the
//! cell's own pixel coordinates (origin top-left, side `size`).

mod cell;
mod glyph;
mod guides;
mod strokes;

pub use cell::*;
pub use glyph::*;
pub use guides::*;
pub use strokes::*;

use svg::node::element::Group;

/// Trait for cell layers.
pub trait Component {
    /// Emit this layer for a cell of side `size` pixels.
    fn emit(&self, size: f32) -> Group;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridStyle;
    use crate::stroke::{RevealMode, StrokePath, present};

    #[test]
    fn test_layers_as_trait_objects() {
        let strokes = vec![StrokePath::new("M 0 0 L 9 9 Z")];
        let overlay = present(&strokes, 1, RevealMode::Trace).unwrap();
        let guides = GuideLines::new(GridStyle::Tian, "#F87171");
        let glyph = Glyph::new('一', "serif");
        let layer = StrokeLayer::new(&overlay);
        let layers: [&dyn Component; 3] = [&guides, &glyph, &layer];

        let svgs: Vec<String> = layers
            .iter()
            .map(|layer| layer.emit(56.0).to_string())
            .collect();
        assert!(svgs[0].contains("class=\"guides\""));
        assert!(svgs[1].contains("class=\"glyph\""));
        assert!(svgs[2].contains("class=\"strokes trace\""));
    }
}
