//! # Grid Cell
//!
//! One fixed-size square practice cell.

use svg::node::element::{Rectangle, SVG};

use super::{Component, Glyph, GuideLines, StrokeLayer};
use crate::config::{DEFAULT_FONT_FAMILY, GridStyle};
use crate::stroke::StrokeOverlay;

/// Border stroke width in pixels.
pub const BORDER_WIDTH: f32 = 0.5;

/// A square practice cell.
///
/// ## Example
///
/// ```
/// use hanzi_sheet::components::GridCell;
/// use hanzi_sheet::config::GridStyle;
///
/// let blank = GridCell::new(GridStyle::Mi, "#F87171", 56);
/// let reference = GridCell::new(GridStyle::Mi, "#F87171", 56)
///     .content('字')
///     .font_family("serif");
///
/// assert_eq!(blank.to_svg_string().matches("<line").count(), 4);
/// assert!(reference.to_svg_string().contains("字"));
/// ```
pub struct GridCell<'a> {
    style: GridStyle,
    color: &'a str,
    size: u32,
    content: Option<char>,
    opacity: f32,
    font_family: &'a str,
    overlay: Option<&'a StrokeOverlay>,
}

impl<'a> GridCell<'a> {
    /// Create an empty cell.
    pub fn new(style: GridStyle, color: &'a str, size: u32) -> Self {
        Self {
            style,
            color,
            size,
            content: None,
            opacity: 1.0,
            font_family: DEFAULT_FONT_FAMILY,
            overlay: None,
        }
    }

    /// Draw `character` from the font in the middle of the cell.
    pub fn content(mut self, character: char) -> Self {
        self.content = Some(character);
        self
    }

    /// Opacity of the font glyph.
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn font_family(mut self, family: &'a str) -> Self {
        self.font_family = family;
        self
    }

    /// Draw stroke outlines on top of everything else.
    pub fn overlay(mut self, overlay: &'a StrokeOverlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Build the SVG element.
    pub fn render(&self) -> SVG {
        let size = self.size as f32;

        let mut cell = SVG::new()
            .set("xmlns", "http://www.w3.org/2000/svg")
            .set("class", "cell")
            .set("width", self.size)
            .set("height", self.size)
            .set("viewBox", format!("0 0 {} {}", self.size, self.size))
            .add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", self.size)
                    .set("height", self.size)
                    .set("fill", "white")
                    .set("stroke", self.color)
                    .set("stroke-width", BORDER_WIDTH),
            );

        if self.style != GridStyle::None {
            cell = cell.add(GuideLines::new(self.style, self.color).emit(size));
        }

        if let Some(character) = self.content {
            cell = cell.add(
                Glyph::new(character, self.font_family)
                    .opacity(self.opacity)
                    .emit(size),
            );
        }

        if let Some(overlay) = self.overlay {
            cell = cell.add(StrokeLayer::new(overlay).emit(size));
        }

        cell
    }

    /// Render to an SVG string.
    pub fn to_svg_string(&self) -> String {
        self.render().to_string()
    }
}
