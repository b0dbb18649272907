//! Font-rendered glyph layer.

use svg::node::element::{Group, Text};

use super::Component;

/// Glyph height relative to the cell side.
pub const GLYPH_SCALE: f32 = 0.8;

/// A single character drawn from a font, centered in the cell.
pub struct Glyph<'a> {
    character: char,
    opacity: f32,
    font_family: &'a str,
}

impl<'a> Glyph<'a> {
    pub fn new(character: char, font_family: &'a str) -> Self {
        Self {
            character,
            opacity: 1.0,
            font_family,
        }
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

impl Component for Glyph<'_> {
    fn emit(&self, size: f32) -> Group {
        let half = size / 2.0;
        // Attribute values are double-quoted, so family names use single quotes.
        let family = self.font_family.replace('"', "'");

        Group::new().set("class", "glyph").add(
            Text::new()
                .add(svg::node::Text::new(self.character.to_string()))
                .set("x", half)
                .set("y", half)
                .set("text-anchor", "middle")
                .set("dominant-baseline", "central")
                .set("font-size", size * GLYPH_SCALE)
                .set("font-family", family)
                .set("fill", "black")
                .set("opacity", self.opacity),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_centered_and_scaled() {
        let svg = Glyph::new('好', r#""Kaiti", serif"#).opacity(0.15).emit(50.0).to_string();
        assert!(svg.contains("好"));
        assert!(svg.contains("x=\"25\""));
        assert!(svg.contains("font-size=\"40\""));
        assert!(svg.contains("opacity=\"0.15\""));
        assert!(svg.contains("font-family=\"'Kaiti', serif\""));
    }
}
