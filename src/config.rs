//! # Worksheet Configuration
//!
//! Everything a worksheet render reads: grid style, which cell groups to
//! show, cell geometry and the reference font.
//!
//! ## Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | grid_style | `mi` |
//! | show_pinyin / show_meaning / show_tracing / show_stroke_order | `true` |
//! | grid_count | 4 |
//! | grid_color | `#F87171` |
//! | cell_size | 56 px |
//! | use_font_for_reference | `false` |
//!
//! ## Usage
//!
//! ```
//! use hanzi_sheet::config::{GridStyle, WorksheetConfig};
//!
//! let config = WorksheetConfig {
//!     grid_style: GridStyle::Tian,
//!     grid_count: 42,
//!     ..Default::default()
//! }
//! .sanitized();
//!
//! assert_eq!(config.grid_count, 10);
//! ```
//!
//! A config value is never mutated by the renderer. Callers hold one
//! snapshot and pass `&WorksheetConfig` into every composition call; a
//! change is a new snapshot followed by a re-render.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SheetError;

/// Upper bound for blank practice cells per row.
pub const MAX_GRID_COUNT: u32 = 10;

/// Smallest cell side accepted as-is, in pixels.
pub const MIN_CELL_SIZE: u32 = 16;

/// Largest cell side accepted as-is, in pixels.
pub const MAX_CELL_SIZE: u32 = 200;

/// Cell size used when the requested one is unusable.
pub const FALLBACK_CELL_SIZE: u32 = 32;

pub const DEFAULT_GRID_COLOR: &str = "#F87171";

pub const DEFAULT_TITLE: &str = "汉字笔顺同步练习 (STROKE ORDER)";

pub const DEFAULT_FONT_FAMILY: &str = r#""Kaiti", "STKaiti", "楷体", serif"#;

/// Guide-line layout drawn inside every cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridStyle {
    /// 田字格: horizontal and vertical midlines
    Tian,
    /// 米字格: midlines plus both diagonals
    #[default]
    Mi,
    /// No guide lines
    None,
}

impl GridStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridStyle::Tian => "tian",
            GridStyle::Mi => "mi",
            GridStyle::None => "none",
        }
    }
}

impl fmt::Display for GridStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridStyle {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tian" | "tianzige" | "tian-zi-ge" => Ok(GridStyle::Tian),
            "mi" | "mizige" | "mi-zi-ge" => Ok(GridStyle::Mi),
            "none" | "blank" => Ok(GridStyle::None),
            other => Err(SheetError::InvalidConfig(format!(
                "Unknown grid style '{}' (expected tian, mi or none)",
                other
            ))),
        }
    }
}

/// A named reference font choice.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FontPreset {
    /// Display label
    pub label: &'static str,
    /// CSS font-family value
    pub family: &'static str,
}

/// Reference fonts offered by the UI and CLI, default first.
pub const FONT_PRESETS: &[FontPreset] = &[
    FontPreset {
        label: "楷体 (Default Kaiti)",
        family: DEFAULT_FONT_FAMILY,
    },
    FontPreset {
        label: "马山正 (Brush Style)",
        family: r#""Ma Shan Zheng", cursive"#,
    },
    FontPreset {
        label: "宋体 (Noto Serif Song)",
        family: r#""Noto Serif SC", serif"#,
    },
    FontPreset {
        label: "小薇 (XiaoWei Stylized)",
        family: r#""ZCOOL XiaoWei", serif"#,
    },
    FontPreset {
        label: "黑体 (Modern Sans-serif)",
        family: "sans-serif",
    },
];

/// Shared worksheet settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorksheetConfig {
    pub grid_style: GridStyle,
    pub show_pinyin: bool,
    pub show_meaning: bool,
    pub show_tracing: bool,
    pub show_stroke_order: bool,
    /// Blank practice cells appended to every row
    pub grid_count: u32,
    /// Guide-line and border color (hex)
    pub grid_color: String,
    /// Cell side in pixels
    pub cell_size: u32,
    pub title: String,
    /// CSS font-family for font-rendered glyphs
    pub font_family: String,
    /// Render the reference and trace cells from the font instead of stroke paths
    pub use_font_for_reference: bool,
}

impl Default for WorksheetConfig {
    fn default() -> Self {
        Self {
            grid_style: GridStyle::Mi,
            show_pinyin: true,
            show_meaning: true,
            show_tracing: true,
            show_stroke_order: true,
            grid_count: 4,
            grid_color: DEFAULT_GRID_COLOR.to_string(),
            cell_size: 56,
            title: DEFAULT_TITLE.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            use_font_for_reference: false,
        }
    }
}

impl WorksheetConfig {
    /// Repair out-of-range values instead of rejecting them.
    ///
    /// - `grid_count` is clamped to `0..=10`
    /// - an unusable `cell_size` falls back to 32
    /// - a non-hex `grid_color` falls back to the default accent
    /// - markup and CSS punctuation is stripped from `font_family`; a blank
    ///   family falls back to the default
    pub fn sanitized(mut self) -> Self {
        self.grid_count = self.grid_count.min(MAX_GRID_COUNT);
        if !(MIN_CELL_SIZE..=MAX_CELL_SIZE).contains(&self.cell_size) {
            self.cell_size = FALLBACK_CELL_SIZE;
        }
        if !is_hex_color(&self.grid_color) {
            self.grid_color = DEFAULT_GRID_COLOR.to_string();
        }
        self.font_family.retain(|c| !matches!(c, '<' | '>' | '&' | '{' | '}' | ';'));
        if self.font_family.trim().is_empty() {
            self.font_family = DEFAULT_FONT_FAMILY.to_string();
        }
        self
    }
}

/// Parse free-text cell size input, falling back to 32 when it is not a
/// usable number.
///
/// ```
/// use hanzi_sheet::config::parse_cell_size;
///
/// assert_eq!(parse_cell_size("64"), 64);
/// assert_eq!(parse_cell_size("abc"), 32);
/// assert_eq!(parse_cell_size("0"), 32);
/// ```
pub fn parse_cell_size(input: &str) -> u32 {
    match input.trim().parse::<u32>() {
        Ok(size) if (MIN_CELL_SIZE..=MAX_CELL_SIZE).contains(&size) => size,
        _ => FALLBACK_CELL_SIZE,
    }
}

/// `#rgb` or `#rrggbb`.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// # A4 Page Geometry
///
/// The exported worksheet is laid out on a fixed-width page so that
/// print-to-PDF reproduces the on-screen layout.
///
/// ```text
/// ├─ 20mm ─┼──────── 170mm content ────────┼─ 20mm ─┤
/// │ margin │                               │ margin │
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    /// Page name
    pub name: &'static str,
    pub width_mm: f32,
    pub height_mm: f32,
    /// Horizontal and vertical page margin
    pub margin_mm: f32,
}

impl PageGeometry {
    pub const A4: Self = Self {
        name: "A4",
        width_mm: 210.0,
        height_mm: 297.0,
        margin_mm: 20.0,
    };

    /// Printable width in millimeters
    #[inline]
    pub fn content_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    /// Printable width in CSS pixels (96 px per inch)
    #[inline]
    pub fn content_width_px(&self) -> f32 {
        self.content_width_mm() * 96.0 / 25.4
    }
}
