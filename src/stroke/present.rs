//! Stroke presentation: which strokes a cell shows, and how.
//!
//! ## Reveal Modes
//!
//! | Mode | Strokes shown | Fill | Opacity | Ghost layer |
//! |------|---------------|------|---------|-------------|
//! | `full` | first `visible_count` | black | 1.0 | no |
//! | `step` | first `visible_count` | grey, last one red | 1.0 | all strokes, pale |
//! | `trace` | first `visible_count` | black | 0.15 | no |
//!
//! `step` is the decomposition cell: every earlier stroke in a muted grey,
//! the stroke being taught in the highlight color, and the whole character
//! faintly underneath so the learner sees where it is heading.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::StrokePath;
use crate::error::SheetError;

/// Ink for complete and tracing strokes.
pub const INK_FILL: &str = "#000000";

/// Ghost layer fill (slate-100).
pub const GHOST_FILL: &str = "#F1F5F9";

/// Already-written strokes in a step cell (slate-400).
pub const DRAWN_FILL: &str = "#94A3B8";

/// The stroke being taught in a step cell (red-500).
pub const CURRENT_FILL: &str = "#EF4444";

/// Opacity of the tracing guide, strokes and font glyph alike.
pub const TRACE_OPACITY: f32 = 0.15;

/// How a stroke overlay reveals its strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealMode {
    /// Progressive decomposition with ghost layer and highlighted newest stroke
    Step,
    /// Solid reference rendering
    Full,
    /// Faint guide to write over
    Trace,
}

impl fmt::Display for RevealMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RevealMode::Step => "step",
            RevealMode::Full => "full",
            RevealMode::Trace => "trace",
        })
    }
}

impl FromStr for RevealMode {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "step" => Ok(RevealMode::Step),
            "full" => Ok(RevealMode::Full),
            "trace" => Ok(RevealMode::Trace),
            other => Err(SheetError::InvalidConfig(format!(
                "Unknown reveal mode '{}' (expected step, full or trace)",
                other
            ))),
        }
    }
}

/// One visible stroke with its paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentedStroke {
    pub path: StrokePath,
    pub fill: &'static str,
    pub opacity: f32,
}

/// Everything a cell needs to draw its strokes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeOverlay {
    pub mode: RevealMode,
    pub visible_count: usize,
    /// Drawn beneath `strokes` in [`GHOST_FILL`]; empty unless `mode` is step
    pub ghost: Vec<StrokePath>,
    pub strokes: Vec<PresentedStroke>,
}

/// Compute the overlay for `visible_count` strokes of `strokes` in `mode`.
///
/// Returns `None` when there are no strokes at all; callers show a loading
/// or error indicator instead. A `visible_count` beyond the stroke count is
/// treated as the full count.
///
/// ```
/// use hanzi_sheet::stroke::{present, RevealMode, StrokePath, CURRENT_FILL};
///
/// let strokes: Vec<StrokePath> = ["M 0 0 Z", "M 1 1 Z", "M 2 2 Z"]
///     .into_iter()
///     .map(StrokePath::new)
///     .collect();
///
/// let overlay = present(&strokes, 2, RevealMode::Step).unwrap();
/// assert_eq!(overlay.ghost.len(), 3);
/// assert_eq!(overlay.strokes.len(), 2);
/// assert_eq!(overlay.strokes[1].fill, CURRENT_FILL);
/// ```
pub fn present(strokes: &[StrokePath], visible_count: usize, mode: RevealMode) -> Option<StrokeOverlay> {
    if strokes.is_empty() {
        return None;
    }
    let visible_count = visible_count.min(strokes.len());

    let ghost = match mode {
        RevealMode::Step => strokes.to_vec(),
        RevealMode::Full | RevealMode::Trace => Vec::new(),
    };

    let visible = strokes[..visible_count]
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let (fill, opacity) = paint(mode, i == visible_count - 1);
            PresentedStroke {
                path: path.clone(),
                fill,
                opacity,
            }
        })
        .collect();

    Some(StrokeOverlay {
        mode,
        visible_count,
        ghost,
        strokes: visible,
    })
}

fn paint(mode: RevealMode, is_current: bool) -> (&'static str, f32) {
    match mode {
        RevealMode::Full => (INK_FILL, 1.0),
        RevealMode::Trace => (INK_FILL, TRACE_OPACITY),
        RevealMode::Step if is_current => (CURRENT_FILL, 1.0),
        RevealMode::Step => (DRAWN_FILL, 1.0),
    }
}
