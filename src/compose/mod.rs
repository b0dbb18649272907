//! # Character Row Composer
//!
//! Turns one character (annotation + stroke-data state + config snapshot)
//! into the header and ordered cell list of its worksheet row.
//!
//! ## Row Layout
//!
//! ```text
//! ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//! │ ref │ 1   │ 1-2 │ ... │ 1-k │trace│blank│blank│
//! └─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//!   1   +   k decomposition   +  1    +  grid_count
//! ```
//!
//! Decomposition cells appear only with `show_stroke_order`, the trace
//! cell only with `show_tracing`. An errored row keeps only its blank
//! cells and carries an inline notice; a loading row has no cells yet.

use serde::Serialize;

use crate::components::GridCell;
use crate::config::{GridStyle, WorksheetConfig};
use crate::provider::Annotation;
use crate::stroke::{RevealMode, StrokeOverlay, StrokeSet, TRACE_OPACITY, present};

/// Meaning text longer than this is cut for display.
pub const MEANING_DISPLAY_CHARS: usize = 32;

/// Stroke-data state of one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowState {
    /// Fetch still outstanding
    Loading,
    Ready(StrokeSet),
    /// Fetch failed; terminal until the worksheet is regenerated
    Errored,
}

/// What a cell is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CellKind {
    Reference,
    /// Decomposition cell revealing strokes `0..=index`
    Step { index: usize },
    Trace,
    Blank,
}

/// Parameters for one rendered cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellDescriptor {
    #[serde(flatten)]
    pub kind: CellKind,
    pub grid_style: GridStyle,
    pub color: String,
    pub size: u32,
    pub content: Option<char>,
    pub content_opacity: f32,
    pub overlay: Option<StrokeOverlay>,
}

impl CellDescriptor {
    fn new(kind: CellKind, config: &WorksheetConfig) -> Self {
        Self {
            kind,
            grid_style: config.grid_style,
            color: config.grid_color.clone(),
            size: config.cell_size,
            content: None,
            content_opacity: 1.0,
            overlay: None,
        }
    }

    fn with_content(mut self, character: char, opacity: f32) -> Self {
        self.content = Some(character);
        self.content_opacity = opacity;
        self
    }

    fn with_overlay(mut self, overlay: Option<StrokeOverlay>) -> Self {
        self.overlay = overlay;
        self
    }

    /// Build the renderable cell, drawing font glyphs in `font_family`.
    pub fn to_cell<'a>(&'a self, font_family: &'a str) -> GridCell<'a> {
        let mut cell = GridCell::new(self.grid_style, &self.color, self.size)
            .font_family(font_family)
            .opacity(self.content_opacity);
        if let Some(character) = self.content {
            cell = cell.content(character);
        }
        if let Some(overlay) = &self.overlay {
            cell = cell.overlay(overlay);
        }
        cell
    }
}

/// Status label shown at the right of a row header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "strokes", rename_all = "snake_case")]
pub enum RowStatus {
    Loading,
    Strokes(usize),
    NoData,
}

impl RowStatus {
    pub fn label(&self) -> String {
        match self {
            RowStatus::Loading => "Loading...".to_string(),
            RowStatus::Strokes(1) => "1 Stroke".to_string(),
            RowStatus::Strokes(n) => format!("{} Strokes", n),
            RowStatus::NoData => "No Data".to_string(),
        }
    }
}

/// Row header: character, optional annotation text, status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowHeader {
    pub character: char,
    pub pinyin: Option<String>,
    pub meaning: Option<String>,
    pub status: RowStatus,
}

/// Grid area of a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RowBody {
    /// Waiting for stroke data; only a placeholder is shown
    Loading,
    Cells {
        cells: Vec<CellDescriptor>,
        /// Inline error text when stroke data is unavailable
        error_notice: Option<String>,
    },
}

impl RowBody {
    pub fn cells(&self) -> &[CellDescriptor] {
        match self {
            RowBody::Loading => &[],
            RowBody::Cells { cells, .. } => cells,
        }
    }
}

/// A fully composed worksheet row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedRow {
    pub header: RowHeader,
    pub body: RowBody,
}

/// Compose the row for `annotation.character`.
///
/// A `Ready` state with an empty stroke list is composed as errored, since
/// there is nothing to build reference, decomposition or trace cells from.
pub fn compose_row(annotation: &Annotation, state: &RowState, config: &WorksheetConfig) -> ComposedRow {
    let character = annotation.character;

    let (status, body) = match state {
        RowState::Loading => (RowStatus::Loading, RowBody::Loading),
        RowState::Ready(set) if !set.is_empty() => (
            RowStatus::Strokes(set.len()),
            RowBody::Cells {
                cells: ready_cells(character, set, config),
                error_notice: None,
            },
        ),
        RowState::Ready(_) | RowState::Errored => (
            RowStatus::NoData,
            RowBody::Cells {
                cells: blank_cells(config).collect(),
                error_notice: Some(format!("Stroke sequence unavailable for \"{}\"", character)),
            },
        ),
    };

    ComposedRow {
        header: RowHeader {
            character,
            pinyin: config.show_pinyin.then(|| annotation.pinyin.clone()),
            meaning: config.show_meaning.then(|| truncate_meaning(&annotation.meaning)),
            status,
        },
        body,
    }
}

fn ready_cells(character: char, set: &StrokeSet, config: &WorksheetConfig) -> Vec<CellDescriptor> {
    let count = set.len();
    let mut cells = Vec::with_capacity(count + config.grid_count as usize + 2);

    let reference = CellDescriptor::new(CellKind::Reference, config);
    cells.push(if config.use_font_for_reference {
        reference.with_content(character, 1.0)
    } else {
        reference.with_overlay(present(&set.strokes, count, RevealMode::Full))
    });

    if config.show_stroke_order {
        cells.extend((0..count).map(|index| {
            CellDescriptor::new(CellKind::Step { index }, config)
                .with_overlay(present(&set.strokes, index + 1, RevealMode::Step))
        }));
    }

    if config.show_tracing {
        let trace = CellDescriptor::new(CellKind::Trace, config);
        cells.push(if config.use_font_for_reference {
            trace.with_content(character, TRACE_OPACITY)
        } else {
            trace.with_overlay(present(&set.strokes, count, RevealMode::Trace))
        });
    }

    cells.extend(blank_cells(config));
    cells
}

fn blank_cells(config: &WorksheetConfig) -> impl Iterator<Item = CellDescriptor> + '_ {
    (0..config.grid_count).map(|_| CellDescriptor::new(CellKind::Blank, config))
}

/// Cut `meaning` to [`MEANING_DISPLAY_CHARS`] characters plus an ellipsis.
pub fn truncate_meaning(meaning: &str) -> String {
    let meaning = meaning.trim();
    if meaning.chars().count() <= MEANING_DISPLAY_CHARS {
        return meaning.to_string();
    }
    let mut cut: String = meaning.chars().take(MEANING_DISPLAY_CHARS).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::StrokePath;

    fn annotation(c: char) -> Annotation {
        Annotation {
            character: c,
            pinyin: "hǎo".to_string(),
            meaning: "good; well".to_string(),
        }
    }

    fn four_strokes() -> RowState {
        RowState::Ready(StrokeSet::new(
            '好',
            (0..4).map(|i| StrokePath::new(format!("M {} 0 Z", i))).collect(),
        ))
    }

    fn config(order: bool, tracing: bool, grid_count: u32) -> WorksheetConfig {
        WorksheetConfig {
            show_stroke_order: order,
            show_tracing: tracing,
            grid_count,
            ..Default::default()
        }
    }

    #[test]
    fn test_ready_row_cell_count() {
        let row = compose_row(&annotation('好'), &four_strokes(), &config(true, true, 3));
        assert_eq!(row.body.cells().len(), 9);
        assert_eq!(row.header.status, RowStatus::Strokes(4));
        assert_eq!(row.header.status.label(), "4 Strokes");
    }

    #[test]
    fn test_ready_row_order() {
        let row = compose_row(&annotation('好'), &four_strokes(), &config(true, true, 2));
        let kinds: Vec<CellKind> = row.body.cells().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                CellKind::Reference,
                CellKind::Step { index: 0 },
                CellKind::Step { index: 1 },
                CellKind::Step { index: 2 },
                CellKind::Step { index: 3 },
                CellKind::Trace,
                CellKind::Blank,
                CellKind::Blank,
            ]
        );
    }

    #[test]
    fn test_toggles_remove_exact_groups() {
        let all = compose_row(&annotation('好'), &four_strokes(), &config(true, true, 3));
        let no_order = compose_row(&annotation('好'), &four_strokes(), &config(false, true, 3));
        let no_trace = compose_row(&annotation('好'), &four_strokes(), &config(true, false, 3));
        assert_eq!(all.body.cells().len() - no_order.body.cells().len(), 4);
        assert_eq!(all.body.cells().len() - no_trace.body.cells().len(), 1);
    }

    #[test]
    fn test_step_cells_reveal_progressively() {
        let row = compose_row(&annotation('好'), &four_strokes(), &config(true, false, 0));
        for (i, cell) in row.body.cells()[1..].iter().enumerate() {
            let overlay = cell.overlay.as_ref().unwrap();
            assert_eq!(overlay.mode, RevealMode::Step);
            assert_eq!(overlay.visible_count, i + 1);
            assert_eq!(overlay.ghost.len(), 4);
        }
    }

    #[test]
    fn test_stroke_reference_and_trace() {
        let row = compose_row(&annotation('好'), &four_strokes(), &config(false, true, 0));
        let cells = row.body.cells();
        let reference = cells[0].overlay.as_ref().unwrap();
        assert_eq!(reference.mode, RevealMode::Full);
        assert_eq!(reference.visible_count, 4);
        assert!(cells[0].content.is_none());
        let trace = cells[1].overlay.as_ref().unwrap();
        assert_eq!(trace.mode, RevealMode::Trace);
        assert_eq!(trace.visible_count, 4);
    }

    #[test]
    fn test_font_reference_and_trace() {
        let config = WorksheetConfig {
            use_font_for_reference: true,
            ..config(true, true, 1)
        };
        let row = compose_row(&annotation('好'), &four_strokes(), &config);
        let cells = row.body.cells();
        assert_eq!(cells[0].content, Some('好'));
        assert!(cells[0].overlay.is_none());
        assert_eq!(cells[0].content_opacity, 1.0);

        let trace = cells.iter().find(|c| c.kind == CellKind::Trace).unwrap();
        assert_eq!(trace.content, Some('好'));
        assert_eq!(trace.content_opacity, 0.15);
        assert!(trace.overlay.is_none());

        // Decomposition always uses stroke paths
        assert!(cells[1].overlay.is_some());
    }

    #[test]
    fn test_errored_row() {
        let row = compose_row(&annotation('㐀'), &RowState::Errored, &config(true, true, 3));
        assert_eq!(row.header.status, RowStatus::NoData);
        assert_eq!(row.header.status.label(), "No Data");
        assert_eq!(row.body.cells().len(), 3);
        assert!(row.body.cells().iter().all(|c| c.kind == CellKind::Blank));
        match &row.body {
            RowBody::Cells { error_notice: Some(notice), .. } => assert!(notice.contains('㐀')),
            other => panic!("expected error notice, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_stroke_set_is_errored() {
        let state = RowState::Ready(StrokeSet::new('好', Vec::new()));
        let row = compose_row(&annotation('好'), &state, &config(true, true, 2));
        assert_eq!(row.header.status, RowStatus::NoData);
        assert_eq!(row.body.cells().len(), 2);
    }

    #[test]
    fn test_loading_row() {
        let row = compose_row(&annotation('好'), &RowState::Loading, &config(true, true, 3));
        assert_eq!(row.body, RowBody::Loading);
        assert_eq!(row.header.status.label(), "Loading...");
        assert_eq!(row.header.pinyin.as_deref(), Some("hǎo"));
    }

    #[test]
    fn test_header_flags() {
        let config = WorksheetConfig {
            show_pinyin: false,
            show_meaning: false,
            ..Default::default()
        };
        let row = compose_row(&annotation('好'), &RowState::Errored, &config);
        assert_eq!(row.header.character, '好');
        assert!(row.header.pinyin.is_none());
        assert!(row.header.meaning.is_none());
    }

    #[test]
    fn test_cells_carry_config() {
        let config = WorksheetConfig {
            grid_style: GridStyle::Tian,
            grid_color: "#336699".to_string(),
            cell_size: 72,
            ..Default::default()
        };
        let row = compose_row(&annotation('好'), &four_strokes(), &config);
        for cell in row.body.cells() {
            assert_eq!(cell.grid_style, GridStyle::Tian);
            assert_eq!(cell.color, "#336699");
            assert_eq!(cell.size, 72);
        }
    }

    #[test]
    fn test_truncate_meaning() {
        assert_eq!(truncate_meaning("good"), "good");
        let long = "a".repeat(40);
        let cut = truncate_meaning(&long);
        assert_eq!(cut.chars().count(), MEANING_DISPLAY_CHARS + 1);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_stroke_status_singular() {
        assert_eq!(RowStatus::Strokes(1).label(), "1 Stroke");
    }
}
