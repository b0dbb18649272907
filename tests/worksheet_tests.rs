//! # Worksheet Tests
//!
//! End-to-end generation against in-memory sources: text in, composed rows
//! and printable HTML out.

use pretty_assertions::assert_eq;
use std::sync::Arc;

use hanzi_sheet::compose::{CellKind, RowBody, RowStatus};
use hanzi_sheet::config::{GridStyle, WorksheetConfig};
use hanzi_sheet::provider::{Annotation, PlaceholderAnnotations, StaticAnnotations, StaticStrokes};
use hanzi_sheet::stroke::{CURRENT_FILL, RevealMode, StrokePath, StrokeSet};
use hanzi_sheet::worksheet::{Generator, render_html};

fn strokes(character: char, count: usize) -> StrokeSet {
    StrokeSet::new(
        character,
        (0..count)
            .map(|i| StrokePath::new(format!("M {} 100 L {} 900 Z", i * 10, i * 10)))
            .collect(),
    )
}

fn generator() -> Generator {
    let strokes = StaticStrokes::new()
        .with(strokes('好', 6))
        .with(strokes('人', 2))
        .with(strokes('一', 1));
    let annotations = StaticAnnotations::new()
        .with(Annotation::new('好', "hǎo", "good"))
        .with(Annotation::new('人', "rén", "person"));
    Generator::new(Arc::new(strokes), Arc::new(annotations))
}

fn config(show_tracing: bool, show_stroke_order: bool, grid_count: u32) -> WorksheetConfig {
    WorksheetConfig {
        show_tracing,
        show_stroke_order,
        grid_count,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_mixed_input_yields_one_row_per_hanzi() {
    let worksheet = generator().generate("aa好好bb").await;

    assert_eq!(worksheet.rows().len(), 1);
    assert_eq!(worksheet.rows()[0].character(), '好');
    assert!(worksheet.is_settled());
}

#[tokio::test]
async fn test_rows_keep_first_occurrence_order() {
    let worksheet = generator().generate("人好一人好").await;

    let order: Vec<char> = worksheet.rows().iter().map(|r| r.character()).collect();
    assert_eq!(order, vec!['人', '好', '一']);
}

#[tokio::test]
async fn test_full_row_layout() {
    let worksheet = generator().generate("好").await;
    let rows = worksheet.compose(&config(true, true, 3));
    let row = &rows[0];

    assert_eq!(row.header.status, RowStatus::Strokes(6));
    assert_eq!(row.header.status.label(), "6 Strokes");
    assert_eq!(row.header.pinyin.as_deref(), Some("hǎo"));
    assert_eq!(row.header.meaning.as_deref(), Some("good"));

    let kinds: Vec<CellKind> = row.body.cells().iter().map(|c| c.kind).collect();
    let mut expected = vec![CellKind::Reference];
    expected.extend((0..6).map(|index| CellKind::Step { index }));
    expected.push(CellKind::Trace);
    expected.extend([CellKind::Blank; 3]);
    assert_eq!(kinds, expected);

    // The last decomposition cell shows every stroke, the newest in red
    let last_step = &row.body.cells()[6];
    let overlay = last_step.overlay.as_ref().expect("step cell has an overlay");
    assert_eq!(overlay.mode, RevealMode::Step);
    assert_eq!(overlay.strokes.len(), 6);
    assert_eq!(overlay.strokes[5].fill, CURRENT_FILL);
}

#[tokio::test]
async fn test_four_strokes_with_three_blanks_is_nine_cells() {
    let generator = Generator::new(
        Arc::new(StaticStrokes::new().with(strokes('好', 4))),
        Arc::new(PlaceholderAnnotations),
    );
    let worksheet = generator.generate("好").await;
    let rows = worksheet.compose(&config(true, true, 3));

    assert_eq!(rows[0].body.cells().len(), 9);
}

#[tokio::test]
async fn test_missing_stroke_data_degrades_to_blank_cells() {
    let worksheet = generator().generate("字").await;
    let rows = worksheet.compose(&config(true, true, 3));
    let row = &rows[0];

    assert_eq!(row.header.status, RowStatus::NoData);
    assert_eq!(row.header.status.label(), "No Data");
    match &row.body {
        RowBody::Cells {
            cells,
            error_notice,
        } => {
            assert_eq!(cells.len(), 3);
            assert!(cells.iter().all(|c| c.kind == CellKind::Blank));
            assert_eq!(
                error_notice.as_deref(),
                Some("Stroke sequence unavailable for \"字\"")
            );
        }
        RowBody::Loading => panic!("row should have settled"),
    }
}

#[tokio::test]
async fn test_missing_annotation_uses_placeholder() {
    let worksheet = generator().generate("一").await;
    let rows = worksheet.compose(&WorksheetConfig::default());

    assert_eq!(rows[0].header.pinyin.as_deref(), Some("..."));
    assert_eq!(rows[0].header.status.label(), "1 Stroke");
}

#[tokio::test]
async fn test_font_reference_replaces_stroke_reference() {
    let worksheet = generator().generate("人").await;
    let config = WorksheetConfig {
        use_font_for_reference: true,
        show_stroke_order: false,
        grid_count: 0,
        ..Default::default()
    };
    let rows = worksheet.compose(&config);
    let cells = rows[0].body.cells();

    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].kind, CellKind::Reference);
    assert_eq!(cells[0].content, Some('人'));
    assert!(cells[0].overlay.is_none());
    assert_eq!(cells[1].kind, CellKind::Trace);
    assert_eq!(cells[1].content, Some('人'));
    assert!(cells[1].content_opacity < 1.0);
}

#[tokio::test]
async fn test_html_export() {
    let worksheet = generator().generate("你好人").await;
    let config = WorksheetConfig {
        grid_style: GridStyle::Tian,
        title: "Lesson <1>".to_string(),
        ..Default::default()
    };
    let html = render_html(&worksheet, &config);

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("size: A4"));
    assert!(html.contains("Lesson &lt;1&gt;"));
    assert!(html.contains("NAME:"));
    assert_eq!(html.matches("<section class=\"row\">").count(), 3);
    assert!(html.contains("Stroke sequence unavailable for &quot;你&quot;"));
    assert!(html.contains("6 Strokes"));
    assert!(html.contains("2 Strokes"));
    assert!(!html.contains("Loading stroke data"));
}

#[tokio::test]
async fn test_html_export_without_characters() {
    let worksheet = generator().generate("hello, world").await;
    let html = render_html(&worksheet, &WorksheetConfig::default());

    assert!(worksheet.is_empty());
    assert!(html.contains("Empty Worksheet"));
    assert!(!html.contains("<section"));
}
