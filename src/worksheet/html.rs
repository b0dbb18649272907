//! HTML export.
//!
//! Produces a standalone A4 page: title block, name/date fill-in line and
//! one section per row with its cells as inline SVG. Opening the file in a
//! browser and printing to PDF gives the finished worksheet.

use std::fmt::Write;

use super::Worksheet;
use crate::compose::{ComposedRow, RowBody};
use crate::config::{PageGeometry, WorksheetConfig};

/// Render the whole worksheet as an HTML document.
///
/// The configuration is sanitized before use, so any snapshot is safe to
/// pass in.
pub fn render_html(worksheet: &Worksheet, config: &WorksheetConfig) -> String {
    let config = config.clone().sanitized();
    let rows = worksheet.compose(&config);
    let page = PageGeometry::A4;

    let mut out = String::with_capacity(16 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"zh\">\n<head>\n<meta charset=\"utf-8\">\n<title>");
    html_escape_into(&mut out, &config.title);
    out.push_str("</title>\n");
    write_style(&mut out, &config, &page);
    out.push_str("</head>\n<body>\n<main class=\"practice-sheet\">\n");

    write_sheet_header(&mut out, &config);

    if rows.is_empty() {
        out.push_str("<div class=\"empty\">Empty Worksheet</div>\n");
    } else {
        out.push_str("<div class=\"rows\">\n");
        for row in &rows {
            write_row(&mut out, row, &config);
        }
        out.push_str("</div>\n");
    }

    out.push_str("</main>\n</body>\n</html>\n");
    out
}

/// Render a single composed row as an HTML fragment.
pub fn render_row_html(row: &ComposedRow, config: &WorksheetConfig) -> String {
    let mut out = String::new();
    write_row(&mut out, row, config);
    out
}

fn write_style(out: &mut String, config: &WorksheetConfig, page: &PageGeometry) {
    let _ = write!(
        out,
        r#"<style>
@page {{ size: {name}; margin: 0; }}
body {{ margin: 0; background: #e2e8f0; font-family: system-ui, sans-serif; color: #0f172a; }}
.practice-sheet {{ width: {width}mm; min-height: {height}mm; margin: 0 auto; padding: {margin}mm; box-sizing: border-box; background: white; }}
.hanzi-font {{ font-family: {font}; }}
.sheet-header {{ border-bottom: 6px solid #0f172a; padding-bottom: 6mm; margin-bottom: 10mm; }}
.sheet-header h1 {{ font-size: 28pt; font-weight: 900; margin: 0 0 2mm 0; }}
.fill-in {{ display: flex; gap: 8mm; font-size: 8pt; font-weight: 700; letter-spacing: 0.2em; color: #94a3b8; }}
.fill-in .name {{ flex: 1; }}
.row {{ margin-bottom: 10mm; break-inside: avoid; }}
.row-header {{ display: flex; justify-content: space-between; align-items: flex-end; border-bottom: 2px solid #f1f5f9; padding: 0 1mm 1mm 1mm; margin-bottom: 3mm; }}
.row-header .annotation {{ display: flex; gap: 4mm; align-items: baseline; }}
.row-header .character {{ font-size: 22pt; font-weight: 700; line-height: 1; }}
.row-header .pinyin {{ font-size: 14pt; color: #64748b; }}
.row-header .meaning {{ font-size: 9pt; color: #94a3b8; font-style: italic; }}
.row-header .status {{ font-size: 7pt; font-weight: 900; letter-spacing: 0.2em; text-transform: uppercase; color: #cbd5e1; }}
.cells {{ display: flex; flex-wrap: wrap; max-width: {content}mm; }}
.cells svg {{ display: block; }}
.notice {{ flex: 1; min-height: 15mm; display: flex; align-items: center; justify-content: center; padding: 3mm; font-size: 10pt; font-style: italic; color: #f87171; background: #fef2f2; }}
.loading {{ padding: 4mm; font-size: 9pt; color: #94a3b8; letter-spacing: 0.2em; text-transform: uppercase; }}
.empty {{ padding: 60mm 0; text-align: center; font-size: 20pt; font-weight: 900; color: #e2e8f0; text-transform: uppercase; }}
@media print {{
  body {{ background: white; }}
  .practice-sheet {{ margin: 0; }}
}}
</style>
"#,
        name = page.name,
        width = page.width_mm,
        height = page.height_mm,
        margin = page.margin_mm,
        content = page.content_width_mm(),
        font = config.font_family,
    );
}

fn write_sheet_header(out: &mut String, config: &WorksheetConfig) {
    out.push_str("<header class=\"sheet-header\">\n<h1 class=\"hanzi-font\">");
    html_escape_into(out, &config.title);
    out.push_str("</h1>\n<div class=\"fill-in hanzi-font\"><span class=\"name\">NAME: ____________________</span><span class=\"date\">DATE: ____________</span></div>\n</header>\n");
}

fn write_row(out: &mut String, row: &ComposedRow, config: &WorksheetConfig) {
    let header = &row.header;

    out.push_str("<section class=\"row\">\n<div class=\"row-header\"><div class=\"annotation\">");
    let _ = write!(
        out,
        "<span class=\"character hanzi-font\">{}</span>",
        header.character
    );
    if let Some(pinyin) = &header.pinyin {
        out.push_str("<span class=\"pinyin\">");
        html_escape_into(out, pinyin);
        out.push_str("</span>");
    }
    if let Some(meaning) = &header.meaning {
        out.push_str("<span class=\"meaning\">");
        html_escape_into(out, meaning);
        out.push_str("</span>");
    }
    out.push_str("</div><div class=\"status\">");
    html_escape_into(out, &header.status.label());
    out.push_str("</div></div>\n");

    match &row.body {
        RowBody::Loading => {
            out.push_str("<div class=\"loading\">Loading stroke data...</div>\n");
        }
        RowBody::Cells {
            cells,
            error_notice,
        } => {
            out.push_str("<div class=\"cells\">\n");
            for cell in cells {
                out.push_str(&cell.to_cell(&config.font_family).to_svg_string());
                out.push('\n');
            }
            if let Some(notice) = error_notice {
                out.push_str("<div class=\"notice\">");
                html_escape_into(out, notice);
                out.push_str("</div>\n");
            }
            out.push_str("</div>\n");
        }
    }

    out.push_str("</section>\n");
}

/// HTML-escape a string into the output buffer.
fn html_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::RowState;
    use crate::error::SheetError;
    use crate::provider::Annotation;
    use crate::stroke::{StrokePath, StrokeSet};
    use crate::worksheet::RowUpdate;

    fn worksheet() -> Worksheet {
        let mut sheet = Worksheet::new(vec![
            Annotation::new('好', "hǎo", "good <fine>"),
            Annotation::placeholder('㐀'),
            Annotation::placeholder('学'),
        ]);
        let ids: Vec<_> = sheet.rows().iter().map(|r| r.id).collect();
        sheet.apply(RowUpdate {
            row: ids[0],
            result: Ok(StrokeSet::new(
                '好',
                (0..6).map(|i| StrokePath::new(format!("M {} 0 Z", i))).collect(),
            )),
        });
        sheet.apply(RowUpdate {
            row: ids[1],
            result: Err(SheetError::StrokeNotFound('㐀')),
        });
        sheet
    }

    #[test]
    fn test_page_is_a4() {
        let html = render_html(&worksheet(), &WorksheetConfig::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("width: 210mm"));
        assert!(html.contains("size: A4"));
        assert!(html.contains("@media print"));
    }

    #[test]
    fn test_rows_and_states() {
        let html = render_html(&worksheet(), &WorksheetConfig::default());
        assert_eq!(html.matches("<section class=\"row\">").count(), 3);
        assert!(html.contains("6 Strokes"));
        assert!(html.contains("No Data"));
        assert!(html.contains("Loading..."));
        assert!(html.contains("Stroke sequence unavailable for &quot;㐀&quot;"));
        // 1 + 6 + 1 + 4 for the ready row, 4 blanks for the errored one
        assert_eq!(html.matches("<svg").count() - html.matches("viewBox=\"0 0 1024 1024\"").count(), 16);
    }

    #[test]
    fn test_escapes_text() {
        let config = WorksheetConfig {
            title: "<b>Week 1</b>".to_string(),
            ..Default::default()
        };
        let html = render_html(&worksheet(), &config);
        assert!(html.contains("&lt;b&gt;Week 1&lt;/b&gt;"));
        assert!(html.contains("good &lt;fine&gt;"));
        assert!(!html.contains("<b>Week 1</b>"));
    }

    #[test]
    fn test_empty_worksheet() {
        let html = render_html(&Worksheet::default(), &WorksheetConfig::default());
        assert!(html.contains("Empty Worksheet"));
        assert!(!html.contains("<section"));
    }

    #[test]
    fn test_row_fragment() {
        let sheet = worksheet();
        let config = WorksheetConfig::default();
        let row = crate::compose::compose_row(&sheet.rows()[0].annotation, &RowState::Loading, &config);
        let fragment = render_row_html(&row, &config);
        assert!(fragment.contains("Loading stroke data"));
        assert!(!fragment.contains("<svg"));
    }
}
