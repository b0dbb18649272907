//! Single cell preview handler.

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::components::GridCell;
use crate::config::{DEFAULT_GRID_COLOR, GridStyle, is_hex_color, parse_cell_size};
use crate::error::SheetError;
use crate::provider::StrokeSource;
use crate::stroke::{RevealMode, present};

use super::super::state::AppState;

/// Cell side when the query does not give one.
const PREVIEW_CELL_SIZE: u32 = 128;

/// Query parameters for the cell endpoint.
#[derive(Debug, Deserialize)]
pub struct CellQuery {
    /// step, full or trace (default full)
    pub mode: Option<String>,
    /// Strokes revealed; defaults to all of them
    pub step: Option<usize>,
    pub grid: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// GET /api/cell/:character - Render one stroke cell as SVG.
pub async fn svg(
    State(state): State<Arc<AppState>>,
    Path(character): Path<String>,
    Query(query): Query<CellQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut chars = character.chars();
    let (Some(character), None) = (chars.next(), chars.next()) else {
        return Err((StatusCode::BAD_REQUEST, "Expected a single character".to_string()));
    };

    let bad_request = |e: SheetError| (StatusCode::BAD_REQUEST, e.to_string());
    let mode = match &query.mode {
        Some(mode) => mode.parse::<RevealMode>().map_err(bad_request)?,
        None => RevealMode::Full,
    };
    let style = match &query.grid {
        Some(grid) => grid.parse::<GridStyle>().map_err(bad_request)?,
        None => GridStyle::Mi,
    };
    let size = query
        .size
        .as_deref()
        .map(parse_cell_size)
        .unwrap_or(PREVIEW_CELL_SIZE);
    let color = query
        .color
        .as_deref()
        .filter(|c| is_hex_color(c))
        .unwrap_or(DEFAULT_GRID_COLOR);

    let lookup = tokio::time::timeout(
        state.config.fetch_timeout,
        state.strokes.lookup(character),
    )
    .await
    .unwrap_or(Err(SheetError::StrokeTimeout(character)));

    let set = lookup.map_err(|e| match e {
        SheetError::StrokeNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        other => (StatusCode::BAD_GATEWAY, other.to_string()),
    })?;

    let visible = query.step.unwrap_or(set.len());
    let overlay = present(&set.strokes, visible, mode)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("No strokes for '{}'", character)))?;

    let svg = GridCell::new(style, color, size).overlay(&overlay).to_svg_string();

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
