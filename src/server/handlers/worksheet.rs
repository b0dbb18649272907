//! Worksheet generation handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::compose::ComposedRow;
use crate::config::WorksheetConfig;
use crate::worksheet::{RowId, render_html, render_row_html};

use super::super::state::AppState;

/// Worksheet request body.
#[derive(Debug, Deserialize)]
pub struct WorksheetRequest {
    /// Input text; non-hanzi characters are ignored
    pub text: String,
    /// Missing fields take their defaults
    #[serde(default)]
    pub config: WorksheetConfig,
}

/// One row of a composed worksheet.
#[derive(Debug, Serialize)]
pub struct RowResponse {
    pub id: RowId,
    pub row: ComposedRow,
    /// The row pre-rendered as an HTML fragment
    pub html: String,
}

/// A kept worksheet and its first rendering.
#[derive(Debug, Serialize)]
pub struct SheetResponse {
    pub id: Uuid,
    pub html: String,
}

/// Settings for re-rendering a kept worksheet.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub config: WorksheetConfig,
}

fn validate(req: &WorksheetRequest) -> Result<(), (StatusCode, String)> {
    if req.text.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Text cannot be empty".to_string()));
    }
    Ok(())
}

/// Handle POST /api/worksheet - generate and return the printable page.
pub async fn html(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WorksheetRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    validate(&req)?;

    let worksheet = state.generator.generate(&req.text).await;
    Ok(Html(render_html(&worksheet, &req.config)))
}

/// Handle POST /api/worksheet/rows - generate and return composed rows as JSON.
pub async fn rows(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WorksheetRequest>,
) -> Result<Json<Vec<RowResponse>>, (StatusCode, String)> {
    validate(&req)?;

    let config = req.config.sanitized();
    let worksheet = state.generator.generate(&req.text).await;
    let composed = worksheet.compose(&config);

    let rows = worksheet
        .rows()
        .iter()
        .zip(composed)
        .map(|(row, composed)| RowResponse {
            id: row.id,
            html: render_row_html(&composed, &config),
            row: composed,
        })
        .collect();

    Ok(Json(rows))
}

/// Handle POST /api/sheets - generate, keep the worksheet and return its id
/// with the rendered page.
pub async fn create_sheet(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WorksheetRequest>,
) -> Result<Json<SheetResponse>, (StatusCode, String)> {
    validate(&req)?;

    let worksheet = state.generator.generate(&req.text).await;
    let html = render_html(&worksheet, &req.config);
    let id = state.store_sheet(worksheet).await;

    Ok(Json(SheetResponse { id, html }))
}

/// Handle POST /api/sheets/:id/render - render a kept worksheet with new
/// settings. Nothing is fetched again.
pub async fn render_sheet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<RenderRequest>,
) -> Result<Html<String>, (StatusCode, String)> {
    let mut sheets = state.sheets.write().await;
    let sheet = sheets
        .get_mut(&id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Worksheet {} not found or expired", id)))?;
    sheet.touch();

    Ok(Html(render_html(&sheet.worksheet, &req.config)))
}
