//! Configuration handlers.

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::config::{FONT_PRESETS, FontPreset, WorksheetConfig};

use super::super::state::AppState;

/// GET /api/config/defaults - Starting configuration for the UI.
pub async fn defaults(State(state): State<Arc<AppState>>) -> Json<WorksheetConfig> {
    Json(state.config.defaults.clone())
}

/// GET /api/fonts - Reference font presets.
pub async fn fonts() -> Json<&'static [FontPreset]> {
    Json(FONT_PRESETS)
}
