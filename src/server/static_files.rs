//! Static file serving for the frontend.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};
use include_dir::{Dir, include_dir};
use std::sync::Arc;

use crate::config::FONT_PRESETS;

use super::state::AppState;

/// Embedded frontend distribution files.
static FRONTEND_DIST: Dir = include_dir!("$CARGO_MANIFEST_DIR/frontend/dist");

/// Serve index.html with a cache-busting parameter and the default
/// configuration injected.
pub async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match FRONTEND_DIST.get_file("index.html") {
        Some(file) => {
            let contents = String::from_utf8_lossy(file.contents());
            // Inject cache-busting parameter into script/link tags
            let cache_bust = format!("?v={}", state.boot_time);
            let busted = contents
                .replace(".js\"", &format!(".js{}\"", cache_bust))
                .replace(".css\"", &format!(".css{}\"", cache_bust));

            // Inject defaults as static data (avoids an API round-trip)
            let defaults = serde_json::to_string(&state.config.defaults).unwrap_or_else(|_| "{}".to_string());
            let fonts = serde_json::to_string(FONT_PRESETS).unwrap_or_else(|_| "[]".to_string());
            let script = format!(
                "<script>window.__DEFAULT_CONFIG={};window.__FONT_PRESETS={}</script></head>",
                defaults.replace('<', "\\u003c"),
                fonts.replace('<', "\\u003c")
            );
            let busted = busted.replace("</head>", &script);

            Html(busted).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Frontend not built").into_response(),
    }
}

/// Assets are requested with `?v=<boot time>`, so they never go stale.
const ASSET_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Serve the UI's script and stylesheet from `assets/`.
pub async fn asset_handler(Path(path): Path<String>) -> impl IntoResponse {
    let name = path.split('?').next().unwrap_or(&path);

    let Some(file) = FRONTEND_DIST.get_file(format!("assets/{}", name)) else {
        return (StatusCode::NOT_FOUND, "Asset not found").into_response();
    };

    let mime = mime_guess::from_path(name).first_or_octet_stream();
    (
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CACHE_CONTROL, ASSET_CACHE_CONTROL.to_string()),
        ],
        file.contents(),
    )
        .into_response()
}
