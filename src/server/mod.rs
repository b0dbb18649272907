//! # HTTP Server for Worksheets
//!
//! Provides a web interface for generating printable worksheets.
//!
//! ## Usage
//!
//! ```bash
//! hanzi-sheet serve --listen 0.0.0.0:8080
//! ```
//!
//! Then open http://localhost:8080 in a browser, enter some characters and
//! print the generated page.

mod handlers;
mod state;
mod static_files;

pub use state::{AppState, CachedSheet, SESSION_EXPIRATION_SECS, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::error::SheetError;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Frontend
        .route("/", get(static_files::index_handler))
        .route("/assets/*path", get(static_files::asset_handler))
        // Configuration
        .route("/api/config/defaults", get(handlers::config::defaults))
        .route("/api/fonts", get(handlers::config::fonts))
        // Worksheet API
        .route("/api/worksheet", post(handlers::worksheet::html))
        .route("/api/worksheet/rows", post(handlers::worksheet::rows))
        // Kept worksheets, re-rendered on settings changes
        .route("/api/sheets", post(handlers::worksheet::create_sheet))
        .route("/api/sheets/:id/render", post(handlers::worksheet::render_sheet))
        // Single cells
        .route("/api/cell/:character", get(handlers::cell::svg))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use hanzi_sheet::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), hanzi_sheet::SheetError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), SheetError> {
    let app_state = Arc::new(AppState::new(config.clone())?);

    // Spawn background cache cleanup task
    tokio::spawn(cleanup_caches(app_state.clone()));

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| SheetError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e)))?;

    tracing::info!(listen = %config.listen_addr, "hanzi-sheet server listening");
    tracing::info!("open http://{}/ in your browser", config.listen_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| SheetError::Server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Background task to clean up expired cache entries.
async fn cleanup_caches(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    let expiration = Duration::from_secs(SESSION_EXPIRATION_SECS);

    loop {
        interval.tick().await;

        let removed = state.strokes.evict_idle(expiration).await;
        if removed > 0 {
            let remaining = state.strokes.len().await;
            tracing::debug!(removed, remaining, "cleaned up expired stroke cache entries");
        }

        let removed = state.evict_idle_sheets(expiration).await;
        if removed > 0 {
            tracing::debug!(removed, "cleaned up expired worksheets");
        }
    }
}
