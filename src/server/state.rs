//! Server state and configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::WorksheetConfig;
use crate::error::SheetError;
use crate::provider::{
    AnnotationSource, CachedStrokes, CdnStrokes, DirectoryStrokes, GeminiAnnotations,
    PlaceholderAnnotations, StrokeSource, http_client,
};
use crate::worksheet::{DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_CONCURRENT_FETCHES, Generator, Worksheet};

/// Cached stroke data and worksheets not used for this long are evicted.
pub const SESSION_EXPIRATION_SECS: u64 = 3600;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Read stroke data from this directory instead of the network
    pub strokes_dir: Option<PathBuf>,
    /// Mirror of the hanzi-writer-data package
    pub strokes_url: Option<String>,
    /// Per-character stroke fetch timeout
    pub fetch_timeout: Duration,
    pub max_concurrent_fetches: usize,
    /// Configuration served to the UI as its starting point
    pub defaults: WorksheetConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            strokes_dir: None,
            strokes_url: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            defaults: WorksheetConfig::default(),
        }
    }
}

/// A generated worksheet kept for re-rendering with new settings.
#[derive(Debug, Clone)]
pub struct CachedSheet {
    pub worksheet: Worksheet,
    pub last_accessed: Instant,
}

impl CachedSheet {
    pub fn new(worksheet: Worksheet) -> Self {
        Self {
            worksheet,
            last_accessed: Instant::now(),
        }
    }

    /// Update last accessed time.
    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Unix timestamp of server boot for cache busting.
    pub boot_time: u64,
    /// Stroke source shared by every generation, with its cache
    pub strokes: Arc<CachedStrokes<Arc<dyn StrokeSource>>>,
    pub generator: Generator,
    /// Generated worksheets by id
    pub sheets: RwLock<HashMap<Uuid, CachedSheet>>,
}

impl AppState {
    /// Build state with the sources selected by `config`.
    ///
    /// Annotations come from Gemini when an API key is set, otherwise every
    /// character gets placeholder text.
    pub fn new(config: ServerConfig) -> Result<Self, SheetError> {
        let client = http_client()?;

        let strokes: Arc<dyn StrokeSource> = match (&config.strokes_dir, &config.strokes_url) {
            (Some(dir), _) => Arc::new(DirectoryStrokes::new(dir)),
            (None, Some(url)) => Arc::new(CdnStrokes::with_base_url(client.clone(), url)?),
            (None, None) => Arc::new(CdnStrokes::new(client.clone())?),
        };

        let annotations: Arc<dyn AnnotationSource> = match GeminiAnnotations::from_env(client) {
            Some(gemini) => Arc::new(gemini),
            None => {
                tracing::warn!("no GEMINI_API_KEY set, pinyin and meanings will be placeholders");
                Arc::new(PlaceholderAnnotations)
            }
        };

        Ok(Self::with_sources(config, strokes, annotations))
    }

    /// Build state around explicit sources.
    pub fn with_sources(
        config: ServerConfig,
        strokes: Arc<dyn StrokeSource>,
        annotations: Arc<dyn AnnotationSource>,
    ) -> Self {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let strokes = Arc::new(CachedStrokes::new(strokes));
        let generator = Generator::new(strokes.clone(), annotations)
            .fetch_timeout(config.fetch_timeout)
            .max_concurrent_fetches(config.max_concurrent_fetches);

        Self {
            config,
            boot_time,
            strokes,
            generator,
            sheets: RwLock::new(HashMap::new()),
        }
    }

    /// Keep `worksheet` and return the id it can be re-rendered under.
    pub async fn store_sheet(&self, worksheet: Worksheet) -> Uuid {
        let id = Uuid::new_v4();
        self.sheets.write().await.insert(id, CachedSheet::new(worksheet));
        id
    }

    /// Drop worksheets not accessed within `max_idle`. Returns how many were removed.
    pub async fn evict_idle_sheets(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sheets = self.sheets.write().await;
        let before = sheets.len();
        sheets.retain(|_, v| now.duration_since(v.last_accessed) < max_idle);
        before - sheets.len()
    }
}
