//! Stroke-data sources.
//!
//! All sources read the hanzi-writer-data format: one JSON document per
//! character with a `strokes` array of SVG path strings.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::StrokeSource;
use crate::error::SheetError;
use crate::stroke::StrokeSet;

/// Default location of the hanzi-writer-data package.
pub const HANZI_WRITER_CDN: &str = "https://cdn.jsdelivr.net/npm/hanzi-writer-data@latest/";

/// Fetches `<base>/<char>.json` over HTTP.
pub struct CdnStrokes {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl CdnStrokes {
    /// Source backed by the public jsDelivr CDN.
    pub fn new(client: reqwest::Client) -> Result<Self, SheetError> {
        Self::with_base_url(client, HANZI_WRITER_CDN)
    }

    /// Source backed by a mirror of the package.
    pub fn with_base_url(client: reqwest::Client, base_url: &str) -> Result<Self, SheetError> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|e| SheetError::InvalidConfig(format!("Bad stroke data URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SheetError::InvalidConfig(format!(
                "Stroke data URL '{}' cannot hold a path",
                base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    /// URL of the data file for `character`, percent-encoded.
    pub fn url_for(&self, character: char) -> reqwest::Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in the constructor
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&format!("{}.json", character));
        }
        url
    }
}

#[async_trait]
impl StrokeSource for CdnStrokes {
    fn name(&self) -> &'static str {
        "cdn"
    }

    async fn lookup(&self, character: char) -> Result<StrokeSet, SheetError> {
        let url = self.url_for(character);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SheetError::StrokeNotFound(character));
        }
        if !status.is_success() {
            return Err(SheetError::Http(format!("GET {}: HTTP {}", url, status)));
        }

        let bytes = response.bytes().await?;
        StrokeSet::from_json(character, &bytes)
    }
}

/// Reads `<dir>/<char>.json` from a local copy of the data package.
pub struct DirectoryStrokes {
    dir: PathBuf,
}

impl DirectoryStrokes {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl StrokeSource for DirectoryStrokes {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn lookup(&self, character: char) -> Result<StrokeSet, SheetError> {
        let path = self.dir.join(format!("{}.json", character));
        match tokio::fs::read(&path).await {
            Ok(bytes) => StrokeSet::from_json(character, &bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SheetError::StrokeNotFound(character))
            }
            Err(e) => Err(SheetError::Io(e)),
        }
    }
}

/// In-memory stroke sets.
#[derive(Debug, Default, Clone)]
pub struct StaticStrokes {
    sets: HashMap<char, StrokeSet>,
}

impl StaticStrokes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stroke set (builder style).
    pub fn with(mut self, set: StrokeSet) -> Self {
        self.sets.insert(set.character, set);
        self
    }
}

impl FromIterator<StrokeSet> for StaticStrokes {
    fn from_iter<I: IntoIterator<Item = StrokeSet>>(iter: I) -> Self {
        Self {
            sets: iter.into_iter().map(|set| (set.character, set)).collect(),
        }
    }
}

#[async_trait]
impl StrokeSource for StaticStrokes {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn lookup(&self, character: char) -> Result<StrokeSet, SheetError> {
        self.sets
            .get(&character)
            .cloned()
            .ok_or(SheetError::StrokeNotFound(character))
    }
}

/// A cached stroke set with its last access time.
#[derive(Debug, Clone)]
pub struct CachedStrokeSet {
    pub set: StrokeSet,
    pub last_accessed: Instant,
}

impl CachedStrokeSet {
    pub fn new(set: StrokeSet) -> Self {
        Self {
            set,
            last_accessed: Instant::now(),
        }
    }

    /// Update last accessed time.
    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }
}

/// Remembers successful lookups of another source.
///
/// Failures are not cached, so a later worksheet generation asks the inner
/// source again.
pub struct CachedStrokes<S> {
    inner: S,
    cache: Arc<RwLock<HashMap<char, CachedStrokeSet>>>,
}

impl<S: StrokeSource> CachedStrokes<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of cached characters.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Drop entries not accessed within `max_idle`. Returns how many were removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut cache = self.cache.write().await;
        let before = cache.len();
        cache.retain(|_, v| now.duration_since(v.last_accessed) < max_idle);
        before - cache.len()
    }
}

#[async_trait]
impl<S: StrokeSource> StrokeSource for CachedStrokes<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn lookup(&self, character: char) -> Result<StrokeSet, SheetError> {
        {
            let mut cache = self.cache.write().await;
            if let Some(entry) = cache.get_mut(&character) {
                entry.touch();
                return Ok(entry.set.clone());
            }
        }

        let set = self.inner.lookup(character).await?;

        {
            let mut cache = self.cache.write().await;
            cache.insert(character, CachedStrokeSet::new(set.clone()));
        }

        Ok(set)
    }
}
