//! # Worksheet Generation
//!
//! A worksheet is one row per unique input character. Generating one is a
//! small event-driven session:
//!
//! 1. filter and deduplicate the input text
//! 2. fetch all annotations in one batch (degrading to placeholders)
//! 3. create every row in the loading state, each with a fresh [`RowId`]
//! 4. start one stroke fetch per row; fetches run concurrently, capped by a
//!    semaphore, each bounded by a timeout
//! 5. apply each completion as a [`RowUpdate`] when it arrives
//!
//! Updates are matched by row identity, never by character, so a late
//! result from a superseded worksheet cannot land in a newer one even when
//! the same character appears in both.
//!
//! ```no_run
//! use std::sync::Arc;
//! use hanzi_sheet::config::WorksheetConfig;
//! use hanzi_sheet::provider::{CdnStrokes, PlaceholderAnnotations, http_client};
//! use hanzi_sheet::worksheet::{Generator, render_html};
//!
//! # async fn example() -> Result<(), hanzi_sheet::SheetError> {
//! let generator = Generator::new(
//!     Arc::new(CdnStrokes::new(http_client()?)?),
//!     Arc::new(PlaceholderAnnotations),
//! );
//! let worksheet = generator.generate("学而时习之").await;
//! let html = render_html(&worksheet, &WorksheetConfig::default());
//! # Ok(())
//! # }
//! ```

mod html;

pub use html::*;

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use uuid::Uuid;

use crate::compose::{ComposedRow, RowState, compose_row};
use crate::config::WorksheetConfig;
use crate::error::SheetError;
use crate::hanzi::unique_characters;
use crate::provider::{Annotation, AnnotationSource, StrokeSource, annotate};
use crate::stroke::StrokeSet;

/// Stroke fetches slower than this put their row into the errored state.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// An annotation batch slower than this is replaced by placeholders.
pub const DEFAULT_ANNOTATION_TIMEOUT: Duration = Duration::from_secs(20);

/// Stroke fetches in flight at once, per worksheet.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Identity of one row in one generated worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RowId(Uuid);

impl RowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One worksheet row.
#[derive(Debug, Clone)]
pub struct Row {
    pub id: RowId,
    pub annotation: Annotation,
    pub state: RowState,
}

impl Row {
    pub fn character(&self) -> char {
        self.annotation.character
    }
}

/// Outcome of one row's stroke fetch.
#[derive(Debug)]
pub struct RowUpdate {
    pub row: RowId,
    pub result: Result<StrokeSet, SheetError>,
}

/// Rows of one generation, in first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    rows: Vec<Row>,
}

impl Worksheet {
    /// A worksheet with every row loading.
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self {
            rows: annotations
                .into_iter()
                .map(|annotation| Row {
                    id: RowId::new(),
                    annotation,
                    state: RowState::Loading,
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows still waiting for stroke data.
    pub fn pending(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.state == RowState::Loading)
            .count()
    }

    /// Whether every row has left the loading state.
    pub fn is_settled(&self) -> bool {
        self.pending() == 0
    }

    /// Apply a fetch outcome to its row.
    ///
    /// Returns `false` (and changes nothing) when the row does not belong to
    /// this worksheet or has already settled.
    pub fn apply(&mut self, update: RowUpdate) -> bool {
        let Some(row) = self.rows.iter_mut().find(|row| row.id == update.row) else {
            tracing::debug!(row = %update.row, "ignoring stroke data for a row that no longer exists");
            return false;
        };
        if row.state != RowState::Loading {
            return false;
        }

        let character = row.character();
        row.state = match update.result {
            Ok(set) if set.character == character && !set.is_empty() => RowState::Ready(set),
            Ok(set) => {
                tracing::warn!(%character, got = %set.character, strokes = set.len(), "unusable stroke data");
                RowState::Errored
            }
            Err(e) => {
                tracing::warn!(%character, error = %e, "stroke data unavailable");
                RowState::Errored
            }
        };
        true
    }

    /// Compose every row against one configuration snapshot.
    pub fn compose(&self, config: &WorksheetConfig) -> Vec<ComposedRow> {
        self.rows
            .iter()
            .map(|row| compose_row(&row.annotation, &row.state, config))
            .collect()
    }
}

/// Builds worksheets from input text.
#[derive(Clone)]
pub struct Generator {
    strokes: Arc<dyn StrokeSource>,
    annotations: Arc<dyn AnnotationSource>,
    fetch_timeout: Duration,
    annotation_timeout: Duration,
    max_concurrent_fetches: usize,
}

impl Generator {
    pub fn new(strokes: Arc<dyn StrokeSource>, annotations: Arc<dyn AnnotationSource>) -> Self {
        Self {
            strokes,
            annotations,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            annotation_timeout: DEFAULT_ANNOTATION_TIMEOUT,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn annotation_timeout(mut self, timeout: Duration) -> Self {
        self.annotation_timeout = timeout;
        self
    }

    /// Cap on concurrent stroke fetches (at least 1).
    pub fn max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }

    /// Create the worksheet with all rows loading and start their stroke
    /// fetches. Completions arrive on the returned receiver; feed them to
    /// [`Worksheet::apply`].
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(&self, text: &str) -> (Worksheet, mpsc::UnboundedReceiver<RowUpdate>) {
        let characters = unique_characters(text);
        tracing::info!(
            input_chars = text.chars().count(),
            unique = characters.len(),
            strokes = self.strokes.name(),
            annotations = self.annotations.name(),
            "generating worksheet"
        );

        let annotations = match tokio::time::timeout(
            self.annotation_timeout,
            annotate(self.annotations.as_ref(), &characters),
        )
        .await
        {
            Ok(annotations) => annotations,
            Err(_) => {
                tracing::warn!(
                    source = self.annotations.name(),
                    timeout_ms = self.annotation_timeout.as_millis() as u64,
                    "annotation lookup timed out, using placeholders"
                );
                characters.iter().map(|&c| Annotation::placeholder(c)).collect()
            }
        };
        let worksheet = Worksheet::new(annotations);

        let (tx, rx) = mpsc::unbounded_channel();
        let permits = Arc::new(Semaphore::new(self.max_concurrent_fetches));

        for row in worksheet.rows() {
            let id = row.id;
            let character = row.character();
            let strokes = self.strokes.clone();
            let permits = permits.clone();
            let timeout = self.fetch_timeout;
            let tx = tx.clone();

            tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                let result = match tokio::time::timeout(timeout, strokes.lookup(character)).await {
                    Ok(result) => result,
                    Err(_) => Err(SheetError::StrokeTimeout(character)),
                };
                // Receiver gone means the worksheet was dropped
                let _ = tx.send(RowUpdate { row: id, result });
            });
        }

        (worksheet, rx)
    }

    /// Generate a worksheet and wait until every row has settled.
    pub async fn generate(&self, text: &str) -> Worksheet {
        let (mut worksheet, mut updates) = self.start(text).await;

        while !worksheet.is_settled() {
            match updates.recv().await {
                Some(update) => {
                    worksheet.apply(update);
                }
                None => break,
            }
        }

        tracing::info!(
            rows = worksheet.rows().len(),
            pending = worksheet.pending(),
            "worksheet ready"
        );
        worksheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{StaticAnnotations, StaticStrokes};
    use crate::stroke::StrokePath;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn set(c: char, n: usize) -> StrokeSet {
        StrokeSet::new(c, (0..n).map(|i| StrokePath::new(format!("M {} 0 Z", i))).collect())
    }

    fn generator(strokes: impl StrokeSource + 'static) -> Generator {
        Generator::new(
            Arc::new(strokes),
            Arc::new(StaticAnnotations::new().with(Annotation::new('好', "hǎo", "good"))),
        )
    }

    struct Never;

    #[async_trait]
    impl StrokeSource for Never {
        fn name(&self) -> &'static str {
            "never"
        }

        async fn lookup(&self, _character: char) -> Result<StrokeSet, SheetError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_generate_settles_all_rows() {
        let strokes = StaticStrokes::new().with(set('好', 6)).with(set('学', 8));
        let worksheet = generator(strokes).generate("aa好好bb学无").await;

        let chars: Vec<char> = worksheet.rows().iter().map(Row::character).collect();
        assert_eq!(chars, vec!['好', '学', '无']);
        assert!(worksheet.is_settled());
        assert!(matches!(worksheet.rows()[0].state, RowState::Ready(ref s) if s.len() == 6));
        assert!(matches!(worksheet.rows()[1].state, RowState::Ready(ref s) if s.len() == 8));
        assert_eq!(worksheet.rows()[2].state, RowState::Errored);
        assert_eq!(worksheet.rows()[0].annotation.pinyin, "hǎo");
        assert_eq!(worksheet.rows()[1].annotation, Annotation::placeholder('学'));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let worksheet = generator(StaticStrokes::new()).generate("hello").await;
        assert!(worksheet.is_empty());
        assert!(worksheet.is_settled());
    }

    #[tokio::test]
    async fn test_timeout_errors_row() {
        let worksheet = generator(Never)
            .fetch_timeout(Duration::from_millis(50))
            .generate("好")
            .await;
        assert_eq!(worksheet.rows()[0].state, RowState::Errored);
    }

    #[tokio::test]
    async fn test_rows_start_loading() {
        let (worksheet, _updates) = generator(Never).start("好学").await;
        assert_eq!(worksheet.pending(), 2);
        let composed = worksheet.compose(&WorksheetConfig::default());
        assert!(composed.iter().all(|row| row.body.cells().is_empty()));
    }

    #[tokio::test]
    async fn test_stale_updates_ignored_across_generations() {
        let strokes = StaticStrokes::new().with(set('好', 6));
        let sheets = generator(strokes);

        let (_old, mut old_updates) = sheets.start("好").await;
        let (mut current, _current_updates) = sheets.start("好").await;

        let stale = old_updates.recv().await.unwrap();
        assert!(!current.apply(stale));
        assert_eq!(current.rows()[0].state, RowState::Loading);
    }

    #[test]
    fn test_apply_only_once() {
        let mut worksheet = Worksheet::new(vec![Annotation::placeholder('好')]);
        let id = worksheet.rows()[0].id;

        assert!(worksheet.apply(RowUpdate {
            row: id,
            result: Err(SheetError::StrokeNotFound('好')),
        }));
        assert!(!worksheet.apply(RowUpdate {
            row: id,
            result: Ok(set('好', 6)),
        }));
        assert_eq!(worksheet.rows()[0].state, RowState::Errored);
    }

    #[test]
    fn test_apply_rejects_mismatched_character() {
        let mut worksheet = Worksheet::new(vec![Annotation::placeholder('好')]);
        let id = worksheet.rows()[0].id;
        worksheet.apply(RowUpdate {
            row: id,
            result: Ok(set('学', 8)),
        });
        assert_eq!(worksheet.rows()[0].state, RowState::Errored);
    }

    struct Silent;

    #[async_trait]
    impl AnnotationSource for Silent {
        fn name(&self) -> &'static str {
            "silent"
        }

        async fn lookup(&self, _characters: &[char]) -> Result<Vec<Annotation>, SheetError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_unanswered_annotations_fall_back_to_placeholders() {
        let sheets = Generator::new(
            Arc::new(StaticStrokes::new().with(set('好', 6))),
            Arc::new(Silent),
        )
        .annotation_timeout(Duration::from_millis(50));

        let worksheet = tokio::time::timeout(Duration::from_secs(5), sheets.generate("好学"))
            .await
            .expect("generation must not wait on annotations forever");

        assert_eq!(worksheet.rows().len(), 2);
        assert_eq!(worksheet.rows()[0].annotation, Annotation::placeholder('好'));
        assert_eq!(worksheet.rows()[1].annotation, Annotation::placeholder('学'));
        assert!(matches!(worksheet.rows()[0].state, RowState::Ready(_)));
        assert_eq!(worksheet.rows()[1].state, RowState::Errored);
    }

    /// Records how many lookups overlap.
    #[derive(Default)]
    struct InFlight {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl StrokeSource for InFlight {
        fn name(&self) -> &'static str {
            "in-flight"
        }

        async fn lookup(&self, character: char) -> Result<StrokeSet, SheetError> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(set(character, 1))
        }
    }

    #[tokio::test]
    async fn test_concurrent_fetches_capped() {
        let strokes = Arc::new(InFlight::default());
        let sheets = Generator::new(strokes.clone(), Arc::new(StaticAnnotations::new()))
            .max_concurrent_fetches(3);

        let worksheet = sheets.generate("一二三四五六七八九十百千").await;

        assert_eq!(worksheet.rows().len(), 12);
        assert!(worksheet.is_settled());
        assert_eq!(strokes.peak.load(Ordering::SeqCst), 3);
        assert_eq!(strokes.current.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_max_concurrent_at_least_one() {
        let sheets = generator(Never).max_concurrent_fetches(0);
        assert_eq!(sheets.max_concurrent_fetches, 1);
    }
}
