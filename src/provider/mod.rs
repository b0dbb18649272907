//! # External Data Providers
//!
//! The worksheet needs two kinds of outside data, each behind an async
//! trait so sources can be swapped (network, local files, in-memory):
//!
//! | Trait | Input | Output |
//! |-------|-------|--------|
//! | [`StrokeSource`] | one character | its [`StrokeSet`] |
//! | [`AnnotationSource`] | a batch of characters | pinyin + meaning per character |
//!
//! Callers never see annotation failures: [`annotate`] degrades them to
//! placeholder text.

mod annotations;
mod strokes;

pub use annotations::*;
pub use strokes::*;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::SheetError;
use crate::stroke::StrokeSet;

/// Looks up the stroke outlines of one character.
#[async_trait]
pub trait StrokeSource: Send + Sync {
    /// Source name for logs (e.g., "cdn").
    fn name(&self) -> &'static str;

    /// Fetch the stroke set for `character`.
    ///
    /// Unknown characters return [`SheetError::StrokeNotFound`]; data that
    /// cannot be parsed returns [`SheetError::StrokeMalformed`].
    async fn lookup(&self, character: char) -> Result<StrokeSet, SheetError>;
}

/// Looks up pinyin and meaning for a batch of characters.
#[async_trait]
pub trait AnnotationSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// One call for the whole batch. Results may be in any order and may
    /// omit characters.
    async fn lookup(&self, characters: &[char]) -> Result<Vec<Annotation>, SheetError>;
}

/// User agent for outgoing HTTP requests.
pub const USER_AGENT: &str = concat!("hanzi-sheet/", env!("CARGO_PKG_VERSION"));

/// Upper bound for any single outgoing request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared HTTP client.
pub fn http_client() -> Result<reqwest::Client, SheetError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| SheetError::Http(format!("HTTP client error: {}", e)))
}

#[async_trait]
impl<T: StrokeSource + ?Sized> StrokeSource for std::sync::Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn lookup(&self, character: char) -> Result<StrokeSet, SheetError> {
        (**self).lookup(character).await
    }
}
