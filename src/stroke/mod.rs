//! # Stroke Data
//!
//! A [`StrokeSet`] is the ordered list of stroke outlines for one character,
//! index 0 being the first stroke written. The outlines are opaque SVG path
//! strings in a 1024×1024 box with y increasing downward; nothing in this
//! crate looks inside them beyond a shape check.
//!
//! [`present`] turns a stroke set into what a single cell shows.

mod present;

pub use present::*;

use serde::{Deserialize, Serialize};

use crate::error::SheetError;

/// Side of the square coordinate space stroke paths are authored in.
pub const STROKE_VIEWBOX: u32 = 1024;

/// One stroke outline, as an SVG path `d` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokePath(String);

impl StrokePath {
    pub fn new(d: impl Into<String>) -> Self {
        Self(d.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Canonical stroke order for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeSet {
    pub character: char,
    pub strokes: Vec<StrokePath>,
}

/// Wire shape of a hanzi-writer-data character file.
///
/// `medians` (stroke centre lines) are present in the files but unused.
#[derive(Debug, Deserialize)]
struct RawStrokeData {
    strokes: Vec<String>,
}

impl StrokeSet {
    pub fn new(character: char, strokes: Vec<StrokePath>) -> Self {
        Self { character, strokes }
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Parse a hanzi-writer-data JSON document (`{"strokes": [...], "medians": [...]}`).
    ///
    /// Any parse or shape failure is reported as [`SheetError::StrokeMalformed`]:
    /// invalid JSON, no strokes, or a stroke that is not a path starting with
    /// a move-to command.
    pub fn from_json(character: char, bytes: &[u8]) -> Result<Self, SheetError> {
        let malformed = |reason: String| SheetError::StrokeMalformed { character, reason };

        let raw: RawStrokeData =
            serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;

        if raw.strokes.is_empty() {
            return Err(malformed("no strokes".to_string()));
        }

        let mut strokes = Vec::with_capacity(raw.strokes.len());
        for (i, d) in raw.strokes.into_iter().enumerate() {
            let trimmed = d.trim();
            if !trimmed.starts_with(['M', 'm']) {
                return Err(malformed(format!("stroke {} is not a path", i)));
            }
            strokes.push(StrokePath::new(trimmed));
        }

        Ok(Self { character, strokes })
    }
}
