//! Pinyin and meaning lookup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

use super::AnnotationSource;
use crate::error::SheetError;

/// Text shown when pinyin or meaning is unavailable.
pub const PLACEHOLDER: &str = "...";

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const GEMINI_DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Pinyin and meaning for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "char")]
    pub character: char,
    pub pinyin: String,
    pub meaning: String,
}

impl Annotation {
    pub fn new(character: char, pinyin: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            character,
            pinyin: pinyin.into(),
            meaning: meaning.into(),
        }
    }

    pub fn placeholder(character: char) -> Self {
        Self::new(character, PLACEHOLDER, PLACEHOLDER)
    }
}

/// Annotate `characters` with a single batched lookup.
///
/// Always returns exactly one annotation per requested character, in the
/// requested order. If the source fails outright every character gets
/// placeholder text; characters the source skipped get placeholders too.
pub async fn annotate(source: &dyn AnnotationSource, characters: &[char]) -> Vec<Annotation> {
    if characters.is_empty() {
        return Vec::new();
    }

    let found = match source.lookup(characters).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(source = source.name(), error = %e, "annotation lookup failed, using placeholders");
            Vec::new()
        }
    };

    let mut by_char: HashMap<char, Annotation> = HashMap::new();
    for annotation in found {
        by_char.entry(annotation.character).or_insert(annotation);
    }

    characters
        .iter()
        .map(|&c| by_char.remove(&c).unwrap_or_else(|| Annotation::placeholder(c)))
        .collect()
}

/// Always answers with placeholders.
pub struct PlaceholderAnnotations;

#[async_trait]
impl AnnotationSource for PlaceholderAnnotations {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    async fn lookup(&self, characters: &[char]) -> Result<Vec<Annotation>, SheetError> {
        Ok(characters.iter().map(|&c| Annotation::placeholder(c)).collect())
    }
}

/// In-memory annotations.
#[derive(Debug, Default, Clone)]
pub struct StaticAnnotations {
    entries: HashMap<char, Annotation>,
}

impl StaticAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, annotation: Annotation) -> Self {
        self.entries.insert(annotation.character, annotation);
        self
    }
}

#[async_trait]
impl AnnotationSource for StaticAnnotations {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn lookup(&self, characters: &[char]) -> Result<Vec<Annotation>, SheetError> {
        Ok(characters
            .iter()
            .filter_map(|c| self.entries.get(c).cloned())
            .collect())
    }
}

/// Asks a Gemini model for pinyin and short English meanings.
pub struct GeminiAnnotations {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

/// One element of the model's JSON answer.
#[derive(Debug, Deserialize)]
struct RawAnnotation {
    #[serde(rename = "char")]
    character: String,
    #[serde(default)]
    pinyin: String,
    #[serde(default)]
    meaning: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GeminiAnnotations {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: GEMINI_DEFAULT_MODEL.to_string(),
        }
    }

    /// Read the key from `GEMINI_API_KEY`, then `API_KEY`.
    pub fn from_env(client: reqwest::Client) -> Option<Self> {
        std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|key| Self::new(client, key))
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn request_body(characters: &[char]) -> serde_json::Value {
        let list = characters
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let prompt = format!(
            "Provide the Pinyin and English meaning for these Chinese characters: {}. \
             Return a JSON array where each item has \"char\", \"pinyin\", and \"meaning\" (short description).",
            list
        );

        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "char": { "type": "STRING" },
                            "pinyin": { "type": "STRING" },
                            "meaning": { "type": "STRING" }
                        },
                        "required": ["char", "pinyin", "meaning"]
                    }
                }
            }
        })
    }
}

/// Pull the annotation array out of a `generateContent` response body.
fn parse_generate_response(body: &str) -> Result<Vec<Annotation>, SheetError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| SheetError::AnnotationFetch(format!("Bad response: {}", e)))?;

    let text = response
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.trim())
        .ok_or_else(|| SheetError::AnnotationFetch("Empty response".to_string()))?;

    let raw: Vec<RawAnnotation> = serde_json::from_str(text)
        .map_err(|e| SheetError::AnnotationFetch(format!("Bad annotation JSON: {}", e)))?;

    Ok(raw
        .into_iter()
        .filter_map(|r| {
            let character = r.character.trim().chars().next()?;
            Some(Annotation::new(character, r.pinyin.trim(), r.meaning.trim()))
        })
        .collect())
}

#[async_trait]
impl AnnotationSource for GeminiAnnotations {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn lookup(&self, characters: &[char]) -> Result<Vec<Annotation>, SheetError> {
        let url = format!("{}/{}:generateContent", GEMINI_ENDPOINT, self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(characters))
            .send()
            .await
            .map_err(|e| SheetError::AnnotationFetch(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SheetError::AnnotationFetch(e.to_string()))?;
        if !status.is_success() {
            return Err(SheetError::AnnotationFetch(format!("HTTP {}", status)));
        }

        parse_generate_response(&body)
    }
}
