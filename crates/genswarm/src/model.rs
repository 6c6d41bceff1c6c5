use serde::{Deserialize, Serialize};

/// A fetched source page reduced to plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Source URL the text came from.
    pub url: String,
    /// Markup-free text, at most [`crate::fetch::MAX_DOCUMENT_CHARS`] characters.
    /// Empty when the fetch failed.
    pub text: String,
}

impl Document {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }

    /// The placeholder used for a source that could not be fetched.
    pub fn empty(url: impl Into<String>) -> Self {
        Self::new(url, String::new())
    }
}

/// A document with its similarity to the query, in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

/// Body of `POST /chat`. A missing or null message is rejected by the route, not by
/// deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `POST /leaderboard`. Every field is optional here so that presence can be
/// checked by the route with its own message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreSubmission {
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardResponse<T> {
    pub data: T,
}
