/// Client for the hosted leaderboard table.
///
/// The store speaks the PostgREST dialect (Supabase). It owns the uniqueness rule:
/// at most one row per `(handle, difficulty)`, so a resubmission overwrites.
///
/// When no store is configured every operation fails with [`StoreError::NotConfigured`];
/// the rest of the site keeps working without it.
use std::fmt;
use std::str::FromStr;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CommonError;

const DEFAULT_TABLE: &str = "leaderboard";
const SELECT_COLUMNS: &str = "handle,score,difficulty,created_at";
const CONFLICT_TARGET: &str = "handle,difficulty";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

/// A row of the leaderboard table, as the store returns it.
///
/// Rows are passed through to clients untouched. Only writes go through
/// [`Difficulty`]; rows written before that check may hold other casings or values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub handle: String,
    pub score: serde_json::Value,
    pub difficulty: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A score to write. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewScore {
    pub handle: String,
    pub score: i64,
    pub difficulty: Difficulty,
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Project URL, e.g. "https://abc.supabase.co".
    pub base_url: String,
    /// Public (anon) key, sent as both `apikey` and bearer token.
    pub anon_key: String,
    pub table: String,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// `SUPABASE_URL` and `SUPABASE_ANON_KEY`; `None` unless both are set.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("SUPABASE_URL").ok().filter(|s| !s.trim().is_empty())?;
        let key = std::env::var("SUPABASE_ANON_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())?;
        Some(Self::new(url, key))
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("leaderboard store is not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("store rejected request: status={status} message={message}")]
    Rejected { status: StatusCode, message: String },
}

impl StoreError {
    /// The store's own error message, when it sent one.
    pub fn store_message(&self) -> Option<&str> {
        match self {
            StoreError::Rejected { message, .. } if !message.is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
}

#[derive(Clone)]
pub struct LeaderboardStore {
    config: Option<StoreConfig>,
    http: reqwest::Client,
}

impl LeaderboardStore {
    pub fn new(config: Option<StoreConfig>) -> Result<Self, CommonError> {
        let http = reqwest::Client::builder()
            .user_agent("genswarm/leaderboard")
            .build()?;
        Ok(Self { config, http })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Highest scores first, at most `limit` rows.
    pub async fn top_scores(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let config = self.config.as_ref().ok_or(StoreError::NotConfigured)?;
        let limit = limit.to_string();
        let resp = self
            .http
            .get(config.table_url())
            .header("apikey", &config.anon_key)
            .bearer_auth(&config.anon_key)
            .query(&[
                ("select", SELECT_COLUMNS),
                ("order", "score.desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        parse_rows(resp).await
    }

    /// Insert, or overwrite the existing row for the same `(handle, difficulty)`.
    /// Returns the rows as written.
    pub async fn upsert_score(
        &self,
        score: &NewScore,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let config = self.config.as_ref().ok_or(StoreError::NotConfigured)?;
        debug!(
            handle = %score.handle,
            difficulty = %score.difficulty,
            score = score.score,
            "upserting leaderboard score"
        );
        let resp = self
            .http
            .post(config.table_url())
            .header("apikey", &config.anon_key)
            .bearer_auth(&config.anon_key)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .query(&[("on_conflict", CONFLICT_TARGET)])
            .json(&[score])
            .send()
            .await?;
        parse_rows(resp).await
    }
}

async fn parse_rows(resp: reqwest::Response) -> Result<Vec<LeaderboardEntry>, StoreError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if status.is_success() {
        return Ok(serde_json::from_slice(&bytes)?);
    }

    let body = String::from_utf8_lossy(&bytes).to_string();
    let message = serde_json::from_slice::<PostgrestError>(&bytes)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or(body);
    warn!(%status, store_message = %message, "leaderboard store rejected request");
    Err(StoreError::Rejected { status, message })
}
