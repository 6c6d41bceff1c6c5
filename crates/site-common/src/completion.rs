use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CommonError;

pub const DEFAULT_BASE_URL: &str = "https://api.fireworks.ai/inference/v1";
pub const DEFAULT_MODEL: &str =
    "accounts/sentientfoundation-serverless/models/dobby-mini-unhinged-plus-llama-3-1-8b";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

#[derive(Clone, Debug)]
pub struct CompletionClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub max_error_body_bytes: usize,
}

impl CompletionClientConfig {
    /// Config with the fixed model parameters and the given endpoint/credential.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            max_error_body_bytes: 8 * 1024,
        }
    }

    /// Load from the environment.
    ///
    /// Required:
    /// - `FIREWORKS_API_KEY`: bearer credential for the completion endpoint
    ///
    /// Optional:
    /// - `COMPLETION_BASE_URL`: defaults to the hosted Fireworks inference API
    /// - `COMPLETION_MODEL`: defaults to [`DEFAULT_MODEL`]
    /// - `COMPLETION_MAX_ERROR_BODY_BYTES`: cap on the error body carried upward
    pub fn from_env() -> Result<Self, CommonError> {
        let api_key = std::env::var("FIREWORKS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(CommonError::MissingEnv("FIREWORKS_API_KEY"))?;

        let base_url =
            std::env::var("COMPLETION_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(base_url, api_key);

        if let Ok(model) = std::env::var("COMPLETION_MODEL") {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }

        if let Ok(raw) = std::env::var("COMPLETION_MAX_ERROR_BODY_BYTES") {
            config.max_error_body_bytes =
                raw.parse::<usize>().map_err(|_| CommonError::InvalidEnv {
                    name: "COMPLETION_MAX_ERROR_BODY_BYTES",
                    value: raw.clone(),
                })?;
        }

        Ok(config)
    }
}

/// Failure talking to the hosted completion service. Nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("completion service returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },
}

#[derive(Clone)]
pub struct CompletionClient {
    config: CompletionClientConfig,
    http: reqwest::Client,
}

impl CompletionClient {
    pub fn new(config: CompletionClientConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .user_agent("genswarm/chat")
            .build()?;
        Ok(Self { config, http })
    }

    pub async fn chat_completions(
        &self,
        messages: Vec<Message>,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages,
        };

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion"
        );
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = read_limited_text(resp, self.config.max_error_body_bytes).await;
            return Err(CompletionError::Upstream { status, body });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send `messages` and return the reply text; see [`ChatCompletionResponse::reply_text`].
    pub async fn complete(&self, messages: Vec<Message>) -> Result<String, CompletionError> {
        let response = self.chat_completions(messages).await?;
        Ok(response.reply_text())
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read completion error body");
            "<failed to read error body>".to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub messages: Vec<Message>,
}

/// Only the fields the reply is read from; anything else the provider sends is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<ChatCompletionChoice>>,
}

impl ChatCompletionResponse {
    /// First choice's message content, else its legacy `text`, else `""`.
    /// Empty strings fall through like absent ones.
    pub fn reply_text(&self) -> String {
        let Some(choice) = self.choices.as_deref().and_then(|c| c.first()) else {
            return String::new();
        };
        choice
            .message
            .as_ref()
            .and_then(|m| m.content.as_deref())
            .filter(|s| !s.is_empty())
            .or_else(|| choice.text.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or_default()
            .to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    #[serde(default)]
    pub message: Option<ChatCompletionMessage>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}
