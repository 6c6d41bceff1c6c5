/// Source fetcher: pulls every authoritative page in parallel and reduces it to text.
///
/// A page that cannot be fetched is not an error for the caller. It comes back as
/// [`FetchOutcome::Failed`] and turns into an empty [`Document`], which the ranker
/// scores as zero.
use std::sync::OnceLock;

use futures::future::join_all;
use regex::Regex;
use tracing::{debug, warn};

use site_common::error::CommonError;

use crate::model::Document;

/// Cap on the plain text kept per page, in characters.
pub const MAX_DOCUMENT_CHARS: usize = 4000;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(Document),
    Failed { url: String, reason: String },
}

impl FetchOutcome {
    pub fn url(&self) -> &str {
        match self {
            FetchOutcome::Fetched(doc) => &doc.url,
            FetchOutcome::Failed { url, .. } => url,
        }
    }

    pub fn into_document(self) -> Document {
        match self {
            FetchOutcome::Fetched(doc) => doc,
            FetchOutcome::Failed { url, .. } => Document::empty(url),
        }
    }
}

#[derive(Clone)]
pub struct SourceFetcher {
    http: reqwest::Client,
}

impl SourceFetcher {
    /// Plain GETs: no timeout, no retries, no custom headers.
    pub fn new() -> Result<Self, CommonError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http })
    }

    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let resp = match self.http.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(url, error = %e, "source fetch failed");
                return FetchOutcome::Failed {
                    url: url.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        let status = resp.status();
        match resp.text().await {
            Ok(body) => {
                let text = plain_text(&body);
                debug!(url, %status, chars = text.chars().count(), "source fetched");
                FetchOutcome::Fetched(Document::new(url, text))
            }
            Err(e) => {
                warn!(url, %status, error = %e, "source body unreadable");
                FetchOutcome::Failed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Fetch every URL concurrently and wait for all of them. Outcomes keep `urls` order.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<FetchOutcome> {
        join_all(urls.iter().map(|url| self.fetch(url))).await
    }
}

fn script_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<script[\s\S]*?</script>").expect("valid regex"))
}

fn style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<style[\s\S]*?</style>").expect("valid regex"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // An unterminated tag at the very end is dropped too.
    RE.get_or_init(|| Regex::new(r"</?[^>]+(>|$)").expect("valid regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Drop script/style blocks, replace tags with spaces, collapse whitespace, cap length.
pub fn plain_text(markup: &str) -> String {
    let text = script_re().replace_all(markup, "");
    let text = style_re().replace_all(&text, "");
    let text = tag_re().replace_all(&text, " ");
    let text = whitespace_re().replace_all(&text, " ");
    text.chars().take(MAX_DOCUMENT_CHARS).collect()
}
