/// The chat pipeline: fetch → rank → assemble → complete → post-process.
///
/// Each call builds its own documents and prompt; nothing is shared between requests
/// except the read-only catalog and the HTTP clients.
use std::sync::Arc;

use tracing::info;

use site_common::completion::CompletionClient;

use crate::error::AppError;
use crate::fetch::{FetchOutcome, SourceFetcher};
use crate::handles::apply_handle_policy;
use crate::model::{ChatResponse, Document};
use crate::prompt::assemble_messages;
use crate::rank::{format_context, rank_documents, DEFAULT_TOP_N};
use crate::sources::SourceCatalog;

pub const NO_MESSAGE: &str = "No message";

pub struct ChatPipeline {
    catalog: Arc<SourceCatalog>,
    fetcher: SourceFetcher,
    completion: Arc<CompletionClient>,
    top_n: usize,
}

impl ChatPipeline {
    pub fn new(
        catalog: Arc<SourceCatalog>,
        fetcher: SourceFetcher,
        completion: Arc<CompletionClient>,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            completion,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Answer one message. Blank input is [`AppError::Validation`]; a completion
    /// failure propagates. Page fetch failures never do.
    pub async fn answer(&self, message: Option<&str>) -> Result<ChatResponse, AppError> {
        let message = match message {
            Some(m) if !m.trim().is_empty() => m,
            _ => return Err(AppError::Validation(NO_MESSAGE)),
        };

        let outcomes = self.fetcher.fetch_all(self.catalog.urls()).await;
        let unavailable: Vec<&str> = outcomes
            .iter()
            .filter(|o| matches!(o, FetchOutcome::Failed { .. }))
            .map(FetchOutcome::url)
            .collect();
        if !unavailable.is_empty() {
            info!(?unavailable, "answering without some sources");
        }
        let documents: Vec<Document> = outcomes
            .into_iter()
            .map(FetchOutcome::into_document)
            .collect();

        let ranked = rank_documents(message, documents, self.top_n);
        info!(
            sources = self.catalog.urls().len(),
            top = ?ranked.iter().map(|s| s.document.url.as_str()).collect::<Vec<_>>(),
            "ranked sources"
        );
        let context = format_context(&ranked);

        let messages = assemble_messages(self.catalog.known_handles(), &context, message);
        let raw_reply = self.completion.complete(messages).await?;
        let reply = apply_handle_policy(message, raw_reply, self.catalog.known_handles());

        Ok(ChatResponse {
            reply,
            sources: self.catalog.urls().to_vec(),
        })
    }
}
