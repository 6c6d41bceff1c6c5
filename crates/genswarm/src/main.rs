mod config;
mod error;
mod fetch;
mod handles;
mod leaderboard;
mod model;
mod pipeline;
mod prompt;
mod rank;
mod server;
mod sources;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use site_common::completion::CompletionClient;
use site_common::leaderboard_store::LeaderboardStore;

use config::Config;
use fetch::SourceFetcher;
use pipeline::ChatPipeline;
use server::AppState;
use sources::SourceCatalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting genswarm server");

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        completion_base_url = %config.completion.base_url,
        model = %config.completion.model,
        leaderboard = config.store.is_some(),
        "configuration loaded"
    );

    let catalog = Arc::new(SourceCatalog::gensyn());
    info!(
        sources = catalog.urls().len(),
        handles = catalog.known_handles().len(),
        "source catalog loaded"
    );

    let completion = Arc::new(CompletionClient::new(config.completion.clone())?);
    let fetcher = SourceFetcher::new()?;
    let pipeline = Arc::new(ChatPipeline::new(catalog, fetcher, completion));

    let store = LeaderboardStore::new(config.store.clone())?;
    if !store.is_configured() {
        warn!("SUPABASE_URL/SUPABASE_ANON_KEY not set, leaderboard routes will return errors");
    }

    let state = AppState {
        pipeline,
        store: Arc::new(store),
    };
    server::serve(config.bind_addr, state).await
}
