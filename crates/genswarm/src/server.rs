/// HTTP surface: `POST /chat`, `GET|POST /leaderboard`, `GET /healthz`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use site_common::leaderboard_store::LeaderboardStore;

use crate::error::{ApiError, AppError};
use crate::leaderboard;
use crate::model::{ChatRequest, ChatResponse};
use crate::pipeline::ChatPipeline;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChatPipeline>,
    pub store: Arc<LeaderboardStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/chat", post(chat))
        .route(
            "/leaderboard",
            get(leaderboard::get_leaderboard).post(leaderboard::submit_score),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening: POST /chat, GET|POST /leaderboard, GET /healthz");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    info!("server shut down");
    Ok(())
}

/// Bodies are parsed here rather than with the `Json` extractor so that a missing
/// content type is not itself a rejection.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::InvalidBody(e.to_string()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    let result = match parse_json::<ChatRequest>(&body) {
        Ok(request) => state.pipeline.answer(request.message.as_deref()).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => Ok(Json(response)),
        Err(AppError::Validation(message)) => Err(ApiError::bad_request(message)),
        Err(e) => {
            error!(error = %e, "chat failed");
            Err(ApiError::internal(format!("Chat failed: {e}")))
        }
    }
}
