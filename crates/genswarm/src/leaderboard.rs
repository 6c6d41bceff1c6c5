/// Leaderboard routes: a thin proxy over the hosted store.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use tracing::error;

use site_common::leaderboard_store::{Difficulty, LeaderboardEntry, NewScore};

use crate::error::{ApiError, AppError};
use crate::model::{LeaderboardResponse, ScoreSubmission};
use crate::server::{parse_json, AppState};

pub const TOP_LIMIT: usize = 10;
pub const MISSING_FIELDS: &str = "Missing required fields.";
pub const FETCH_FAILED: &str = "Failed to fetch leaderboard.";
pub const SUBMIT_FAILED: &str = "Failed to submit score.";

/// Presence check with the quiz client's truthiness rules: an empty handle, an empty
/// difficulty and a score of `0` all count as missing. A difficulty outside
/// easy/medium/hard is refused the same way.
pub fn validate(submission: ScoreSubmission) -> Result<NewScore, AppError> {
    let handle = submission.handle.filter(|h| !h.is_empty());
    let score = submission.score.filter(|&s| s != 0);
    let difficulty = submission.difficulty.filter(|d| !d.is_empty());

    let (Some(handle), Some(score), Some(difficulty)) = (handle, score, difficulty) else {
        return Err(AppError::Validation(MISSING_FIELDS));
    };
    let difficulty = difficulty
        .parse::<Difficulty>()
        .map_err(|_| AppError::Validation(MISSING_FIELDS))?;

    Ok(NewScore {
        handle,
        score,
        difficulty,
    })
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse<Vec<LeaderboardEntry>>>, ApiError> {
    match state.store.top_scores(TOP_LIMIT).await {
        Ok(data) => Ok(Json(LeaderboardResponse { data })),
        Err(e) => {
            error!(error = %e, "leaderboard fetch failed");
            Err(ApiError::internal(FETCH_FAILED))
        }
    }
}

pub async fn submit_score(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LeaderboardResponse<Vec<LeaderboardEntry>>>, ApiError> {
    let submission: ScoreSubmission = parse_json(&body).map_err(|e| {
        error!(error = %e, "leaderboard submission rejected");
        ApiError::internal(e.to_string())
    })?;

    let score = validate(submission).map_err(|e| ApiError::bad_request(e.to_string()))?;

    match state.store.upsert_score(&score).await {
        Ok(data) => Ok(Json(LeaderboardResponse { data })),
        Err(e) => {
            error!(error = %e, handle = %score.handle, "leaderboard insert/update failed");
            Err(ApiError::internal(e.store_message().unwrap_or(SUBMIT_FAILED)))
        }
    }
}
