use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use site_common::completion::CompletionError;
use site_common::error::CommonError;

use crate::model::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("config error: {0}")]
    Config(String),

    /// Caller input the route refuses; the message is returned verbatim with a 400.
    #[error("{0}")]
    Validation(&'static str),

    #[error("invalid request body: {0}")]
    InvalidBody(String),
}

/// An HTTP error as the client sees it: a status and `{ "error": message }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
