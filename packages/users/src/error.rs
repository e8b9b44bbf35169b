use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use userinsight_shared::ErrorBody;
use uuid::Uuid;

/// Body returned when the analyze workflow cannot complete.
pub const ANALYSIS_FAILED_MESSAGE: &str = "AI analysis failed. Please try again later.";

#[derive(Debug, Error)]
pub enum UsersError {
    #[error("user not found: {0}")]
    NotFound(Uuid),

    #[error("email already exists: {0}")]
    DuplicateEmail(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("enrichment request failed: {0}")]
    Enrichment(#[from] reqwest::Error),

    #[error("AI analysis failed: {0}")]
    AnalysisFailed(String),
}

impl IntoResponse for UsersError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::DuplicateEmail(_) => (StatusCode::CONFLICT, self.to_string()),
            Self::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::AnalysisFailed(_) => {
                tracing::error!(error = %self, "analysis failed");
                (StatusCode::BAD_GATEWAY, ANALYSIS_FAILED_MESSAGE.to_string())
            }
            Self::Io(_) | Self::Json(_) | Self::Enrichment(_) => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, UsersError>;
