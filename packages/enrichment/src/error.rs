use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use userinsight_shared::ErrorBody;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("LLM API request failed: {0}")]
    LlmApiRequest(#[from] reqwest::Error),

    #[error("LLM API error (status {status}): {message}")]
    LlmApiError { status: u16, message: String },

    #[error("LLM rate limited (status {status}): {message}")]
    LlmRateLimited { status: u16, message: String },

    #[error("failed to parse LLM response: {0}")]
    LlmResponseParse(String),

    #[error("LLM returned empty response")]
    LlmEmptyResponse,

    #[error("model output was not valid JSON")]
    MalformedOutput,

    #[error("GEMINI_API_KEY missing")]
    MissingApiKey,

    #[error("request cancelled")]
    Cancelled,
}

impl EnrichmentError {
    /// Whether this failure is a rate-limit signal worth one delayed retry.
    ///
    /// Besides the typed variant, hosted SDKs and proxies tend to surface rate
    /// limits only as text, so the rendered message is checked as well.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::LlmRateLimited { .. } => true,
            Self::Cancelled | Self::MissingApiKey => false,
            other => is_rate_limit_message(&other.to_string()),
        }
    }
}

/// Substring check for rate-limit wording in an error message.
pub fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("429")
        || lower.contains("too many requests")
        || lower.contains("rate limit")
        || lower.contains("resource_exhausted")
}

impl IntoResponse for EnrichmentError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => {
                tracing::error!(error = %self, "enrichment request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, EnrichmentError>;
