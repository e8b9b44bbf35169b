//! Wire protocol between the users service and the enrichment service.
//!
//! All bodies are JSON with camelCase field names. Response envelopes carry
//! provenance (`fallback`, `provider`, `correlationId`) next to the payload;
//! `error` is only present when a fallback was caused by a real failure.

use serde::{Deserialize, Serialize};

/// Body of `POST /enrichment/sentiment` and `POST /enrichment/tags`.
///
/// `text` is optional on the wire so that a missing field surfaces as a
/// validation error (400) rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TextRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Body of `POST /enrichment/insights`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResponse {
    pub sentiment_score: f64,
    pub label: String,
    #[serde(default)]
    pub fallback: bool,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub correlation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagsResponse {
    pub tags: Vec<String>,
    #[serde(default)]
    pub fallback: bool,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub correlation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub summary: String,
    pub engagement_level: String,
    pub recommended_actions: Vec<String>,
    #[serde(default)]
    pub fallback: bool,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub correlation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Best-effort reachability of the configured generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyStatus {
    Reachable,
    Unreachable,
    Configured,
    MissingKey,
    #[serde(rename = "n/a")]
    NotApplicable,
}

/// Body of `GET /health` on the enrichment service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
    pub dependency: DependencyStatus,
    pub mock: bool,
}

/// Error body returned by both services for 4xx/5xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
