//! Correlation identifiers.
//!
//! Every request entering either service carries an `X-Correlation-ID`
//! header. When the caller did not send one, a fresh identifier is generated
//! at the first hop. The identifier is stored as a request extension, echoed
//! on the response, and recorded on the request span so log lines can be
//! joined across services.

use std::fmt;

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the correlation identifier (lowercase, as normalized by `http`).
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Opaque identifier tying a request to every downstream call it causes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a caller-supplied identifier. Blank values are rejected.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Read the identifier from request headers, if present and usable.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(Self::parse)
    }

    pub fn from_headers_or_generate(headers: &HeaderMap) -> Self {
        Self::from_headers(headers).unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.0).ok()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Axum middleware: resolve the correlation id, expose it to handlers as an
/// `Extension<CorrelationId>`, and echo it on the response.
pub async fn propagate_correlation_id(mut request: Request, next: Next) -> Response {
    let correlation_id = CorrelationId::from_headers_or_generate(request.headers());
    request.extensions_mut().insert(correlation_id.clone());

    let span = tracing::info_span!(
        "http.request",
        correlation_id = %correlation_id,
        method = %request.method(),
        route = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    if let Some(value) = correlation_id.header_value() {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}
