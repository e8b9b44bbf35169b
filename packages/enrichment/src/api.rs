use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::de::DeserializeOwned;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use userinsight_shared::{
    propagate_correlation_id, CorrelationId, HealthResponse, InsightsRequest, InsightsResponse,
    SentimentResponse, TagsResponse, TextRequest,
};

use crate::config::EnrichmentConfig;
use crate::enricher::{Enricher, RequestContext};
use crate::error::{EnrichmentError, Result};

#[derive(Clone)]
pub struct AppState {
    pub enricher: Arc<Enricher>,
    pub config: Arc<EnrichmentConfig>,
}

impl AppState {
    pub fn new(enricher: Enricher, config: EnrichmentConfig) -> Self {
        Self {
            enricher: Arc::new(enricher),
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/enrichment/sentiment", post(sentiment))
        .route("/enrichment/tags", post(tags))
        .route("/enrichment/insights", post(insights))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(propagate_correlation_id))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Decode a JSON body. An empty body decodes as the type's default so that
/// missing fields surface as validation errors.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| EnrichmentError::InvalidInput(format!("invalid JSON body: {e}")))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.enricher.provider();
    Json(HealthResponse {
        status: "ok".into(),
        provider: provider.name().to_string(),
        dependency: provider.probe().await,
        mock: state.config.mock_mode,
    })
}

async fn sentiment(
    State(state): State<AppState>,
    Extension(correlation_id): Extension<CorrelationId>,
    body: Bytes,
) -> Result<Json<SentimentResponse>> {
    let request: TextRequest = parse_body(&body)?;
    let ctx = RequestContext::new(correlation_id);
    let text = request.text.unwrap_or_default();
    Ok(Json(state.enricher.sentiment(&ctx, &text).await?))
}

async fn tags(
    State(state): State<AppState>,
    Extension(correlation_id): Extension<CorrelationId>,
    body: Bytes,
) -> Result<Json<TagsResponse>> {
    let request: TextRequest = parse_body(&body)?;
    let ctx = RequestContext::new(correlation_id);
    let text = request.text.unwrap_or_default();
    Ok(Json(state.enricher.tags(&ctx, &text).await?))
}

async fn insights(
    State(state): State<AppState>,
    Extension(correlation_id): Extension<CorrelationId>,
    body: Bytes,
) -> Result<Json<InsightsResponse>> {
    let profile: InsightsRequest = parse_body(&body)?;
    let ctx = RequestContext::new(correlation_id);
    Ok(Json(state.enricher.insights(&ctx, &profile).await?))
}
