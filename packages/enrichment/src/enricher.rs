use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::info;
use userinsight_shared::{
    CorrelationId, InsightsRequest, InsightsResponse, SentimentResponse, TagsResponse,
};

use crate::coerce::FieldReader;
use crate::config::EnrichmentConfig;
use crate::error::{EnrichmentError, Result};
use crate::extract::JsonObject;
use crate::prompt::{build_insights_prompt, build_sentiment_prompt, build_tags_prompt};
use crate::provider::{Generation, JsonGenerator, Provider};

const DEFAULT_LABEL: &str = "Neutral";
const DEFAULT_ENGAGEMENT_LEVEL: &str = "Medium";

/// Per-request context threaded through every enrichment call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: CorrelationId,
    pub cancel: CancellationToken,
}

impl RequestContext {
    pub fn new(correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(correlation_id: CorrelationId, cancel: CancellationToken) -> Self {
        Self {
            correlation_id,
            cancel,
        }
    }
}

/// Turns free text and profiles into typed enrichment envelopes using the
/// configured provider.
pub struct Enricher {
    provider: Provider,
}

impl Enricher {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &EnrichmentConfig) -> Result<Self> {
        Ok(Self::new(Provider::from_config(config)?))
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub async fn sentiment(&self, ctx: &RequestContext, text: &str) -> Result<SentimentResponse> {
        require_text(text)?;

        let fallback = object(json!({ "sentimentScore": 0, "label": DEFAULT_LABEL }));
        let generation = self
            .provider
            .generate(&build_sentiment_prompt(text), &fallback, &ctx.cancel)
            .await;

        let fields = FieldReader::new(&generation.value);
        let sentiment_score = fields.number("sentimentScore", 0.0);
        let label = fields.string("label", DEFAULT_LABEL);
        let fallback = generation.fallback || fields.substituted();

        self.log_outcome(ctx, "sentiment", &generation, fallback);
        Ok(SentimentResponse {
            sentiment_score,
            label,
            fallback,
            provider: self.provider.name().to_string(),
            correlation_id: ctx.correlation_id.to_string(),
            error: generation.error,
        })
    }

    pub async fn tags(&self, ctx: &RequestContext, text: &str) -> Result<TagsResponse> {
        require_text(text)?;

        let fallback = object(json!({ "tags": [] }));
        let generation = self
            .provider
            .generate(&build_tags_prompt(text), &fallback, &ctx.cancel)
            .await;

        let fields = FieldReader::new(&generation.value);
        let tags = fields.string_list("tags");
        let fallback = generation.fallback || fields.substituted();

        self.log_outcome(ctx, "tags", &generation, fallback);
        Ok(TagsResponse {
            tags,
            fallback,
            provider: self.provider.name().to_string(),
            correlation_id: ctx.correlation_id.to_string(),
            error: generation.error,
        })
    }

    /// Profile insights. Every profile field is optional, so there is no
    /// validation step.
    pub async fn insights(
        &self,
        ctx: &RequestContext,
        profile: &InsightsRequest,
    ) -> Result<InsightsResponse> {
        let fallback = object(json!({
            "summary": "",
            "engagementLevel": DEFAULT_ENGAGEMENT_LEVEL,
            "recommendedActions": [],
        }));
        let generation = self
            .provider
            .generate(&build_insights_prompt(profile), &fallback, &ctx.cancel)
            .await;

        let fields = FieldReader::new(&generation.value);
        let summary = fields.string("summary", "");
        let engagement_level = fields.string("engagementLevel", DEFAULT_ENGAGEMENT_LEVEL);
        let recommended_actions = fields.string_list("recommendedActions");
        let fallback = generation.fallback || fields.substituted();

        self.log_outcome(ctx, "insights", &generation, fallback);
        Ok(InsightsResponse {
            summary,
            engagement_level,
            recommended_actions,
            fallback,
            provider: self.provider.name().to_string(),
            correlation_id: ctx.correlation_id.to_string(),
            error: generation.error,
        })
    }

    fn log_outcome(
        &self,
        ctx: &RequestContext,
        kind: &str,
        generation: &Generation,
        fallback: bool,
    ) {
        info!(
            correlation_id = %ctx.correlation_id,
            provider = self.provider.name(),
            kind,
            fallback,
            error = generation.error.as_deref().unwrap_or(""),
            "enrichment completed"
        );
    }
}

fn require_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(EnrichmentError::InvalidInput("text is required".into()));
    }
    Ok(())
}

fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}
