use chrono::Utc;
use tracing::{info, warn};
use userinsight_shared::{CorrelationId, InsightsRequest};
use uuid::Uuid;

use crate::enrichment_client::EnrichmentApi;
use crate::error::{Result, UsersError};
use crate::models::{AnalysisFallbacks, AnalysisReport, AnalysisUpdate};
use crate::store::UserRepository;

/// Run sentiment, tags and insights for one record and persist the results.
///
/// The three calls run concurrently. If any of them fails outright the record
/// is left untouched and `AnalysisFailed` is returned; fallback answers count
/// as success.
pub async fn analyze_user(
    repo: &dyn UserRepository,
    enrichment: &dyn EnrichmentApi,
    id: Uuid,
    correlation_id: &CorrelationId,
) -> Result<AnalysisReport> {
    let user = repo.get_by_id(id).await?.ok_or(UsersError::NotFound(id))?;

    let profile = InsightsRequest {
        first_name: Some(user.first_name.clone()),
        last_name: Some(user.last_name.clone()),
        email: Some(user.email.clone()),
        notes: Some(user.notes.clone()),
    };

    let (sentiment, tags, insights) = tokio::try_join!(
        enrichment.sentiment(&user.notes, correlation_id),
        enrichment.tags(&user.notes, correlation_id),
        enrichment.insights(&profile, correlation_id),
    )
    .map_err(|e| {
        warn!(user_id = %id, %correlation_id, error = %e, "enrichment call failed");
        UsersError::AnalysisFailed(e.to_string())
    })?;

    // Written onto the stored record as it is now, not the copy read above.
    let analyzed_at = Utc::now();
    repo.record_analysis(
        id,
        AnalysisUpdate {
            sentiment_score: sentiment.sentiment_score,
            tags: tags.tags.clone(),
            engagement_level: insights.engagement_level.clone(),
            analyzed_at,
        },
    )
    .await?;

    let fallback = AnalysisFallbacks {
        sentiment: sentiment.fallback,
        tags: tags.fallback,
        insights: insights.fallback,
    };
    info!(
        user_id = %id,
        %correlation_id,
        sentiment_fallback = fallback.sentiment,
        tags_fallback = fallback.tags,
        insights_fallback = fallback.insights,
        "user analyzed"
    );

    Ok(AnalysisReport {
        id,
        sentiment_score: sentiment.sentiment_score,
        label: sentiment.label,
        tags: tags.tags,
        engagement_level: insights.engagement_level,
        last_analyzed_at: analyzed_at,
        summary: insights.summary,
        recommended_actions: insights.recommended_actions,
        fallback,
    })
}
