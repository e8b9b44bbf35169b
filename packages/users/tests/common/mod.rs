#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use userinsight_shared::{
    CorrelationId, DependencyStatus, HealthResponse, InsightsRequest, InsightsResponse,
    SentimentResponse, TagsResponse,
};
use userinsight_users::{EnrichmentApi, Result, User, UserInput, UsersError};

/// In-process stand-in for the enrichment service.
pub struct FakeEnrichment {
    fail_tags: bool,
    fail_health: bool,
    sentiment_delay: Option<Duration>,
    calls: AtomicUsize,
    seen_correlation_ids: Mutex<Vec<String>>,
}

impl FakeEnrichment {
    pub fn healthy() -> Self {
        Self {
            fail_tags: false,
            fail_health: false,
            sentiment_delay: None,
            calls: AtomicUsize::new(0),
            seen_correlation_ids: Mutex::new(Vec::new()),
        }
    }

    /// The tags call fails outright; the other two succeed.
    pub fn failing_tags() -> Self {
        Self {
            fail_tags: true,
            ..Self::healthy()
        }
    }

    /// The sentiment call answers only after `delay`.
    pub fn slow_sentiment(delay: Duration) -> Self {
        Self {
            sentiment_delay: Some(delay),
            ..Self::healthy()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            fail_tags: true,
            fail_health: true,
            ..Self::healthy()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_correlation_ids(&self) -> Vec<String> {
        self.seen_correlation_ids
            .lock()
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }

    fn record(&self, correlation_id: &CorrelationId) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut ids) = self.seen_correlation_ids.lock() {
            ids.push(correlation_id.to_string());
        }
    }
}

#[async_trait]
impl EnrichmentApi for FakeEnrichment {
    async fn sentiment(
        &self,
        _text: &str,
        correlation_id: &CorrelationId,
    ) -> Result<SentimentResponse> {
        self.record(correlation_id);
        if let Some(delay) = self.sentiment_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(SentimentResponse {
            sentiment_score: 0.7,
            label: "Positive".into(),
            fallback: false,
            provider: "fake".into(),
            correlation_id: correlation_id.to_string(),
            error: None,
        })
    }

    async fn tags(&self, _text: &str, correlation_id: &CorrelationId) -> Result<TagsResponse> {
        self.record(correlation_id);
        if self.fail_tags {
            return Err(UsersError::InvalidInput("tags unavailable".into()));
        }
        Ok(TagsResponse {
            tags: vec!["billing".into(), "support".into()],
            fallback: true,
            provider: "fake".into(),
            correlation_id: correlation_id.to_string(),
            error: None,
        })
    }

    async fn insights(
        &self,
        _profile: &InsightsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<InsightsResponse> {
        self.record(correlation_id);
        Ok(InsightsResponse {
            summary: "Happy long-term customer.".into(),
            engagement_level: "High".into(),
            recommended_actions: vec!["Offer loyalty discount".into()],
            fallback: false,
            provider: "fake".into(),
            correlation_id: correlation_id.to_string(),
            error: None,
        })
    }

    async fn health(&self, _correlation_id: &CorrelationId) -> Result<HealthResponse> {
        if self.fail_health {
            return Err(UsersError::AnalysisFailed("enrichment down".into()));
        }
        Ok(HealthResponse {
            status: "ok".into(),
            provider: "fake".into(),
            dependency: DependencyStatus::NotApplicable,
            mock: true,
        })
    }
}

pub fn sample_user(email: &str) -> User {
    User::new(UserInput {
        first_name: "Sara".into(),
        last_name: "Lind".into(),
        email: email.into(),
        notes: "Very happy with support, asked about invoices.".into(),
    })
    .expect("valid user")
}
