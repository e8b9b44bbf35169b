use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use userinsight_shared::{
    CorrelationId, HealthResponse, InsightsRequest, InsightsResponse, SentimentResponse,
    TagsResponse, TextRequest, CORRELATION_ID_HEADER,
};

use crate::config::UsersConfig;
use crate::error::Result;

/// Calls into the enrichment service. Fallback answers are successes; only
/// transport failures and non-2xx statuses are errors.
#[async_trait]
pub trait EnrichmentApi: Send + Sync {
    async fn sentiment(
        &self,
        text: &str,
        correlation_id: &CorrelationId,
    ) -> Result<SentimentResponse>;

    async fn tags(&self, text: &str, correlation_id: &CorrelationId) -> Result<TagsResponse>;

    async fn insights(
        &self,
        profile: &InsightsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<InsightsResponse>;

    async fn health(&self, correlation_id: &CorrelationId) -> Result<HealthResponse>;
}

/// HTTP client for the enrichment service.
#[derive(Debug, Clone)]
pub struct HttpEnrichmentClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEnrichmentClient {
    pub fn new(config: &UsersConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.enrichment_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.enrichment_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn with_correlation(
        request: reqwest::RequestBuilder,
        correlation_id: &CorrelationId,
    ) -> reqwest::RequestBuilder {
        request.header(CORRELATION_ID_HEADER, correlation_id.as_str())
    }

    async fn post<B, T>(&self, path: &str, body: &B, correlation_id: &CorrelationId) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, %correlation_id, "calling enrichment service");

        let resp = Self::with_correlation(self.http.post(&url).json(body), correlation_id)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl EnrichmentApi for HttpEnrichmentClient {
    async fn sentiment(
        &self,
        text: &str,
        correlation_id: &CorrelationId,
    ) -> Result<SentimentResponse> {
        self.post("/enrichment/sentiment", &TextRequest::new(text), correlation_id)
            .await
    }

    async fn tags(&self, text: &str, correlation_id: &CorrelationId) -> Result<TagsResponse> {
        self.post("/enrichment/tags", &TextRequest::new(text), correlation_id)
            .await
    }

    async fn insights(
        &self,
        profile: &InsightsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<InsightsResponse> {
        self.post("/enrichment/insights", profile, correlation_id)
            .await
    }

    async fn health(&self, correlation_id: &CorrelationId) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        let resp = Self::with_correlation(self.http.get(&url), correlation_id)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }
}
