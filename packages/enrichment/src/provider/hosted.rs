use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::EnrichmentConfig;
use crate::error::{is_rate_limit_message, EnrichmentError, Result};
use crate::extract::JsonObject;
use crate::prompt::with_json_instruction;
use crate::provider::{Generation, JsonGenerator};

/// One call plus one retry after a rate limit.
const MAX_ATTEMPTS: u32 = 2;

/// Client for the hosted Gemini `generateContent` API.
///
/// NOTE: Do NOT derive `Debug` on this struct, `api_key` would be exposed.
pub struct HostedClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base_url: String,
    model: String,
    rate_limit_backoff: Duration,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl HostedClient {
    pub fn new(config: &EnrichmentConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(EnrichmentError::LlmApiRequest)?;

        Ok(Self {
            http,
            api_key: config.gemini_api_key.clone(),
            api_base_url: config.gemini_api_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            rate_limit_backoff: config.rate_limit_backoff,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn request(&self, api_key: &str, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base_url, self.model
        );
        let body = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&body_text)
                .ok()
                .and_then(|r| r.error);
            let rate_limited_status = detail
                .as_ref()
                .is_some_and(|d| d.status.eq_ignore_ascii_case("RESOURCE_EXHAUSTED"));
            let message = detail.map(|d| d.message).unwrap_or(body_text);

            if status == 429 || rate_limited_status || is_rate_limit_message(&message) {
                return Err(EnrichmentError::LlmRateLimited { status, message });
            }
            return Err(EnrichmentError::LlmApiError { status, message });
        }

        let api_response: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| EnrichmentError::LlmResponseParse(e.to_string()))?;

        let text: String = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(EnrichmentError::LlmEmptyResponse);
        }

        debug!(model = %self.model, output_len = text.len(), "hosted model responded");
        Ok(text)
    }
}

#[async_trait]
impl JsonGenerator for HostedClient {
    async fn generate(
        &self,
        prompt: &str,
        fallback: &JsonObject,
        cancel: &CancellationToken,
    ) -> Generation {
        let Some(api_key) = self.api_key.as_deref() else {
            return Generation::failed(fallback, &EnrichmentError::MissingApiKey);
        };

        let full_prompt = with_json_instruction(prompt);

        let mut attempt = 1;
        loop {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(EnrichmentError::Cancelled),
                result = self.request(api_key, &full_prompt) => result,
            };

            match result {
                Ok(text) => return Generation::from_model_output(&text, fallback),
                Err(e) if e.is_rate_limited() && attempt < MAX_ATTEMPTS => {
                    warn!(
                        attempt,
                        error = %e,
                        backoff = ?self.rate_limit_backoff,
                        "hosted model rate limited, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            return Generation::failed(fallback, &EnrichmentError::Cancelled);
                        }
                        _ = tokio::time::sleep(self.rate_limit_backoff) => {}
                    }
                    attempt += 1;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "hosted model call failed");
                    return Generation::failed(fallback, &e);
                }
            }
        }
    }
}
