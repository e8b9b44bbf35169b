use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use userinsight_shared::DependencyStatus;

use crate::config::EnrichmentConfig;
use crate::error::{EnrichmentError, Result};
use crate::extract::JsonObject;
use crate::prompt::with_json_instruction;
use crate::provider::{Generation, JsonGenerator};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a local model server speaking the Ollama HTTP API.
#[derive(Debug, Clone)]
pub struct LocalModelClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl LocalModelClient {
    pub fn new(config: &EnrichmentConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(EnrichmentError::LlmApiRequest)?;

        Ok(Self {
            http,
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.ollama_model.clone(),
        })
    }

    async fn request(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let full_prompt = with_json_instruction(prompt);
        let body = GenerateRequest {
            model: &self.model,
            prompt: &full_prompt,
            stream: false,
        };

        let resp = self.http.post(&url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(EnrichmentError::LlmApiError {
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| EnrichmentError::LlmResponseParse(e.to_string()))?;

        debug!(
            model = %self.model,
            output_len = generated.response.len(),
            "local model responded"
        );
        Ok(generated.response)
    }

    /// `GET {base}/api/tags` answers when the server is up.
    pub async fn probe(&self) -> DependencyStatus {
        let url = format!("{}/api/tags", self.base_url);
        match self.http.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(resp) if resp.status().is_success() => DependencyStatus::Reachable,
            Ok(resp) => {
                debug!(status = resp.status().as_u16(), "local model probe failed");
                DependencyStatus::Unreachable
            }
            Err(e) => {
                debug!(error = %e, "local model probe failed");
                DependencyStatus::Unreachable
            }
        }
    }
}

#[async_trait]
impl JsonGenerator for LocalModelClient {
    async fn generate(
        &self,
        prompt: &str,
        fallback: &JsonObject,
        cancel: &CancellationToken,
    ) -> Generation {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(EnrichmentError::Cancelled),
            result = self.request(prompt) => result,
        };

        match result {
            Ok(text) => Generation::from_model_output(&text, fallback),
            Err(e) => {
                warn!(error = %e, "local model call failed");
                Generation::failed(fallback, &e)
            }
        }
    }
}
