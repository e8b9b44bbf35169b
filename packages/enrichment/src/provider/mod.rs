//! Generation backends.
//!
//! Each adapter turns a prompt into a JSON object and never fails outward:
//! transport errors, bad statuses, rate limits, malformed output and
//! cancellation all come back as a [`Generation`] carrying the caller's
//! fallback object, `fallback = true` and an error description.

pub mod hosted;
pub mod local;
pub mod mock;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use userinsight_shared::DependencyStatus;

use crate::config::{EnrichmentConfig, ProviderKind};
use crate::error::{EnrichmentError, Result};
use crate::extract::{extract_json_object, JsonObject};

pub use hosted::HostedClient;
pub use local::LocalModelClient;
pub use mock::MockGenerator;

/// Outcome of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub value: JsonObject,
    pub fallback: bool,
    pub error: Option<String>,
}

impl Generation {
    /// Deliberate fallback with no underlying failure.
    pub fn fallback(fallback: &JsonObject) -> Self {
        Self {
            value: fallback.clone(),
            fallback: true,
            error: None,
        }
    }

    /// Fallback caused by a real failure.
    pub fn failed(fallback: &JsonObject, error: &EnrichmentError) -> Self {
        Self {
            value: fallback.clone(),
            fallback: true,
            error: Some(error.to_string()),
        }
    }

    /// Run raw model text through the extractor.
    pub fn from_model_output(raw: &str, fallback: &JsonObject) -> Self {
        let extraction = extract_json_object(raw, fallback);
        if extraction.used_fallback {
            tracing::warn!(output_len = raw.len(), "model output did not contain a JSON object");
            Self::failed(fallback, &EnrichmentError::MalformedOutput)
        } else {
            Self {
                value: extraction.value,
                fallback: false,
                error: None,
            }
        }
    }
}

/// Capability shared by every backend.
#[async_trait]
pub trait JsonGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        fallback: &JsonObject,
        cancel: &CancellationToken,
    ) -> Generation;
}

/// The backend selected at startup.
pub enum Provider {
    Local(LocalModelClient),
    Hosted(HostedClient),
    Mock(MockGenerator),
}

impl Provider {
    /// Build the provider named by the configuration. Mock mode wins over
    /// the configured provider.
    pub fn from_config(config: &EnrichmentConfig) -> Result<Self> {
        let provider = match config.effective_provider() {
            ProviderKind::Local => Self::Local(LocalModelClient::new(config)?),
            ProviderKind::Hosted => Self::Hosted(HostedClient::new(config)?),
            ProviderKind::Mock => Self::Mock(MockGenerator),
        };
        Ok(provider)
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Local(_) => ProviderKind::Local,
            Self::Hosted(_) => ProviderKind::Hosted,
            Self::Mock(_) => ProviderKind::Mock,
        }
    }

    /// Name reported in response envelopes and health output.
    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Best-effort reachability of the backend.
    pub async fn probe(&self) -> DependencyStatus {
        match self {
            Self::Local(client) => client.probe().await,
            Self::Hosted(client) => {
                if client.has_api_key() {
                    DependencyStatus::Configured
                } else {
                    DependencyStatus::MissingKey
                }
            }
            Self::Mock(_) => DependencyStatus::NotApplicable,
        }
    }
}

#[async_trait]
impl JsonGenerator for Provider {
    async fn generate(
        &self,
        prompt: &str,
        fallback: &JsonObject,
        cancel: &CancellationToken,
    ) -> Generation {
        match self {
            Self::Local(client) => client.generate(prompt, fallback, cancel).await,
            Self::Hosted(client) => client.generate(prompt, fallback, cancel).await,
            Self::Mock(mock) => mock.generate(prompt, fallback, cancel).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        }
    }

    #[test]
    fn model_output_with_object_is_not_fallback() {
        let generation =
            Generation::from_model_output("{\"tags\":[\"a\"]}", &object(json!({ "tags": [] })));
        assert!(!generation.fallback);
        assert!(generation.error.is_none());
        assert_eq!(generation.value.get("tags"), Some(&json!(["a"])));
    }

    #[test]
    fn malformed_model_output_carries_error() {
        let fallback = object(json!({ "tags": [] }));
        let generation = Generation::from_model_output("no json here", &fallback);
        assert!(generation.fallback);
        assert_eq!(generation.value, fallback);
        assert_eq!(
            generation.error.as_deref(),
            Some("model output was not valid JSON")
        );
    }

    #[test]
    fn mock_mode_selects_mock_provider() {
        let config = EnrichmentConfig::builder()
            .provider(ProviderKind::Hosted)
            .mock_mode(true)
            .build();
        let provider = Provider::from_config(&config).expect("provider");
        assert_eq!(provider.kind(), ProviderKind::Mock);
        assert_eq!(provider.name(), "mock");
    }

    #[tokio::test]
    async fn hosted_probe_reports_key_presence() {
        let without_key = Provider::from_config(
            &EnrichmentConfig::builder()
                .provider(ProviderKind::Hosted)
                .build(),
        )
        .expect("provider");
        assert_eq!(without_key.probe().await, DependencyStatus::MissingKey);

        let with_key = Provider::from_config(
            &EnrichmentConfig::builder()
                .provider(ProviderKind::Hosted)
                .gemini_api_key("k")
                .build(),
        )
        .expect("provider");
        assert_eq!(with_key.probe().await, DependencyStatus::Configured);
    }
}
