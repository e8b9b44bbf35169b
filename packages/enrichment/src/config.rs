use std::fmt;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-lite";
pub const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Wait before the single retry after a hosted-API rate limit.
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(2);

/// Which generation backend serves enrichment requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Local model server speaking the Ollama HTTP API.
    #[default]
    Local,
    /// Hosted Gemini API.
    Hosted,
    /// No generation; every call answers with fallback values.
    Mock,
}

impl ProviderKind {
    /// Parse a provider selector. Unrecognized names fall back to `Local`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "local" | "ollama" => Self::Local,
            "hosted" | "gemini" => Self::Hosted,
            "mock" => Self::Mock,
            other => {
                tracing::warn!(provider = other, "unrecognized AI provider, defaulting to local");
                Self::Local
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Hosted => "hosted",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide enrichment configuration, read once at startup.
#[derive(Clone)]
pub struct EnrichmentConfig {
    pub provider: ProviderKind,
    /// Forces the mock provider regardless of `provider`.
    pub mock_mode: bool,
    pub ollama_url: String,
    pub ollama_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base_url: String,
    pub timeout_secs: u64,
    pub rate_limit_backoff: Duration,
    pub port: u16,
}

impl EnrichmentConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let provider = std::env::var("AI_PROVIDER")
            .map(|v| ProviderKind::parse(&v))
            .unwrap_or_default();

        let mock_mode = std::env::var("MOCK_AI")
            .ok()
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        let ollama_url =
            std::env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.into());

        let ollama_model =
            std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.into());

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into());

        let gemini_api_base_url = std::env::var("GEMINI_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE_URL.into());

        let timeout_secs = std::env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            provider,
            mock_mode,
            ollama_url,
            ollama_model,
            gemini_api_key,
            gemini_model,
            gemini_api_base_url,
            timeout_secs,
            rate_limit_backoff: RATE_LIMIT_BACKOFF,
            port,
        }
    }

    /// Create a config builder for testing.
    pub fn builder() -> EnrichmentConfigBuilder {
        EnrichmentConfigBuilder {
            provider: ProviderKind::Local,
            mock_mode: false,
            ollama_url: DEFAULT_OLLAMA_URL.into(),
            ollama_model: DEFAULT_OLLAMA_MODEL.into(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.into(),
            gemini_api_base_url: DEFAULT_GEMINI_API_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            rate_limit_backoff: RATE_LIMIT_BACKOFF,
            port: DEFAULT_PORT,
        }
    }

    /// The provider that actually serves requests once mock mode is applied.
    pub fn effective_provider(&self) -> ProviderKind {
        if self.mock_mode {
            ProviderKind::Mock
        } else {
            self.provider
        }
    }
}

// Hand-written so the API key never reaches logs.
impl fmt::Debug for EnrichmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentConfig")
            .field("provider", &self.provider)
            .field("mock_mode", &self.mock_mode)
            .field("ollama_url", &self.ollama_url)
            .field("ollama_model", &self.ollama_model)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_api_base_url", &self.gemini_api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("rate_limit_backoff", &self.rate_limit_backoff)
            .field("port", &self.port)
            .finish()
    }
}

/// Builder for constructing `EnrichmentConfig` in tests.
pub struct EnrichmentConfigBuilder {
    provider: ProviderKind,
    mock_mode: bool,
    ollama_url: String,
    ollama_model: String,
    gemini_api_key: Option<String>,
    gemini_model: String,
    gemini_api_base_url: String,
    timeout_secs: u64,
    rate_limit_backoff: Duration,
    port: u16,
}

impl EnrichmentConfigBuilder {
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    pub fn mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    pub fn ollama_url(mut self, ollama_url: impl Into<String>) -> Self {
        self.ollama_url = ollama_url.into();
        self
    }

    pub fn ollama_model(mut self, ollama_model: impl Into<String>) -> Self {
        self.ollama_model = ollama_model.into();
        self
    }

    pub fn gemini_api_key(mut self, gemini_api_key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(gemini_api_key.into());
        self
    }

    pub fn gemini_model(mut self, gemini_model: impl Into<String>) -> Self {
        self.gemini_model = gemini_model.into();
        self
    }

    pub fn gemini_api_base_url(mut self, gemini_api_base_url: impl Into<String>) -> Self {
        self.gemini_api_base_url = gemini_api_base_url.into();
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn rate_limit_backoff(mut self, rate_limit_backoff: Duration) -> Self {
        self.rate_limit_backoff = rate_limit_backoff;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn build(self) -> EnrichmentConfig {
        EnrichmentConfig {
            provider: self.provider,
            mock_mode: self.mock_mode,
            ollama_url: self.ollama_url,
            ollama_model: self.ollama_model,
            gemini_api_key: self.gemini_api_key,
            gemini_model: self.gemini_model,
            gemini_api_base_url: self.gemini_api_base_url,
            timeout_secs: self.timeout_secs,
            rate_limit_backoff: self.rate_limit_backoff,
            port: self.port,
        }
    }
}
