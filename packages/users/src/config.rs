use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "./Data";
pub const DEFAULT_ENRICHMENT_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_ENRICHMENT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_PORT: u16 = 8080;

/// Users service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct UsersConfig {
    pub data_dir: PathBuf,
    pub enrichment_base_url: String,
    pub enrichment_timeout_secs: u64,
    pub port: u16,
}

impl UsersConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("USERS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let enrichment_base_url = std::env::var("ENRICHMENT_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_ENRICHMENT_BASE_URL.into());

        let enrichment_timeout_secs = std::env::var("ENRICHMENT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_ENRICHMENT_TIMEOUT_SECS);

        let port = std::env::var("USERS_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            data_dir,
            enrichment_base_url,
            enrichment_timeout_secs,
            port,
        }
    }

    /// Defaults with an explicit data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            enrichment_base_url: DEFAULT_ENRICHMENT_BASE_URL.into(),
            enrichment_timeout_secs: DEFAULT_ENRICHMENT_TIMEOUT_SECS,
            port: DEFAULT_PORT,
        }
    }

    pub fn with_enrichment_base_url(mut self, url: impl Into<String>) -> Self {
        self.enrichment_base_url = url.into();
        self
    }

    pub fn with_enrichment_timeout_secs(mut self, secs: u64) -> Self {
        self.enrichment_timeout_secs = secs;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}
