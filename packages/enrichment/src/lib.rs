//! UserInsight enrichment service
//!
//! Derives sentiment, tags and profile insights from free text with a
//! generative backend, degrading to typed fallback values whenever the
//! backend is unavailable or its output unusable:
//! - Response extraction and lenient field coercion ([`extract`], [`coerce`])
//! - Local, hosted and mock backends ([`provider`])
//! - The orchestrator building response envelopes ([`enricher`])
//! - The HTTP surface ([`api`])

pub mod api;
pub mod coerce;
pub mod config;
pub mod enricher;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod provider;

pub use api::{router, AppState};
pub use config::{EnrichmentConfig, ProviderKind};
pub use enricher::{Enricher, RequestContext};
pub use error::{EnrichmentError, Result};
pub use extract::{extract_json_object, Extraction, JsonObject};
pub use provider::{Generation, JsonGenerator, Provider};
