//! UserInsight shared types
//!
//! Canonical types used by both services:
//! - The HTTP+JSON wire protocol of the enrichment service ([`wire`])
//! - Correlation identifiers and the middleware that propagates them ([`correlation`])
//! - Process lifecycle helpers ([`lifecycle`])

pub mod correlation;
pub mod lifecycle;
pub mod wire;

pub use correlation::{propagate_correlation_id, CorrelationId, CORRELATION_ID_HEADER};
pub use lifecycle::shutdown_signal;
pub use wire::{
    DependencyStatus, ErrorBody, HealthResponse, InsightsRequest, InsightsResponse,
    SentimentResponse, TagsResponse, TextRequest,
};
