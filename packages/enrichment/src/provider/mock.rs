use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::extract::JsonObject;
use crate::provider::{Generation, JsonGenerator};

/// Backend used when generation is disabled. Every call answers with the
/// fallback object and no error.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGenerator;

#[async_trait]
impl JsonGenerator for MockGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        fallback: &JsonObject,
        _cancel: &CancellationToken,
    ) -> Generation {
        Generation::fallback(fallback)
    }
}
