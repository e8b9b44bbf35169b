use std::sync::Arc;

use crate::enrichment_client::EnrichmentApi;
use crate::store::UserRepository;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn UserRepository>,
    pub enrichment: Arc<dyn EnrichmentApi>,
}

impl AppState {
    pub fn new(repo: Arc<dyn UserRepository>, enrichment: Arc<dyn EnrichmentApi>) -> Self {
        Self { repo, enrichment }
    }
}
