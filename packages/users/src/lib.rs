//! UserInsight users service
//!
//! File-backed user records with CRUD, an aggregate insights view and an
//! analyze workflow that enriches a record through the enrichment service.

pub mod analyze;
pub mod config;
pub mod enrichment_client;
pub mod error;
pub mod handlers;
pub mod insights;
pub mod models;
pub mod state;
pub mod store;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use userinsight_shared::propagate_correlation_id;

pub use config::UsersConfig;
pub use enrichment_client::{EnrichmentApi, HttpEnrichmentClient};
pub use error::{Result, UsersError};
pub use models::{AnalysisReport, AnalysisUpdate, User, UserInput, UsersOverview};
pub use state::AppState;
pub use store::{FileUserRepository, UserRepository};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/health/live", get(handlers::live))
        .route("/health/ready", get(handlers::ready))
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/api/users/insights", get(handlers::users_insights))
        .route(
            "/api/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/api/users/{id}/analyze", post(handlers::analyze))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(propagate_correlation_id))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
