use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::json;
use userinsight_shared::CorrelationId;
use uuid::Uuid;

use crate::analyze::analyze_user;
use crate::error::{Result, UsersError};
use crate::insights::summarize;
use crate::models::{AnalysisReport, User, UserInput, UsersOverview};
use crate::state::AppState;

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.repo.get_all().await?))
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<User>> {
    let user = state
        .repo
        .get_by_id(id)
        .await?
        .ok_or(UsersError::NotFound(id))?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> Result<Response> {
    let user = User::new(input)?;
    state.repo.add(user.clone()).await?;
    tracing::info!(user_id = %user.id, "user created");

    let location = format!("/api/users/{}", user.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(user)).into_response())
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UserInput>,
) -> Result<Json<User>> {
    let user = state.repo.edit(id, input).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(correlation_id): Extension<CorrelationId>,
) -> Result<Json<AnalysisReport>> {
    let report = analyze_user(
        state.repo.as_ref(),
        state.enrichment.as_ref(),
        id,
        &correlation_id,
    )
    .await?;
    Ok(Json(report))
}

pub async fn users_insights(State(state): State<AppState>) -> Result<Json<UsersOverview>> {
    let users = state.repo.get_all().await?;
    Ok(Json(summarize(&users)))
}

pub async fn health(
    State(state): State<AppState>,
    Extension(correlation_id): Extension<CorrelationId>,
) -> Response {
    match state.enrichment.health(&correlation_id).await {
        Ok(_) => Json(json!({ "status": "ok", "ai": "reachable" })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "enrichment service unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "ai": "unreachable" })),
            )
                .into_response()
        }
    }
}

pub async fn live() -> Json<serde_json::Value> {
    Json(json!({ "status": "live" }))
}

pub async fn ready(
    State(state): State<AppState>,
    Extension(correlation_id): Extension<CorrelationId>,
) -> Response {
    if let Err(e) = state.repo.get_all().await {
        tracing::warn!(error = %e, "user store not readable");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    if let Err(e) = state.enrichment.health(&correlation_id).await {
        tracing::warn!(error = %e, "enrichment service unreachable");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(json!({ "status": "ready" })).into_response()
}
