//! Status endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::PlatformError;
use crate::repository::GuestRepository;
use crate::service::TokenVerifier;

#[derive(Clone)]
pub struct HealthState {
    pub repo: Arc<dyn GuestRepository>,
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Dependency report. Each field is "OK" or "ERROR: <reason>".
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub server: String,
    pub database: String,
    pub authentication_service: String,
}

fn describe(result: Result<(), PlatformError>) -> String {
    match result {
        Ok(()) => "OK".to_string(),
        Err(e) => format!("ERROR: {}", e),
    }
}

/// Report server, database and authentication service health
#[utoipa::path(
    get,
    path = "/status",
    tag = "monitoring",
    responses(
        (status = 200, description = "Health report", body = StatusResponse)
    )
)]
pub async fn status(State(state): State<HealthState>) -> Json<StatusResponse> {
    let (database, auth) = tokio::join!(state.repo.ping(), state.verifier.probe());

    Json(StatusResponse {
        server: "OK".to_string(),
        database: describe(database),
        authentication_service: describe(auth),
    })
}

pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/status", get(status))
        .with_state(state)
}
