//! Public RSVP API
//!
//! The RSVP token in the request is the only credential on these routes.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::common::{ApiError, ApiJson};
use crate::api::guests::GuestResponse;
use crate::error::PlatformError;
use crate::service::GuestService;

/// RSVP submission
#[derive(Debug, Deserialize, ToSchema)]
pub struct RsvpRequest {
    pub rsvp_token: String,
    pub rsvp_status: String,
    pub total_guests: i32,
}

/// Submit an RSVP
#[utoipa::path(
    post,
    path = "/rsvp",
    tag = "rsvp",
    request_body = RsvpRequest,
    responses(
        (status = 200, description = "RSVP recorded", body = GuestResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 404, description = "Unknown RSVP token", body = ApiError)
    )
)]
pub async fn submit_rsvp(
    State(service): State<GuestService>,
    ApiJson(req): ApiJson<RsvpRequest>,
) -> Result<Json<GuestResponse>, PlatformError> {
    let guest = service
        .submit_rsvp(&req.rsvp_token, &req.rsvp_status, req.total_guests)
        .await?;
    Ok(Json(guest.into()))
}

/// Look up the invitation behind an RSVP token
#[utoipa::path(
    get,
    path = "/rsvp/{token}",
    tag = "rsvp",
    params(("token" = String, Path, description = "RSVP token")),
    responses(
        (status = 200, description = "Guest found", body = GuestResponse),
        (status = 404, description = "Unknown RSVP token", body = ApiError)
    )
)]
pub async fn get_rsvp(
    State(service): State<GuestService>,
    Path(token): Path<String>,
) -> Result<Json<GuestResponse>, PlatformError> {
    Ok(Json(service.get_guest_by_token(&token).await?.into()))
}

pub fn rsvp_router(service: GuestService) -> Router {
    Router::new()
        .route("/rsvp", post(submit_rsvp))
        .route("/rsvp/", post(submit_rsvp))
        .route("/rsvp/:token", get(get_rsvp))
        .with_state(service)
}
