//! Guest Admin API
//!
//! REST endpoints for guest management. Every route here sits behind
//! `require_admin`.
//! Base path: /admin/guests

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::common::{parse_guest_id, ApiError, ApiJson, MessageResponse};
use crate::domain::{Guest, GuestUpdate};
use crate::error::PlatformError;
use crate::service::GuestService;

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Guest as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GuestResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub family_side: String,
    pub hongbao: f64,
    pub total_guests: i32,
    /// "Pending", "Attending", "Not Attending" or a client-supplied value
    pub rsvp_status: String,
    pub rsvp_token: String,
}

impl From<Guest> for GuestResponse {
    fn from(g: Guest) -> Self {
        Self {
            id: g.id.to_string(),
            name: g.name,
            email: g.email,
            family_side: g.family_side,
            hongbao: g.hongbao,
            total_guests: g.total_guests,
            rsvp_status: g.rsvp_status.into(),
            rsvp_token: g.rsvp_token,
        }
    }
}

/// Create guest / send invite request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGuestRequest {
    pub name: String,
    pub email: String,
    pub family_side: String,
    /// Party size, must be greater than zero
    pub total_guests: i32,
}

/// Partial guest update. Empty strings leave the stored value unchanged;
/// `hongbao` and `total_guests` are always applied.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateGuestRequest {
    pub name: String,
    pub email: String,
    pub family_side: String,
    pub hongbao: f64,
    pub total_guests: i32,
    pub rsvp_status: String,
}

impl UpdateGuestRequest {
    fn into_update(self, id: uuid::Uuid) -> GuestUpdate {
        GuestUpdate {
            id,
            name: self.name,
            email: self.email,
            family_side: self.family_side,
            hongbao: self.hongbao,
            total_guests: self.total_guests,
            rsvp_status: self.rsvp_status,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListGuestsQuery {
    /// Exact-match filter on RSVP status
    pub rsvp_status: Option<String>,
}

fn to_responses(guests: Vec<Guest>) -> Vec<GuestResponse> {
    guests.into_iter().map(GuestResponse::from).collect()
}

// ============================================================================
// Handlers
// ============================================================================

/// List guests, optionally filtered by RSVP status
#[utoipa::path(
    get,
    path = "/admin/guests",
    tag = "guests",
    params(ListGuestsQuery),
    responses(
        (status = 200, description = "List of guests", body = Vec<GuestResponse>),
        (status = 401, description = "Missing or invalid credential", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_guests(
    State(service): State<GuestService>,
    Query(query): Query<ListGuestsQuery>,
) -> Result<Json<Vec<GuestResponse>>, PlatformError> {
    let guests = match query.rsvp_status {
        Some(status) => service.get_guests_by_rsvp(&status).await?,
        None => service.get_all_guests().await?,
    };
    Ok(Json(to_responses(guests)))
}

/// Add a guest and schedule their invitation
#[utoipa::path(
    post,
    path = "/admin/guests",
    tag = "guests",
    request_body = CreateGuestRequest,
    responses(
        (status = 201, description = "Guest created", body = GuestResponse),
        (status = 400, description = "Invalid input", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_guest(
    State(service): State<GuestService>,
    ApiJson(req): ApiJson<CreateGuestRequest>,
) -> Result<(StatusCode, Json<GuestResponse>), PlatformError> {
    let guest = service
        .add_guest(&req.name, &req.email, &req.family_side, req.total_guests)
        .await?;
    Ok((StatusCode::CREATED, Json(guest.into())))
}

/// Add a guest and send the invitation before responding
#[utoipa::path(
    post,
    path = "/admin/guests/invite",
    tag = "guests",
    request_body = CreateGuestRequest,
    responses(
        (status = 200, description = "Guest created and invitation sent", body = GuestResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError),
        (status = 500, description = "Guest created but invitation failed", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn send_invite(
    State(service): State<GuestService>,
    ApiJson(req): ApiJson<CreateGuestRequest>,
) -> Result<Json<GuestResponse>, PlatformError> {
    let guest = service
        .send_invite(&req.name, &req.email, &req.family_side, req.total_guests)
        .await?;
    Ok(Json(guest.into()))
}

/// Get guest by ID
#[utoipa::path(
    get,
    path = "/admin/guests/{id}",
    tag = "guests",
    params(("id" = String, Path, description = "Guest ID (UUID)")),
    responses(
        (status = 200, description = "Guest found", body = GuestResponse),
        (status = 400, description = "Invalid guest ID", body = ApiError),
        (status = 404, description = "Guest not found", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_guest(
    State(service): State<GuestService>,
    Path(id): Path<String>,
) -> Result<Json<GuestResponse>, PlatformError> {
    let id = parse_guest_id(&id)?;
    Ok(Json(service.get_guest_by_id(id).await?.into()))
}

/// Get guest by email
#[utoipa::path(
    get,
    path = "/admin/guests/email/{email}",
    tag = "guests",
    params(("email" = String, Path, description = "Guest email")),
    responses(
        (status = 200, description = "Guest found", body = GuestResponse),
        (status = 404, description = "Guest not found", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_guest_by_email(
    State(service): State<GuestService>,
    Path(email): Path<String>,
) -> Result<Json<GuestResponse>, PlatformError> {
    Ok(Json(service.get_guest_by_email(&email).await?.into()))
}

/// Get guest by RSVP token
#[utoipa::path(
    get,
    path = "/admin/guests/rsvp/{token}",
    tag = "guests",
    params(("token" = String, Path, description = "RSVP token")),
    responses(
        (status = 200, description = "Guest found", body = GuestResponse),
        (status = 404, description = "Guest not found", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_guest_by_token(
    State(service): State<GuestService>,
    Path(token): Path<String>,
) -> Result<Json<GuestResponse>, PlatformError> {
    Ok(Json(service.get_guest_by_token(&token).await?.into()))
}

/// Update guest
#[utoipa::path(
    put,
    path = "/admin/guests/{id}",
    tag = "guests",
    params(("id" = String, Path, description = "Guest ID (UUID)")),
    request_body = UpdateGuestRequest,
    responses(
        (status = 200, description = "Guest updated", body = MessageResponse),
        (status = 400, description = "Invalid guest ID or body", body = ApiError),
        (status = 404, description = "Guest not found", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_guest(
    State(service): State<GuestService>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateGuestRequest>,
) -> Result<Json<MessageResponse>, PlatformError> {
    let id = parse_guest_id(&id)?;
    service.update_guest(req.into_update(id)).await?;
    Ok(Json(MessageResponse::new("guest updated successfully")))
}

/// Delete guest
#[utoipa::path(
    delete,
    path = "/admin/guests/{id}",
    tag = "guests",
    params(("id" = String, Path, description = "Guest ID (UUID)")),
    responses(
        (status = 200, description = "Guest deleted", body = MessageResponse),
        (status = 400, description = "Invalid guest ID", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_guest(
    State(service): State<GuestService>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, PlatformError> {
    let id = parse_guest_id(&id)?;
    service.delete_guest(id).await?;
    Ok(Json(MessageResponse::new("guest deleted successfully")))
}

/// Unauthenticated guest registration kept for older clients
#[utoipa::path(
    post,
    path = "/guests",
    tag = "guests",
    request_body = CreateGuestRequest,
    responses(
        (status = 201, description = "Guest created", body = GuestResponse),
        (status = 400, description = "Invalid input", body = ApiError)
    )
)]
pub async fn register_guest(
    state: State<GuestService>,
    body: ApiJson<CreateGuestRequest>,
) -> Result<(StatusCode, Json<GuestResponse>), PlatformError> {
    create_guest(state, body).await
}

/// Admin guest routes; the caller layers `require_admin` on top.
pub fn guests_router(service: GuestService) -> Router {
    Router::new()
        .route("/", get(list_guests).post(create_guest))
        .route("/invite", post(send_invite))
        .route("/:id", get(get_guest).put(update_guest).delete(delete_guest))
        .route("/email/:email", get(get_guest_by_email))
        .route("/rsvp/:token", get(get_guest_by_token))
        .with_state(service)
}

pub fn legacy_guests_router(service: GuestService) -> Router {
    Router::new()
        .route("/guests", post(register_guest))
        .route("/guests/", post(register_guest))
        .with_state(service)
}
