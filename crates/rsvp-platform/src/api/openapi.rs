//! OpenAPI Documentation

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// RSVP API OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wedding RSVP API",
        version = "1.0.0",
        description = "Guest management and RSVP submission"
    ),
    servers(
        (url = "http://localhost:8081", description = "Local development")
    ),
    tags(
        (name = "guests", description = "Guest management (admin)"),
        (name = "rsvp", description = "Public RSVP submission"),
        (name = "monitoring", description = "Health checks"),
    ),
    paths(
        crate::api::guests::list_guests,
        crate::api::guests::create_guest,
        crate::api::guests::send_invite,
        crate::api::guests::get_guest,
        crate::api::guests::get_guest_by_email,
        crate::api::guests::get_guest_by_token,
        crate::api::guests::update_guest,
        crate::api::guests::delete_guest,
        crate::api::guests::register_guest,
        crate::api::rsvp::submit_rsvp,
        crate::api::rsvp::get_rsvp,
        crate::api::health::status,
    ),
    components(schemas(
        crate::api::common::ApiError,
        crate::api::common::MessageResponse,
        crate::api::guests::GuestResponse,
        crate::api::guests::CreateGuestRequest,
        crate::api::guests::UpdateGuestRequest,
        crate::api::rsvp::RsvpRequest,
        crate::api::health::StatusResponse,
    )),
    modifiers(&BearerAuth)
)]
pub struct RsvpApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
