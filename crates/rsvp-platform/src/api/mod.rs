//! API Layer
//!
//! Public RSVP endpoints, bearer-gated admin endpoints and the status probe.

pub mod common;
pub mod guests;
pub mod health;
pub mod middleware;
pub mod openapi;
pub mod rsvp;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use rsvp_config::ApiConfig;

use crate::service::{AccessBoundary, GuestService};

pub use common::{parse_guest_id, ApiError, ApiJson, MessageResponse};
pub use guests::{guests_router, legacy_guests_router, GuestResponse};
pub use health::{health_router, HealthState, StatusResponse};
pub use middleware::require_admin;
pub use openapi::RsvpApiDoc;
pub use rsvp::rsvp_router;

/// Shared services behind every route
#[derive(Clone)]
pub struct ApiState {
    pub guests: GuestService,
    pub boundary: AccessBoundary,
}

/// Assemble the full HTTP surface.
pub fn create_router(state: ApiState, config: &ApiConfig) -> Router {
    let health = HealthState {
        repo: state.guests.repository().clone(),
        verifier: state.boundary.verifier().clone(),
    };

    let admin = guests_router(state.guests.clone()).layer(axum::middleware::from_fn_with_state(
        state.boundary.clone(),
        require_admin,
    ));

    let mut app = Router::new()
        .merge(health_router(health))
        .merge(rsvp_router(state.guests.clone()))
        .nest("/admin/guests", admin);

    if config.public_guest_registration {
        info!("Unauthenticated guest registration enabled at /guests");
        app = app.merge(legacy_guests_router(state.guests));
    }

    app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", RsvpApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
}
