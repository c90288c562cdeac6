//! API Middleware
//!
//! Bearer-credential gate for the admin routes.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::PlatformError;
use crate::service::access::MALFORMED_HEADER;
use crate::service::AccessBoundary;

/// Reject the request before it reaches any handler unless the
/// authentication service verifies its bearer token.
pub async fn require_admin(
    State(boundary): State<AccessBoundary>,
    request: Request,
    next: Next,
) -> Response {
    let authorization = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(value) => Some(value),
            // Present but not visible ASCII
            Err(_) => return PlatformError::unauthorized(MALFORMED_HEADER).into_response(),
        },
    };

    match boundary.authorize(authorization).await {
        Ok(()) => {
            debug!(path = %request.uri().path(), "Admin request verified");
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
