//! Common API types and utilities

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::PlatformError;

/// Standard API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Plain confirmation body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl PlatformError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::InvalidToken => StatusCode::NOT_FOUND,
            Self::Duplicate { .. } => StatusCode::CONFLICT,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Upstream { .. }
            | Self::InvitationFailed { .. }
            | Self::Configuration { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Duplicate { .. } => "CONFLICT",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::InvitationFailed { .. } => "INVITATION_FAILED",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let (message, details) = match &self {
            Self::Unauthorized { message } | Self::Validation { message } => (message.clone(), None),
            Self::InvitationFailed { guest_id, .. } => {
                (self.to_string(), Some(serde_json::json!({ "guest_id": guest_id })))
            }
            _ => (self.to_string(), None),
        };

        let body = ApiError {
            error: self.error_code().to_string(),
            message,
            details,
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer realm=\"RSVP\""),
            );
        }
        response
    }
}

impl From<JsonRejection> for PlatformError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

/// JSON body extractor whose rejections render as `ApiError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(PlatformError))]
pub struct ApiJson<T>(pub T);

/// Guest ids in paths must be UUIDs.
pub fn parse_guest_id(raw: &str) -> Result<Uuid, PlatformError> {
    Uuid::parse_str(raw).map_err(|_| PlatformError::validation("invalid guest ID"))
}
