//! Platform Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Entity not found: {entity_type} with {field}={value}")]
    NotFound { entity_type: String, field: String, value: String },

    #[error("Invalid RSVP token")]
    InvalidToken,

    #[error("Duplicate entity: {entity_type} with {field}={value}")]
    Duplicate { entity_type: String, field: String, value: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authorization error: {message}")]
    Unauthorized { message: String },

    #[error("Upstream error from {service}: {message}")]
    Upstream { service: String, message: String },

    /// The guest was persisted but the invitation could not be delivered.
    #[error("Guest {guest_id} created but invitation not sent: {message}")]
    InvitationFailed { guest_id: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlatformError {
    pub fn not_found(entity_type: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn duplicate(entity_type: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    /// A deadline on an outbound call elapsed.
    pub fn timeout(service: impl Into<String>) -> Self {
        Self::upstream(service, "request timed out")
    }

    pub fn invitation_failed(guest_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvitationFailed {
            guest_id: guest_id.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

impl From<sqlx::Error> for PlatformError {
    fn from(err: sqlx::Error) -> Self {
        Self::upstream("guest store", err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
