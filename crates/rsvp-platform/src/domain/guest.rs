//! Guest Entity
//!
//! A wedding guest record together with its RSVP capability token.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// RSVP status of a guest.
///
/// The three well-known values are modelled explicitly. Any other value a
/// client submits is preserved verbatim in `Other` so existing clients that
/// send free-form statuses keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RsvpStatus {
    Pending,
    Attending,
    NotAttending,
    Other(String),
}

impl RsvpStatus {
    pub const PENDING: &'static str = "Pending";
    pub const ATTENDING: &'static str = "Attending";
    pub const NOT_ATTENDING: &'static str = "Not Attending";

    /// Exact match, no case folding or trimming.
    pub fn parse(value: &str) -> Self {
        match value {
            Self::PENDING => Self::Pending,
            Self::ATTENDING => Self::Attending,
            Self::NOT_ATTENDING => Self::NotAttending,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => Self::PENDING,
            Self::Attending => Self::ATTENDING,
            Self::NotAttending => Self::NOT_ATTENDING,
            Self::Other(value) => value,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Default for RsvpStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl From<String> for RsvpStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::PENDING => Self::Pending,
            Self::ATTENDING => Self::Attending,
            Self::NOT_ATTENDING => Self::NotAttending,
            _ => Self::Other(value),
        }
    }
}

impl From<RsvpStatus> for String {
    fn from(status: RsvpStatus) -> Self {
        match status {
            RsvpStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guest record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    /// Immutable primary key
    pub id: Uuid,

    pub name: String,

    pub email: String,

    /// Which family the guest belongs to (e.g. "Bride", "Groom")
    pub family_side: String,

    /// Monetary gift amount, admin-maintained
    pub hongbao: f64,

    /// Party size
    pub total_guests: i32,

    pub rsvp_status: RsvpStatus,

    /// Bearer capability for the public RSVP surface. Never reassigned.
    pub rsvp_token: String,
}

impl Guest {
    /// Mint a new guest with a fresh id and RSVP token.
    ///
    /// Performs no validation; callers go through `GuestService`.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        family_side: impl Into<String>,
        total_guests: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            family_side: family_side.into(),
            hongbao: 0.0,
            total_guests,
            rsvp_status: RsvpStatus::Pending,
            rsvp_token: generate_rsvp_token(),
        }
    }
}

/// 122 random bits from a v4 UUID, rendered in hyphenated form.
pub fn generate_rsvp_token() -> String {
    Uuid::new_v4().to_string()
}

/// Admin update of an existing guest.
///
/// Empty strings mean "leave unchanged". `hongbao` and `total_guests` are
/// always written, zero included.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestUpdate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub family_side: String,
    pub hongbao: f64,
    pub total_guests: i32,
    pub rsvp_status: String,
}

impl GuestUpdate {
    /// Merge this update over the stored record. `id` and `rsvp_token` always
    /// come from `current`.
    pub fn merge_into(&self, current: &Guest) -> Guest {
        Guest {
            id: current.id,
            name: pick(&self.name, &current.name),
            email: pick(&self.email, &current.email),
            family_side: pick(&self.family_side, &current.family_side),
            hongbao: self.hongbao,
            total_guests: self.total_guests,
            rsvp_status: if self.rsvp_status.is_empty() {
                current.rsvp_status.clone()
            } else {
                RsvpStatus::parse(&self.rsvp_status)
            },
            rsvp_token: current.rsvp_token.clone(),
        }
    }
}

fn pick(update: &str, current: &str) -> String {
    if update.is_empty() {
        current.to_string()
    } else {
        update.to_string()
    }
}
