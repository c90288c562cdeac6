//! Guest Service
//!
//! Validation and orchestration for guest management and the RSVP token
//! protocol. Holds no locks; all serialization is left to the store.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{Guest, GuestUpdate, RsvpStatus};
use crate::error::{PlatformError, Result};
use crate::repository::GuestRepository;
use crate::service::invitation::{Invitation, InvitationQueue, InvitationSender};

const INVALID_NEW_GUEST: &str =
    "invalid input: all fields must be provided and total guests must be greater than zero";

#[derive(Clone)]
pub struct GuestService {
    repo: Arc<dyn GuestRepository>,
    mailer: Arc<dyn InvitationSender>,
    queue: InvitationQueue,
}

impl GuestService {
    pub fn new(
        repo: Arc<dyn GuestRepository>,
        mailer: Arc<dyn InvitationSender>,
        queue: InvitationQueue,
    ) -> Self {
        Self { repo, mailer, queue }
    }

    pub fn repository(&self) -> &Arc<dyn GuestRepository> {
        &self.repo
    }

    /// Persist a new guest and schedule the invitation email.
    ///
    /// The email goes through the detached queue: its outcome never reaches
    /// the caller.
    pub async fn add_guest(&self, name: &str, email: &str, family_side: &str, total_guests: i32) -> Result<Guest> {
        validate_new_guest(name, email, family_side, total_guests)?;

        let guest = self.create_guest(name, email, family_side, total_guests).await?;
        if !self.queue.enqueue(Invitation::for_guest(&guest)) {
            warn!(guest_id = %guest.id, "Guest added but invitation could not be scheduled");
        }
        Ok(guest)
    }

    /// Create a guest and send the invitation synchronously.
    ///
    /// Fails with `Duplicate` when the email is already registered. If the
    /// send fails the guest stays persisted and `InvitationFailed` is
    /// returned.
    pub async fn send_invite(&self, name: &str, email: &str, family_side: &str, total_guests: i32) -> Result<Guest> {
        validate_new_guest(name, email, family_side, total_guests)?;

        // Check-then-insert is not atomic and email carries no unique index:
        // concurrent invites for one address can both pass and store two rows.
        if self.repo.find_by_email(email).await?.is_some() {
            return Err(PlatformError::duplicate("Guest", "email", email));
        }

        let guest = self.create_guest(name, email, family_side, total_guests).await?;

        self.mailer
            .send(&Invitation::for_guest(&guest))
            .await
            .map_err(|e| {
                warn!(guest_id = %guest.id, error = %e, "Invitation send failed");
                PlatformError::invitation_failed(guest.id.to_string(), e.to_string())
            })?;

        Ok(guest)
    }

    /// Callers validate first.
    async fn create_guest(&self, name: &str, email: &str, family_side: &str, total_guests: i32) -> Result<Guest> {
        let guest = Guest::new(name, email, family_side, total_guests);
        self.repo.insert(&guest).await?;

        info!(guest_id = %guest.id, email = %guest.email, "Guest added");
        Ok(guest)
    }

    pub async fn get_all_guests(&self) -> Result<Vec<Guest>> {
        self.repo.find_all().await
    }

    pub async fn get_guest_by_id(&self, id: Uuid) -> Result<Guest> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Guest", "id", id.to_string()))
    }

    pub async fn get_guest_by_email(&self, email: &str) -> Result<Guest> {
        self.repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| PlatformError::not_found("Guest", "email", email))
    }

    pub async fn get_guest_by_token(&self, token: &str) -> Result<Guest> {
        self.repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| PlatformError::not_found("Guest", "rsvp_token", token))
    }

    /// Exact match on the stored status string.
    pub async fn get_guests_by_rsvp(&self, status: &str) -> Result<Vec<Guest>> {
        self.repo.find_by_status(status).await
    }

    pub async fn update_guest(&self, update: GuestUpdate) -> Result<Guest> {
        if update.id.is_nil() {
            return Err(PlatformError::validation("invalid guest ID"));
        }

        let guest = self
            .repo
            .update_partial(&update)
            .await?
            .ok_or_else(|| PlatformError::not_found("Guest", "id", update.id.to_string()))?;

        info!(guest_id = %guest.id, "Guest updated");
        Ok(guest)
    }

    /// Succeeds whether or not the guest existed.
    pub async fn delete_guest(&self, id: Uuid) -> Result<()> {
        if self.repo.delete(id).await? {
            info!(guest_id = %id, "Guest deleted");
        } else {
            debug!(guest_id = %id, "Delete of unknown guest");
        }
        Ok(())
    }

    /// Record an RSVP for the guest owning `token`.
    ///
    /// Only status and party size change. Any status string is accepted.
    pub async fn submit_rsvp(&self, token: &str, status: &str, total_guests: i32) -> Result<Guest> {
        if token.is_empty() || status.is_empty() {
            return Err(PlatformError::validation("rsvp_token and rsvp_status are required"));
        }
        if total_guests < 0 {
            return Err(PlatformError::validation("total_guests must not be negative"));
        }

        let status = RsvpStatus::parse(status);
        if !status.is_known() {
            debug!(status = %status, "RSVP submitted with non-standard status");
        }

        let guest = self
            .repo
            .update_rsvp(token, &status, total_guests)
            .await?
            .ok_or(PlatformError::InvalidToken)?;

        info!(guest_id = %guest.id, status = %guest.rsvp_status, "RSVP recorded");
        Ok(guest)
    }
}

fn validate_new_guest(name: &str, email: &str, family_side: &str, total_guests: i32) -> Result<()> {
    if name.is_empty() || email.is_empty() || family_side.is_empty() || total_guests <= 0 {
        return Err(PlatformError::validation(INVALID_NEW_GUEST));
    }
    if email.parse::<lettre::Address>().is_err() {
        return Err(PlatformError::validation(format!("invalid email address: {}", email)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_new_guest() {
        assert!(validate_new_guest("Jane", "jane@x.com", "Bride", 2).is_ok());
        assert!(validate_new_guest("", "jane@x.com", "Bride", 2).is_err());
        assert!(validate_new_guest("Jane", "", "Bride", 2).is_err());
        assert!(validate_new_guest("Jane", "jane@x.com", "", 2).is_err());
        assert!(validate_new_guest("Jane", "jane@x.com", "Bride", 0).is_err());
        assert!(validate_new_guest("Jane", "jane@x.com", "Bride", -1).is_err());
        assert!(matches!(
            validate_new_guest("Jane", "not-an-email", "Bride", 2),
            Err(PlatformError::Validation { .. })
        ));
    }
}
