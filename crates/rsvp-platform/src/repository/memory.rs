//! In-memory Guest Repository
//!
//! Used when no database URL is configured and by the test suites.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use crate::domain::{Guest, GuestUpdate, RsvpStatus};
use crate::error::{PlatformError, Result};
use crate::repository::GuestRepository;

#[derive(Default)]
pub struct InMemoryGuestRepository {
    guests: RwLock<HashMap<Uuid, Guest>>,
    calls: AtomicUsize,
}

impl InMemoryGuestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repository operations served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.guests.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guests.read().is_empty()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn find_where<F>(&self, predicate: F) -> Option<Guest>
    where
        F: Fn(&Guest) -> bool,
    {
        self.guests.read().values().find(|g| predicate(g)).cloned()
    }
}

#[async_trait]
impl GuestRepository for InMemoryGuestRepository {
    async fn insert(&self, guest: &Guest) -> Result<()> {
        self.record_call();
        let mut guests = self.guests.write();
        if guests.contains_key(&guest.id) {
            return Err(PlatformError::duplicate("Guest", "id", guest.id.to_string()));
        }
        if guests.values().any(|g| g.rsvp_token == guest.rsvp_token) {
            return Err(PlatformError::duplicate("Guest", "rsvp_token", &guest.rsvp_token));
        }
        guests.insert(guest.id, guest.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Guest>> {
        self.record_call();
        Ok(self.guests.read().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Guest>> {
        self.record_call();
        Ok(self.find_where(|g| g.email == email))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Guest>> {
        self.record_call();
        Ok(self.find_where(|g| g.rsvp_token == token))
    }

    async fn find_all(&self) -> Result<Vec<Guest>> {
        self.record_call();
        Ok(self.guests.read().values().cloned().collect())
    }

    async fn find_by_status(&self, status: &str) -> Result<Vec<Guest>> {
        self.record_call();
        Ok(self
            .guests
            .read()
            .values()
            .filter(|g| g.rsvp_status.as_str() == status)
            .cloned()
            .collect())
    }

    async fn update_partial(&self, update: &GuestUpdate) -> Result<Option<Guest>> {
        self.record_call();
        let mut guests = self.guests.write();
        Ok(guests.get_mut(&update.id).map(|stored| {
            *stored = update.merge_into(stored);
            stored.clone()
        }))
    }

    async fn update_rsvp(&self, token: &str, status: &RsvpStatus, total_guests: i32) -> Result<Option<Guest>> {
        self.record_call();
        let mut guests = self.guests.write();
        Ok(guests
            .values_mut()
            .find(|g| g.rsvp_token == token)
            .map(|stored| {
                stored.rsvp_status = status.clone();
                stored.total_guests = total_guests;
                stored.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.record_call();
        Ok(self.guests.write().remove(&id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_lookups() {
        let repo = InMemoryGuestRepository::new();
        let guest = Guest::new("Jane", "jane@x.com", "Bride", 2);
        repo.insert(&guest).await.unwrap();

        assert_eq!(repo.find_by_id(guest.id).await.unwrap(), Some(guest.clone()));
        assert_eq!(repo.find_by_email("jane@x.com").await.unwrap(), Some(guest.clone()));
        assert_eq!(repo.find_by_token(&guest.rsvp_token).await.unwrap(), Some(guest.clone()));
        assert!(repo.find_by_email("nobody@x.com").await.unwrap().is_none());
        assert_eq!(repo.call_count(), 5);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let repo = InMemoryGuestRepository::new();
        let guest = Guest::new("Jane", "jane@x.com", "Bride", 2);
        repo.insert(&guest).await.unwrap();
        assert!(matches!(
            repo.insert(&guest).await,
            Err(PlatformError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_rsvp_touches_only_status_and_party_size() {
        let repo = InMemoryGuestRepository::new();
        let mut guest = Guest::new("Jane", "jane@x.com", "Bride", 2);
        guest.hongbao = 66.0;
        repo.insert(&guest).await.unwrap();

        let updated = repo
            .update_rsvp(&guest.rsvp_token, &RsvpStatus::Attending, 3)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.rsvp_status, RsvpStatus::Attending);
        assert_eq!(updated.total_guests, 3);
        assert_eq!(updated.name, guest.name);
        assert_eq!(updated.email, guest.email);
        assert_eq!(updated.hongbao, 66.0);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_an_error() {
        let repo = InMemoryGuestRepository::new();
        assert!(!repo.delete(Uuid::new_v4()).await.unwrap());
    }
}
