//! Repository Layer
//!
//! Persistence contract for guest records plus the Postgres and in-memory
//! implementations.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Guest, GuestUpdate, RsvpStatus};
use crate::error::Result;

pub use memory::InMemoryGuestRepository;
pub use postgres::PgGuestRepository;

#[async_trait]
pub trait GuestRepository: Send + Sync {
    async fn insert(&self, guest: &Guest) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Guest>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Guest>>;

    async fn find_by_token(&self, token: &str) -> Result<Option<Guest>>;

    async fn find_all(&self) -> Result<Vec<Guest>>;

    async fn find_by_status(&self, status: &str) -> Result<Vec<Guest>>;

    /// Merge `update` over the stored record in one atomic step and return the
    /// result. `None` when no guest has that id.
    async fn update_partial(&self, update: &GuestUpdate) -> Result<Option<Guest>>;

    /// Set status and party size for the guest owning `token`. Nothing else
    /// is touched. `None` when no guest owns the token.
    async fn update_rsvp(&self, token: &str, status: &RsvpStatus, total_guests: i32) -> Result<Option<Guest>>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}
