//! Domain Models
//!
//! The guest record is the only entity. Ids are v4 UUIDs; RSVP tokens are
//! independent v4 UUID strings.

pub mod guest;

pub use guest::*;
