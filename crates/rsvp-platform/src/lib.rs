//! Wedding RSVP Platform
//!
//! Core platform providing:
//! - Guest records with per-guest RSVP capability tokens
//! - Public RSVP submission by token
//! - Bearer-gated admin guest management
//! - SMTP invitation delivery, detached or synchronous

pub mod api;
pub mod domain;
pub mod error;
pub mod repository;
pub mod service;

pub use domain::*;
pub use error::PlatformError;
