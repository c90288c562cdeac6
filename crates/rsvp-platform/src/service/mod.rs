//! Service Layer
//!
//! Guest management, admin access control and invitation delivery.

pub mod access;
pub mod guest;
pub mod invitation;

pub use access::{extract_bearer_token, AccessBoundary, HttpTokenVerifier, TokenVerifier};
pub use guest::GuestService;
pub use invitation::{
    Invitation, InvitationQueue, InvitationSender, MailError, SmtpInvitationSender,
};
