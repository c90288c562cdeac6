//! Invitation Delivery
//!
//! SMTP delivery of RSVP invitations, plus a detached queue for the
//! fire-and-forget path taken when a guest is added.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use rsvp_config::SmtpConfig;

use crate::domain::Guest;

pub const INVITATION_SUBJECT: &str = "You're Invited to Our Wedding!";

#[derive(Error, Debug)]
pub enum MailError {
    #[error("SMTP configuration is missing")]
    NotConfigured,

    #[error("Invalid mailbox: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Everything needed to invite one guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub guest_id: Uuid,
    pub name: String,
    pub email: String,
    pub rsvp_token: String,
}

impl Invitation {
    pub fn for_guest(guest: &Guest) -> Self {
        Self {
            guest_id: guest.id,
            name: guest.name.clone(),
            email: guest.email.clone(),
            rsvp_token: guest.rsvp_token.clone(),
        }
    }

    pub fn rsvp_link(&self, base: &str) -> String {
        format!("{}?token={}", base, self.rsvp_token)
    }

    pub fn render_body(&self, link_base: &str) -> String {
        format!(
            "Dear {},\n\n\
             You are invited to our wedding!\n\n\
             Please click the link below to RSVP:\n{}\n\n\
             We look forward to celebrating with you!\n\n\
             Best regards,\nThe Wedding Team",
            self.name,
            self.rsvp_link(link_base),
        )
    }
}

#[async_trait]
pub trait InvitationSender: Send + Sync {
    async fn send(&self, invitation: &Invitation) -> Result<(), MailError>;
}

/// STARTTLS SMTP sender
pub struct SmtpInvitationSender {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
    link_base: String,
}

impl SmtpInvitationSender {
    /// Without credentials the sender is created but every send fails with
    /// [`MailError::NotConfigured`].
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        if !config.has_credentials() {
            warn!("SMTP credentials not configured; invitations will not be delivered");
            return Ok(Self {
                transport: None,
                from: None,
                link_base: config.rsvp_link_base.clone(),
            });
        }

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(config.username.clone(), config.password.clone()))
            .timeout(Some(config.timeout()))
            .build();

        Ok(Self {
            transport: Some(transport),
            from: Some(config.sender().parse()?),
            link_base: config.rsvp_link_base.clone(),
        })
    }
}

#[async_trait]
impl InvitationSender for SmtpInvitationSender {
    async fn send(&self, invitation: &Invitation) -> Result<(), MailError> {
        let (transport, from) = match (&self.transport, &self.from) {
            (Some(transport), Some(from)) => (transport, from),
            _ => return Err(MailError::NotConfigured),
        };

        let message = Message::builder()
            .from(from.clone())
            .to(invitation.email.parse()?)
            .subject(INVITATION_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(invitation.render_body(&self.link_base))?;

        transport.send(message).await?;
        info!(guest_id = %invitation.guest_id, email = %invitation.email, "RSVP invitation sent");
        Ok(())
    }
}

/// Handle to the detached invitation worker.
///
/// Cloning shares the same worker. The worker exits once every handle is
/// dropped and the backlog is drained.
#[derive(Clone)]
pub struct InvitationQueue {
    tx: mpsc::Sender<Invitation>,
}

impl InvitationQueue {
    pub fn start(sender: Arc<dyn InvitationSender>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<Invitation>(capacity);

        let worker = tokio::spawn(async move {
            while let Some(invitation) = rx.recv().await {
                if let Err(e) = sender.send(&invitation).await {
                    warn!(
                        guest_id = %invitation.guest_id,
                        email = %invitation.email,
                        error = %e,
                        "Guest added but invitation not sent"
                    );
                }
            }
            debug!("Invitation worker stopped");
        });

        (Self { tx }, worker)
    }

    /// Never blocks. Returns whether the invitation was accepted.
    pub fn enqueue(&self, invitation: Invitation) -> bool {
        match self.tx.try_send(invitation) {
            Ok(()) => true,
            Err(TrySendError::Full(invitation)) => {
                warn!(guest_id = %invitation.guest_id, "Invitation queue full, invitation dropped");
                false
            }
            Err(TrySendError::Closed(invitation)) => {
                warn!(guest_id = %invitation.guest_id, "Invitation worker stopped, invitation dropped");
                false
            }
        }
    }

    /// Drop this handle and wait up to `grace` for the worker to drain.
    ///
    /// Other clones must already be gone for the worker to finish.
    pub async fn shutdown(self, worker: JoinHandle<()>, grace: Duration) {
        drop(self.tx);
        match tokio::time::timeout(grace, worker).await {
            Ok(Ok(())) => info!("Invitation queue drained"),
            Ok(Err(e)) => warn!(error = %e, "Invitation worker panicked"),
            Err(_) => warn!("Invitation queue did not drain before shutdown deadline"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct RecordingSender {
        sent: Mutex<Vec<Invitation>>,
        fail: bool,
    }

    #[async_trait]
    impl InvitationSender for RecordingSender {
        async fn send(&self, invitation: &Invitation) -> Result<(), MailError> {
            self.sent.lock().push(invitation.clone());
            if self.fail {
                Err(MailError::NotConfigured)
            } else {
                Ok(())
            }
        }
    }

    fn invitation() -> Invitation {
        Invitation::for_guest(&Guest::new("Jane", "jane@x.com", "Bride", 2))
    }

    #[test]
    fn test_rsvp_link_and_body() {
        let inv = Invitation {
            guest_id: Uuid::nil(),
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            rsvp_token: "abc".to_string(),
        };
        assert_eq!(inv.rsvp_link("https://rsvp.example.com"), "https://rsvp.example.com?token=abc");

        let body = inv.render_body("https://rsvp.example.com");
        assert!(body.starts_with("Dear Jane,"));
        assert!(body.contains("https://rsvp.example.com?token=abc"));
    }

    #[tokio::test]
    async fn test_unconfigured_smtp_fails_on_send() {
        let sender = SmtpInvitationSender::new(&SmtpConfig::default()).unwrap();
        assert!(matches!(sender.send(&invitation()).await, Err(MailError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_queue_drains_and_swallows_failures() {
        let sender = Arc::new(RecordingSender { sent: Mutex::new(Vec::new()), fail: true });
        let (queue, worker) = InvitationQueue::start(sender.clone(), 8);

        assert!(queue.enqueue(invitation()));
        assert!(queue.enqueue(invitation()));
        queue.shutdown(worker, Duration::from_secs(1)).await;

        assert_eq!(sender.sent.lock().len(), 2);
    }
}
