//! Wedding RSVP Server
//!
//! Serves the public RSVP endpoints, the bearer-gated admin guest API and
//! the `/status` probe.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RSVP_CONFIG` | - | Optional TOML config file |
//! | `PORT` / `SERVER_PORT` | `8081` | HTTP port (`PORT` wins) |
//! | `DATABASE_URL` | - | Postgres URL; empty runs on an in-memory store |
//! | `AUTH_SERVICE_URL` | - | Authentication service base URL (required) |
//! | `SMTP_HOST` / `SMTP_PORT` | `smtp.gmail.com` / `587` | SMTP relay |
//! | `SMTP_USER` / `SMTP_PASSWORD` | - | SMTP credentials |
//! | `SMTP_FROM` | `SMTP_USER` | Sender address |
//! | `RSVP_LINK_BASE` | `https://rsvp.example.com` | Base of the link in invitations |
//! | `RUST_LOG` | `info` | Log filter; unset or unparsable falls back to `info` |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rsvp_config::AppConfig;
use rsvp_platform::api::{create_router, ApiState};
use rsvp_platform::repository::{GuestRepository, InMemoryGuestRepository, PgGuestRepository};
use rsvp_platform::service::{
    AccessBoundary, GuestService, HttpTokenVerifier, InvitationQueue, SmtpInvitationSender,
};

const QUEUE_DRAIN_GRACE: Duration = Duration::from_secs(30);

/// `RUST_LOG` directives when present and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    info!("Starting Wedding RSVP Server");

    let config_path = std::env::var("RSVP_CONFIG").ok().map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    // Guest store
    let repo: Arc<dyn GuestRepository> = if config.database.is_in_memory() {
        warn!("DATABASE_URL not set, guests are kept in memory only");
        Arc::new(InMemoryGuestRepository::new())
    } else {
        info!("Connecting to Postgres");
        let pg = PgGuestRepository::connect_lazy(&config.database)?;
        pg.init_schema().await?;
        Arc::new(pg)
    };

    // Collaborators
    let verifier = Arc::new(HttpTokenVerifier::new(&config.auth)?);
    let mailer = Arc::new(SmtpInvitationSender::new(&config.smtp)?);
    let (queue, worker) = InvitationQueue::start(mailer.clone(), config.invitations.queue_capacity);

    let state = ApiState {
        guests: GuestService::new(repo, mailer, queue.clone()),
        boundary: AccessBoundary::new(verifier),
    };
    let app = create_router(state, &config.api);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("RSVP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Draining pending invitations...");
    queue.shutdown(worker, QUEUE_DRAIN_GRACE).await;

    info!("Wedding RSVP Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received...");
}
