//! Wedding RSVP Configuration
//!
//! Typed configuration for the RSVP server. Values are resolved in three layers:
//! 1. Built-in defaults
//! 2. Optional TOML file
//! 3. Environment variable overrides
//!
//! The resulting [`AppConfig`] is built once at start-up and handed to the
//! components that need it.
//!
//! ## Environment Variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SERVER_PORT` | `server.port` |
//! | `PORT` | `server.port` (wins over `SERVER_PORT`) |
//! | `DATABASE_URL` | `database.url` |
//! | `AUTH_SERVICE_URL` | `auth.service_url` |
//! | `SMTP_HOST` | `smtp.host` |
//! | `SMTP_PORT` | `smtp.port` |
//! | `SMTP_USER` | `smtp.username` |
//! | `SMTP_PASSWORD` | `smtp.password` |
//! | `SMTP_FROM` | `smtp.from_address` |
//! | `RSVP_LINK_BASE` | `smtp.rsvp_link_base` |

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid { message: message.into() }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Guest store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Postgres connection URL. Empty selects the in-memory store.
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Deadline applied to every store query
    pub query_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            acquire_timeout_secs: 5,
            query_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.trim().is_empty()
    }
}

/// External authentication service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthServiceConfig {
    pub service_url: String,
    pub timeout_secs: u64,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            service_url: String::new(),
            timeout_secs: 5,
        }
    }
}

impl AuthServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Outbound invitation mail
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender mailbox; falls back to `username` when empty
    pub from_address: String,
    /// Base URL of the public RSVP page; the token is appended as `?token=`
    pub rsvp_link_base: String,
    pub timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            rsvp_link_base: "https://rsvp.example.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl SmtpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    pub fn sender(&self) -> &str {
        if self.from_address.is_empty() {
            &self.username
        } else {
            &self.from_address
        }
    }
}

/// Detached invitation worker
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InvitationConfig {
    pub queue_capacity: usize,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self { queue_capacity: 256 }
    }
}

/// HTTP surface toggles
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Mount the unauthenticated legacy `POST /guests` route
    pub public_guest_registration: bool,
}

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthServiceConfig,
    pub smtp: SmtpConfig,
    pub invitations: InvitationConfig,
    pub api: ApiConfig,
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply process
    /// environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from a key lookup. Unparseable numeric values are
    /// ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = parse_var(&lookup, "SERVER_PORT") {
            self.server.port = port;
        }
        if let Some(port) = parse_var(&lookup, "PORT") {
            self.server.port = port;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(url) = lookup("AUTH_SERVICE_URL") {
            self.auth.service_url = url;
        }
        if let Some(host) = lookup("SMTP_HOST") {
            self.smtp.host = host;
        }
        if let Some(port) = parse_var(&lookup, "SMTP_PORT") {
            self.smtp.port = port;
        }
        if let Some(user) = lookup("SMTP_USER") {
            self.smtp.username = user;
        }
        if let Some(password) = lookup("SMTP_PASSWORD") {
            self.smtp.password = password;
        }
        if let Some(from) = lookup("SMTP_FROM") {
            self.smtp.from_address = from;
        }
        if let Some(base) = lookup("RSVP_LINK_BASE") {
            self.smtp.rsvp_link_base = base;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.service_url.trim().is_empty() {
            return Err(ConfigError::invalid("auth.service_url (AUTH_SERVICE_URL) must be set"));
        }
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port must be non-zero"));
        }
        if self.database.query_timeout_secs == 0
            || self.database.acquire_timeout_secs == 0
            || self.auth.timeout_secs == 0
            || self.smtp.timeout_secs == 0
        {
            return Err(ConfigError::invalid("timeouts must be greater than zero"));
        }
        if self.invitations.queue_capacity == 0 {
            return Err(ConfigError::invalid("invitations.queue_capacity must be greater than zero"));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}
