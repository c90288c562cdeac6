//! Admin Access Boundary
//!
//! Admin requests carry a bearer credential that is forwarded verbatim to an
//! external authentication service. Every request is verified on its own;
//! verdicts are never cached.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};

use rsvp_config::AuthServiceConfig;

use crate::error::{PlatformError, Result};

pub const MISSING_TOKEN: &str = "Missing token";
pub const MALFORMED_HEADER: &str = "Invalid Authorization header format";
pub const INVALID_TOKEN: &str = "Invalid or expired token";

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// `Ok(true)` only when the authentication service accepted the token.
    async fn verify(&self, bearer: &str) -> Result<bool>;

    /// Reachability check used by the status endpoint.
    async fn probe(&self) -> Result<()>;
}

/// Verifier backed by the authentication service's HTTP API.
pub struct HttpTokenVerifier {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTokenVerifier {
    pub fn new(config: &AuthServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .build()
            .map_err(|e| PlatformError::configuration(format!("auth client: {}", e)))?;

        Ok(Self {
            base_url: config.service_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn map_transport(err: reqwest::Error) -> PlatformError {
        if err.is_timeout() {
            PlatformError::timeout("auth service")
        } else {
            PlatformError::upstream("auth service", err.to_string())
        }
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, bearer: &str) -> Result<bool> {
        let url = format!("{}/validate-token", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = %status, "Authentication service rejected token");
        }
        Ok(status == StatusCode::OK)
    }

    async fn probe(&self) -> Result<()> {
        let url = format!("{}/status", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PlatformError::upstream(
                "auth service",
                format!("status endpoint returned {}", response.status()),
            ))
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// The token is returned untouched so the verifier receives the same header.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .filter(|token| !token.trim().is_empty())
}

/// Gate in front of every admin operation.
#[derive(Clone)]
pub struct AccessBoundary {
    verifier: Arc<dyn TokenVerifier>,
}

impl AccessBoundary {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &Arc<dyn TokenVerifier> {
        &self.verifier
    }

    /// Resolve a raw `Authorization` header value to Verified or an
    /// `Unauthorized` error. A verifier failure counts as Unverified.
    pub async fn authorize(&self, authorization: Option<&str>) -> Result<()> {
        let header = authorization.ok_or_else(|| PlatformError::unauthorized(MISSING_TOKEN))?;
        let token = extract_bearer_token(header).ok_or_else(|| PlatformError::unauthorized(MALFORMED_HEADER))?;

        match self.verifier.verify(token).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(PlatformError::unauthorized(INVALID_TOKEN)),
            Err(e) => {
                warn!(error = %e, "Token verification failed");
                Err(PlatformError::unauthorized(INVALID_TOKEN))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedVerifier(Result<bool>);

    #[async_trait]
    impl TokenVerifier for FixedVerifier {
        async fn verify(&self, _bearer: &str) -> Result<bool> {
            match &self.0 {
                Ok(v) => Ok(*v),
                Err(_) => Err(PlatformError::timeout("auth service")),
            }
        }

        async fn probe(&self) -> Result<()> {
            Ok(())
        }
    }

    fn boundary(verdict: Result<bool>) -> AccessBoundary {
        AccessBoundary::new(Arc::new(FixedVerifier(verdict)))
    }

    fn unauthorized_message(err: PlatformError) -> String {
        match err {
            PlatformError::Unauthorized { message } => message,
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    struct RecordingVerifier {
        seen: parking_lot::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TokenVerifier for RecordingVerifier {
        async fn verify(&self, bearer: &str) -> Result<bool> {
            self.seen.lock().push(bearer.to_string());
            Ok(true)
        }

        async fn probe(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer  abc "), Some(" abc "));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Bearer    "), None);
        assert_eq!(extract_bearer_token("abc"), None);
    }

    #[tokio::test]
    async fn test_authorize_forwards_token_verbatim() {
        let verifier = Arc::new(RecordingVerifier {
            seen: parking_lot::Mutex::new(Vec::new()),
        });
        let boundary = AccessBoundary::new(verifier.clone());

        boundary.authorize(Some("Bearer  abc ")).await.unwrap();

        let seen = verifier.seen.lock();
        assert_eq!(seen.as_slice(), [" abc ".to_string()]);
        assert_eq!(format!("Bearer {}", seen[0]), "Bearer  abc ");
    }

    #[tokio::test]
    async fn test_authorize_outcomes() {
        assert!(boundary(Ok(true)).authorize(Some("Bearer t")).await.is_ok());

        let err = boundary(Ok(true)).authorize(None).await.unwrap_err();
        assert_eq!(unauthorized_message(err), MISSING_TOKEN);

        let err = boundary(Ok(true)).authorize(Some("Token t")).await.unwrap_err();
        assert_eq!(unauthorized_message(err), MALFORMED_HEADER);

        let err = boundary(Ok(false)).authorize(Some("Bearer t")).await.unwrap_err();
        assert_eq!(unauthorized_message(err), INVALID_TOKEN);

        let err = boundary(Err(PlatformError::internal("x")))
            .authorize(Some("Bearer t"))
            .await
            .unwrap_err();
        assert_eq!(unauthorized_message(err), INVALID_TOKEN);
    }
}
