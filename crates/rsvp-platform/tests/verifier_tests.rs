//! Authentication service client tests against a mock HTTP server

use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rsvp_config::AuthServiceConfig;
use rsvp_platform::service::{HttpTokenVerifier, TokenVerifier};
use rsvp_platform::PlatformError;

fn verifier_for(url: &str, timeout_secs: u64) -> HttpTokenVerifier {
    HttpTokenVerifier::new(&AuthServiceConfig {
        service_url: url.to_string(),
        timeout_secs,
    })
    .unwrap()
}

#[tokio::test]
async fn test_verify_forwards_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/validate-token"))
        .and(header("Authorization", "Bearer good-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let verifier = verifier_for(&server.uri(), 2);
    assert!(verifier.verify("good-token").await.unwrap());
}

#[tokio::test]
async fn test_verify_non_200_is_unverified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/validate-token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let verifier = verifier_for(&server.uri(), 2);
    assert!(!verifier.verify("bad-token").await.unwrap());
}

#[tokio::test]
async fn test_verify_other_success_status_is_unverified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/validate-token"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let verifier = verifier_for(&server.uri(), 2);
    assert!(!verifier.verify("token").await.unwrap());
}

#[tokio::test]
async fn test_verify_timeout_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/validate-token"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let verifier = verifier_for(&server.uri(), 1);
    assert!(matches!(
        verifier.verify("token").await,
        Err(PlatformError::Upstream { .. })
    ));
}

#[tokio::test]
async fn test_probe_uses_status_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let verifier = verifier_for(&format!("{}/", server.uri()), 2);
    assert!(verifier.probe().await.is_ok());
}

#[tokio::test]
async fn test_probe_unreachable_service() {
    let verifier = verifier_for("http://127.0.0.1:1", 1);
    assert!(verifier.probe().await.is_err());
}
