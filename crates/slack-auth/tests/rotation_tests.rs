//! Integration tests for token rotation.
//!
//! A wiremock server stands in for `tooling.tokens.rotate`. Each test checks
//! both what the rotator reports and what ends up in the store and env file.

use slack_auth::{CredentialPair, CredentialRotator, CredentialSources, CredentialStore, EnvFile};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROTATE_PATH: &str = "/api/tooling.tokens.rotate";

/// Test fixture providing a mock rotation endpoint and a seeded store.
struct TestFixture {
    /// Mock Slack server.
    server: MockServer,
    /// Store under test.
    store: Arc<CredentialStore>,
    /// Rotator under test.
    rotator: Arc<CredentialRotator>,
}

impl TestFixture {
    async fn new(pair: CredentialPair, env_file: Option<EnvFile>) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(CredentialStore::with_pair(
            pair,
            CredentialSources::from_map(HashMap::new()),
            env_file,
        ));
        let rotator = Arc::new(
            CredentialRotator::with_timeout(
                store.clone(),
                format!("{}{}", server.uri(), ROTATE_PATH),
                Duration::from_secs(5),
            )
            .expect("client builds"),
        );

        Self {
            server,
            store,
            rotator,
        }
    }
}

#[tokio::test]
async fn test_successful_rotation_updates_store_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let env_path = dir.path().join(".env");
    std::fs::write(&env_path, "PORT=8080\nSLACK_USER_TOKEN=xoxe.xoxp-old\n").unwrap();

    let fixture = TestFixture::new(
        CredentialPair::new("xoxe.xoxp-old", "xoxe-1-r1"),
        Some(EnvFile::new(&env_path)),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(ROTATE_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("refresh_token=xoxe-1-r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "token": "xoxe.xoxp-new",
            "refresh_token": "xoxe-1-r2",
            "exp": 1700043200
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    assert!(fixture.rotator.refresh().await);

    assert_eq!(
        fixture.store.snapshot(),
        CredentialPair::new("xoxe.xoxp-new", "xoxe-1-r2")
    );
    let content = std::fs::read_to_string(&env_path).unwrap();
    assert_eq!(
        content,
        "PORT=8080\nSLACK_TOKEN=xoxe.xoxp-new\nSLACK_REFRESH_TOKEN=xoxe-1-r2\n"
    );
}

#[tokio::test]
async fn test_rejected_rotation_leaves_store_untouched() {
    let fixture = TestFixture::new(CredentialPair::new("xoxe.xoxp-old", "xoxe-1-r1"), None).await;

    Mock::given(method("POST"))
        .and(path(ROTATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": false,
            "error": "invalid_refresh_token"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    assert!(!fixture.rotator.refresh().await);
    assert_eq!(
        fixture.store.snapshot(),
        CredentialPair::new("xoxe.xoxp-old", "xoxe-1-r1")
    );
}

#[tokio::test]
async fn test_empty_new_token_is_a_failure() {
    let fixture = TestFixture::new(CredentialPair::new("xoxe.xoxp-old", "xoxe-1-r1"), None).await;

    Mock::given(method("POST"))
        .and(path(ROTATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "token": "",
            "refresh_token": "xoxe-1-r2"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    assert!(!fixture.rotator.refresh().await);
    assert_eq!(fixture.store.access_token(), "xoxe.xoxp-old");
    assert_eq!(fixture.store.refresh_token(), "xoxe-1-r1");
}

#[tokio::test]
async fn test_malformed_response_is_a_failure() {
    let fixture = TestFixture::new(CredentialPair::new("xoxe.xoxp-old", "xoxe-1-r1"), None).await;

    Mock::given(method("POST"))
        .and(path(ROTATE_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .expect(1)
        .mount(&fixture.server)
        .await;

    assert!(!fixture.rotator.refresh().await);
    assert_eq!(fixture.store.access_token(), "xoxe.xoxp-old");
}

#[tokio::test]
async fn test_transport_failure_is_a_failure() {
    let store = Arc::new(CredentialStore::with_pair(
        CredentialPair::new("xoxe.xoxp-old", "xoxe-1-r1"),
        CredentialSources::from_map(HashMap::new()),
        None,
    ));
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"ok": true, "token": "late"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    let rotator = CredentialRotator::with_timeout(
        store.clone(),
        format!("{}{}", server.uri(), ROTATE_PATH),
        Duration::from_millis(50),
    )
    .unwrap();

    assert!(!rotator.refresh().await);
    assert_eq!(store.access_token(), "xoxe.xoxp-old");
}

#[tokio::test]
async fn test_concurrent_refresh_sends_one_request() {
    let fixture = TestFixture::new(CredentialPair::new("xoxe.xoxp-old", "xoxe-1-r1"), None).await;

    Mock::given(method("POST"))
        .and(path(ROTATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "ok": true,
                    "token": "xoxe.xoxp-new",
                    "refresh_token": "xoxe-1-r2"
                }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&fixture.server)
        .await;

    let first = tokio::spawn({
        let rotator = fixture.rotator.clone();
        async move { rotator.refresh().await }
    });
    let second = tokio::spawn({
        let rotator = fixture.rotator.clone();
        async move { rotator.refresh_after("xoxe.xoxp-old").await }
    });

    assert!(first.await.unwrap());
    assert!(second.await.unwrap());
    assert_eq!(fixture.store.access_token(), "xoxe.xoxp-new");
    assert_eq!(fixture.rotator.attempts(), 1);
}

#[tokio::test]
async fn test_concurrent_refresh_shares_failure() {
    let fixture = TestFixture::new(CredentialPair::new("xoxe.xoxp-old", "xoxe-1-r1"), None).await;

    Mock::given(method("POST"))
        .and(path(ROTATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "ok": false,
                    "error": "invalid_refresh_token"
                }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&fixture.server)
        .await;

    let (first, second) = tokio::join!(
        fixture.rotator.refresh_after("xoxe.xoxp-old"),
        fixture.rotator.refresh_after("xoxe.xoxp-old"),
    );

    assert!(!first);
    assert!(!second);
    assert_eq!(fixture.rotator.attempts(), 1);
}

#[tokio::test]
async fn test_abandoned_refresh_is_not_repeated_by_waiter() {
    let fixture = TestFixture::new(CredentialPair::new("xoxe.xoxp-old", "xoxe-1-r1"), None).await;

    Mock::given(method("POST"))
        .and(path(ROTATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "ok": true,
                    "token": "xoxe.xoxp-new",
                    "refresh_token": "xoxe-1-r2"
                }))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&fixture.server)
        .await;

    let rotator = fixture.rotator.clone();
    let holder = tokio::spawn(async move { rotator.refresh().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let rotator = fixture.rotator.clone();
    let waiter = tokio::spawn(async move { rotator.refresh_after("xoxe.xoxp-old").await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The request is in flight, so the refresh token may already be spent.
    holder.abort();
    assert!(holder.await.unwrap_err().is_cancelled());

    assert!(!waiter.await.unwrap());
    assert_eq!(fixture.rotator.attempts(), 1);
    assert_eq!(fixture.store.access_token(), "xoxe.xoxp-old");
}

#[tokio::test]
async fn test_sequential_refreshes_each_rotate() {
    let fixture = TestFixture::new(CredentialPair::new("xoxe.xoxp-a", "r-a"), None).await;

    Mock::given(method("POST"))
        .and(path(ROTATE_PATH))
        .and(body_string_contains("refresh_token=r-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "token": "xoxe.xoxp-b",
            "refresh_token": "r-b"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;
    Mock::given(method("POST"))
        .and(path(ROTATE_PATH))
        .and(body_string_contains("refresh_token=r-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "token": "xoxe.xoxp-c",
            "refresh_token": "r-c"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    assert!(fixture.rotator.refresh().await);
    assert!(fixture.rotator.refresh().await);
    assert_eq!(fixture.store.snapshot(), CredentialPair::new("xoxe.xoxp-c", "r-c"));
    assert_eq!(fixture.rotator.attempts(), 2);
}
