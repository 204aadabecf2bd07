#![allow(clippy::unwrap_used)]
// Integration tests for `UpdateDispatcher` using wiremock.

use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{bearer_token, body_bytes, header, header_exists, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use netpush_api::{
    Endpoint, Error, MAX_CLIENT_ID, PLACEHOLDER_TOKEN, RemoteTokenProvider, Session,
    StaticTokenProvider, TokenProvider, TokenSource, TransportConfig, UpdateDispatcher,
    UpdateOutcome,
};

const PAYLOAD: &str = r#"{"profile":{"applications":[{"id":"my_app","version":"v1.2.3"}]}}"#;

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, UpdateDispatcher, Session<StaticTokenProvider>) {
    let server = MockServer::start().await;
    let endpoint = Endpoint::new(server.uri(), None).unwrap();
    let dispatcher = UpdateDispatcher::with_client(
        reqwest::Client::new(),
        endpoint,
        Bytes::from_static(PAYLOAD.as_bytes()),
    );
    let session = Session::establish(StaticTokenProvider::default())
        .await
        .unwrap();
    (server, dispatcher, session)
}

fn error_body(error: &str, message: &str) -> serde_json::Value {
    json!({ "error": error, "message": message })
}

// ── Outcome classification ──────────────────────────────────────────

#[tokio::test]
async fn test_send_ok() {
    let (server, dispatcher, mut session) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/profiles/clientId:bb:11:cc:dd:ee:ff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let (outcome, status) = dispatcher.send(&mut session, "bb:11:cc:dd:ee:ff").await;

    assert_eq!(outcome, UpdateOutcome::Ok);
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_send_unauthorized_refreshes_token() {
    let (server, dispatcher, mut session) = setup().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/profiles/clientId:b1"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(error_body("Unauthorized", "bad token")),
        )
        .mount(&server)
        .await;

    let before = session.refresh_count();
    let (outcome, status) = dispatcher.send(&mut session, "b1:11:cc:dd:ee:ff").await;

    assert_eq!(outcome, UpdateOutcome::Retry);
    assert_eq!(status, 401);
    assert_eq!(session.refresh_count(), before + 1);
}

#[tokio::test]
async fn test_send_permanent_failures() {
    let (server, dispatcher, mut session) = setup().await;

    for (prefix, code, reason) in [
        ("b2", 404, "Not Found"),
        ("b3", 409, "Conflict"),
        ("b4", 500, "Internal Server Error"),
    ] {
        Mock::given(method("PUT"))
            .and(path_regex(format!(r"^/profiles/clientId:{prefix}")))
            .respond_with(
                ResponseTemplate::new(code).set_body_json(error_body(reason, "profile rejected")),
            )
            .mount(&server)
            .await;
    }

    for (mac, code) in [
        ("b2:11:cc:dd:ee:ff", 404),
        ("b3:11:cc:dd:ee:ff", 409),
        ("b4:11:cc:dd:ee:ff", 500),
    ] {
        let before = session.refresh_count();
        let (outcome, status) = dispatcher.send(&mut session, mac).await;
        assert_eq!(outcome, UpdateOutcome::Fail, "{mac}");
        assert_eq!(status, code, "{mac}");
        assert_eq!(session.refresh_count(), before, "{mac} must not refresh");
    }
}

#[tokio::test]
async fn test_send_malformed_error_body_is_fail() {
    let (server, dispatcher, mut session) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let (outcome, status) = dispatcher.send(&mut session, "b4:44:cc:dd:ee:ff").await;

    assert_eq!(outcome, UpdateOutcome::Fail);
    assert_eq!(status, 500);
}

#[tokio::test]
async fn test_send_unknown_status_is_fail() {
    let (server, dispatcher, mut session) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;

    let (outcome, status) = dispatcher.send(&mut session, "cc:00:00:00:00:01").await;

    assert_eq!(outcome, UpdateOutcome::Fail);
    assert_eq!(status, 418);
}

#[tokio::test]
async fn test_send_unreachable_endpoint() {
    // Grab a free port, then close it so the connection is refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let endpoint = Endpoint::new("http://127.0.0.1", Some(port)).unwrap();
    let dispatcher = UpdateDispatcher::new(
        endpoint,
        Bytes::from_static(PAYLOAD.as_bytes()),
        &TransportConfig::default(),
    )
    .unwrap();
    let mut session = Session::establish(StaticTokenProvider::default())
        .await
        .unwrap();

    let (outcome, status) = dispatcher.send(&mut session, "b4:11:cc:dd:ee:ff").await;

    assert_eq!(outcome, UpdateOutcome::Fail);
    assert_eq!(status, 0);
}

// ── Request shape ───────────────────────────────────────────────────

#[tokio::test]
async fn test_request_headers_and_body() {
    let (server, dispatcher, mut session) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/profiles/clientId:aa:bb:cc:dd:ee:ff"))
        .and(header("content-type", "application/json"))
        .and(header("x-authentication-token", PLACEHOLDER_TOKEN))
        .and(header_exists("x-client-id"))
        .and(body_bytes(PAYLOAD.as_bytes()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (outcome, _) = dispatcher.send(&mut session, "aa:bb:cc:dd:ee:ff").await;
    assert_eq!(outcome, UpdateOutcome::Ok);

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    let client_id: u16 = requests[0].headers["x-client-id"]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=MAX_CLIENT_ID).contains(&client_id));
}

#[tokio::test]
async fn test_port_is_appended_to_base() {
    let server = MockServer::start().await;
    let addr = server.address();
    let endpoint = Endpoint::new(format!("http://{}", addr.ip()), Some(addr.port())).unwrap();
    let dispatcher =
        UpdateDispatcher::with_client(reqwest::Client::new(), endpoint, Bytes::from_static(b"{}"));
    let mut session = Session::new(StaticTokenProvider::default());

    Mock::given(method("PUT"))
        .and(path("/profiles/clientId:01:02:03:04:05:06"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (outcome, status) = dispatcher.send(&mut session, "01:02:03:04:05:06").await;
    assert_eq!((outcome, status), (UpdateOutcome::Ok, 200));
}

// ── Remote token issuer ─────────────────────────────────────────────

fn remote_session(server: &MockServer) -> Session<TokenSource> {
    let issuer = Url::parse(&format!("{}/bearer", server.uri())).unwrap();
    Session::new(TokenSource::Remote(RemoteTokenProvider::new(
        reqwest::Client::new(),
        issuer,
        SecretString::from("ACCESS_TOKEN".to_owned()),
    )))
}

#[tokio::test]
async fn test_remote_token_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bearer"))
        .and(bearer_token("ACCESS_TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = remote_session(&server);
    session.refresh().await.unwrap();

    assert_eq!(session.token().expose_secret(), "t-1");
}

#[tokio::test]
async fn test_remote_token_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bearer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "authenticated": true })))
        .mount(&server)
        .await;

    let mut session = remote_session(&server);
    let result = session.refresh().await;

    assert!(
        matches!(result, Err(Error::AuthProvisioning { .. })),
        "expected AuthProvisioning error, got: {result:?}"
    );
    assert_eq!(session.refresh_count(), 0);
}

#[tokio::test]
async fn test_remote_token_rejected_by_issuer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bearer"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut session = remote_session(&server);
    let result = session.refresh().await;

    assert!(matches!(result, Err(Error::AuthProvisioning { .. })));
}

#[tokio::test]
async fn test_unauthorized_with_failing_refresh_is_fail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bearer"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let endpoint = Endpoint::new(server.uri(), None).unwrap();
    let dispatcher =
        UpdateDispatcher::with_client(reqwest::Client::new(), endpoint, Bytes::from_static(b"{}"));
    let mut session = remote_session(&server);

    let (outcome, status) = dispatcher.send(&mut session, "b1:11:cc:dd:ee:ff").await;

    assert_eq!(outcome, UpdateOutcome::Fail);
    assert_eq!(status, 401);
    assert!(session.provider().current_token().expose_secret().is_empty());
}
