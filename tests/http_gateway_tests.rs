#![cfg(feature = "gateway-http")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! `HttpGateway` tests against an in-process HTTP/1.1 responder.
//!
//! Each test binds a `TcpListener` on an ephemeral port, answers one canned
//! response per connection and records the raw requests it received.

use std::time::Duration;

use majority_rules_client::protocol::RoundId;
use majority_rules_client::{
    Gateway, HttpGateway, HttpGatewayConfig, MajorityRulesError, Phase, Session,
    SubmissionIntent, SubmissionKind,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

// ── Canned responder ────────────────────────────────────────────────

/// Serve `responses` in order, one per connection, returning the base URL
/// (with an `/api` prefix) and a handle yielding the raw requests.
async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);
            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        }
        requests
    });
    (format!("http://{addr}/api"), task)
}

/// Read one request: headers plus a `Content-Length` body.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn gateway(base_url: &str) -> HttpGateway {
    HttpGateway::new(
        HttpGatewayConfig::new(base_url)
            .with_ngrok_skip_warning()
            .without_system_proxy(),
    )
    .unwrap()
}

fn body_json(request: &str) -> serde_json::Value {
    let (_, body) = request.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

fn intent(kind: SubmissionKind, text: &str, round_id: RoundId) -> SubmissionIntent {
    SubmissionIntent::capture(kind, text, Some(round_id)).unwrap()
}

// ── Join ────────────────────────────────────────────────────────────

#[tokio::test]
async fn join_posts_name_and_returns_session() {
    let (url, server) = serve(vec![(200, r#"{"player_id":"abc-123","name":"Alice"}"#)]).await;

    let session = gateway(&url).join("Alice").await.unwrap();
    assert_eq!(session.participant_id().to_string(), "abc-123");
    assert_eq!(session.display_name(), "Alice");

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /api/join HTTP/1.1"));
    assert!(requests[0]
        .to_ascii_lowercase()
        .contains("ngrok-skip-browser-warning: true"));
    assert_eq!(body_json(&requests[0]), serde_json::json!({"name": "Alice"}));
}

#[tokio::test]
async fn join_error_body_is_surfaced_verbatim() {
    let (url, _server) = serve(vec![(400, r#"{"error":"Name already taken"}"#)]).await;

    let err = gateway(&url).join("Alice").await.unwrap_err();
    assert!(matches!(err, MajorityRulesError::Server { status: 400, .. }));
    assert_eq!(err.status_message(), "Name already taken");
}

#[tokio::test]
async fn join_without_error_body_uses_fallback() {
    let (url, _server) = serve(vec![(500, "")]).await;

    let err = gateway(&url).join("Alice").await.unwrap_err();
    assert!(matches!(err, MajorityRulesError::Transport(_)));
    assert_eq!(err.status_message(), "Join failed");
}

// ── State ───────────────────────────────────────────────────────────

#[tokio::test]
async fn state_is_decoded() {
    let (url, server) = serve(vec![(
        200,
        r#"{"phase":"ANSWER","round_id":2,"round_total":5,"prompt":"Best snack?"}"#,
    )])
    .await;

    let snapshot = gateway(&url).fetch_state().await.unwrap();
    assert_eq!(snapshot.phase, Phase::Answer);
    assert_eq!(snapshot.round_id, Some(2));
    assert_eq!(snapshot.prompt.as_deref(), Some("Best snack?"));

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /api/state HTTP/1.1"));
}

#[tokio::test]
async fn state_failure_is_status_coded() {
    let (url, _server) = serve(vec![(503, r#"{"error":"maintenance"}"#)]).await;

    let err = gateway(&url).fetch_state().await.unwrap_err();
    assert_eq!(err.status_message(), "State request failed: 503");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        gateway(&format!("http://{addr}/api")).fetch_state(),
    )
    .await
    .expect("connection refusal should be prompt");
    assert!(matches!(result, Err(MajorityRulesError::Transport(_))));
}

// ── Submissions ─────────────────────────────────────────────────────

#[tokio::test]
async fn answer_carries_participant_and_round() {
    let (url, server) = serve(vec![(200, r#"{"ok":true}"#)]).await;
    let session = Session::new("abc-123", "Alice");

    gateway(&url)
        .submit(&intent(SubmissionKind::Answer, "pizza", 5), &session)
        .await
        .unwrap();

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /api/answer HTTP/1.1"));
    assert_eq!(
        body_json(&requests[0]),
        serde_json::json!({"player_id": "abc-123", "round_id": 5, "answer": "pizza"})
    );
}

#[tokio::test]
async fn late_submission_reports_server_message() {
    let (url, _server) = serve(vec![(409, r#"{"error":"too late"}"#)]).await;
    let session = Session::new("abc-123", "Alice");

    let err = gateway(&url)
        .submit(&intent(SubmissionKind::Answer, "pizza", 5), &session)
        .await
        .unwrap_err();
    assert_eq!(err.status_message(), "too late");
}

#[tokio::test]
async fn guess_failure_without_body_uses_fallback() {
    let (url, server) = serve(vec![(500, "")]).await;
    let session = Session::new("abc-123", "Alice");

    let err = gateway(&url)
        .submit(&intent(SubmissionKind::Guess, "cats", 4), &session)
        .await
        .unwrap_err();
    assert_eq!(err.status_message(), "Guess submission failed");

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /api/guess HTTP/1.1"));
    assert_eq!(body_json(&requests[0])["guess"], "cats");
}

#[tokio::test]
async fn empty_ack_body_is_accepted() {
    let (url, _server) = serve(vec![(200, "")]).await;
    let session = Session::new("abc-123", "Alice");

    let ack = gateway(&url)
        .submit(&intent(SubmissionKind::Guess, "cats", 4), &session)
        .await
        .unwrap();
    assert_eq!(ack.0, serde_json::Value::Null);
}

// ── Results ─────────────────────────────────────────────────────────

#[tokio::test]
async fn results_are_requested_by_round() {
    let (url, server) = serve(vec![(200, r#"{"majority":"cats","points":3}"#)]).await;

    let payload = gateway(&url).fetch_results(3).await.unwrap();
    assert_eq!(payload.0["majority"], "cats");

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /api/results?round_id=3 HTTP/1.1"));
}

#[tokio::test]
async fn missing_results_report_server_message() {
    let (url, _server) = serve(vec![(404, r#"{"error":"No results for round 3 yet"}"#)]).await;

    let err = gateway(&url).fetch_results(3).await.unwrap_err();
    assert!(matches!(err, MajorityRulesError::Server { status: 404, .. }));
    assert_eq!(err.status_message(), "No results for round 3 yet");
}
