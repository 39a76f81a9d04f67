//! Client tests against a scripted HTTP/1.1 server on a loopback socket.

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use eventhub_api::models::{EventDecision, EventFilters, EventStatus};
use eventhub_api::{ApiClient, AuthClient, HttpClient};
use eventhub_core::config::ApiConfig;
use eventhub_core::error::ErrorKind;
use eventhub_core::traits::{AuthBackend, TokenProvider};
use eventhub_core::types::{Credentials, EventId, RegistrationForm, Role};

/// A request as seen by the stub server.
#[derive(Debug, Clone)]
struct Seen {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Seen {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json body")
    }
}

/// Serve one canned response per connection, recording each request.
async fn stub(responses: Vec<(u16, Value)>) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut socket).await;
            log.lock().unwrap().push(request);

            let payload = body.to_string();
            let response = format!(
                "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{payload}",
                payload.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
        }
    });

    (format!("http://{addr}/api/v1"), seen)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Seen {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.expect("read");
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut start = lines.next().expect("request line").split_whitespace();
    let method = start.next().expect("method").to_string();
    let target = start.next().expect("target").to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .map(|(_, v)| v.parse::<usize>().expect("length"))
        .unwrap_or(0);
    let mut body = buf[header_end..].to_vec();
    while body.len() < length {
        let n = socket.read(&mut chunk).await.expect("read body");
        assert!(n > 0, "client closed mid-body");
        body.extend_from_slice(&chunk[..n]);
    }

    Seen {
        method,
        target,
        headers,
        body,
    }
}

fn http(base_url: &str) -> HttpClient {
    HttpClient::new(&ApiConfig {
        base_url: base_url.to_string(),
        request_timeout_seconds: 5,
    })
    .expect("client")
}

#[derive(Debug)]
struct FixedToken(Option<&'static str>);

impl TokenProvider for FixedToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.map(str::to_string)
    }
}

fn user() -> Value {
    json!({"_id": "1", "fullName": "Asha Rao", "email": "asha@campus.edu", "role": "student"})
}

#[tokio::test]
async fn test_login_posts_credentials() {
    let (base, seen) = stub(vec![(200, json!({"token": "t1", "user": user()}))]).await;
    let auth = AuthClient::new(http(&base));

    let grant = auth
        .login(&Credentials::new("asha@campus.edu", "pw"))
        .await
        .expect("login");
    assert_eq!(grant.token, "t1");
    assert_eq!(grant.user.role, Role::Student);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].target, "/api/v1/user/login");
    assert_eq!(seen[0].json(), json!({"email": "asha@campus.edu", "password": "pw"}));
    assert!(seen[0].header("authorization").is_none());
}

#[tokio::test]
async fn test_login_rejection_keeps_server_message() {
    let (base, _) = stub(vec![(401, json!({"message": "Invalid credentials"}))]).await;
    let auth = AuthClient::new(http(&base));

    let err = auth
        .login(&Credentials::new("asha@campus.edu", "wrong"))
        .await
        .expect_err("rejected");
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(err.server_message.as_deref(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_register_sends_multipart_form() {
    let (base, seen) = stub(vec![(201, json!({"success": true, "message": "Registered"}))]).await;
    let auth = AuthClient::new(http(&base));

    let receipt = auth
        .register(&RegistrationForm {
            full_name: "Asha Rao".into(),
            email: "asha@campus.edu".into(),
            contact_number: "555-0100".into(),
            password: "pw".into(),
            role: Role::Student,
            student_id: Some("CS-042".into()),
            avatar: None,
        })
        .await
        .expect("register");
    assert!(receipt.success);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].target, "/api/v1/user/register");
    assert!(
        seen[0]
            .header("content-type")
            .is_some_and(|v| v.starts_with("multipart/form-data"))
    );
    let body = String::from_utf8_lossy(&seen[0].body);
    assert!(body.contains("name=\"fullName\""));
    assert!(body.contains("CS-042"));
    assert!(!body.contains("name=\"file\""));
}

#[tokio::test]
async fn test_authorized_requests_carry_bearer_token() {
    let (base, seen) = stub(vec![
        (200, json!({"events": [{"_id": "e5", "title": "Hackathon", "status": "pending"}]})),
        (200, json!({"event": {"_id": "e5", "title": "Hackathon", "status": "approved"}})),
    ])
    .await;
    let api = ApiClient::new(http(&base), Arc::new(FixedToken(Some("t1"))));

    let filters = EventFilters {
        status: Some(EventStatus::Pending),
        ..Default::default()
    };
    let events = api.events(&filters).await.expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].status, Some(EventStatus::Pending));

    let event = api.event(&EventId::from("e5")).await.expect("event");
    assert_eq!(event.status, Some(EventStatus::Approved));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].target, "/api/v1/event/all?status=pending");
    assert_eq!(seen[1].target, "/api/v1/event/e5");
    for request in seen.iter() {
        assert_eq!(request.header("authorization"), Some("Bearer t1"));
    }
}

#[tokio::test]
async fn test_bare_event_body_is_accepted() {
    let (base, _) = stub(vec![(200, json!({"_id": "e7", "title": "Open Mic"}))]).await;
    let api = ApiClient::new(http(&base), Arc::new(FixedToken(Some("t1"))));
    let event = api.event(&EventId::from("e7")).await.expect("event");
    assert_eq!(event.title, "Open Mic");
}

#[tokio::test]
async fn test_missing_token_sends_no_header() {
    let (base, seen) = stub(vec![(403, json!({"error": "Forbidden"}))]).await;
    let api = ApiClient::new(http(&base), Arc::new(FixedToken(None)));

    let err = api
        .decide_event(&EventId::from("e5"), &EventDecision::reject("Duplicate"))
        .await
        .expect_err("forbidden");
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(err.server_message.as_deref(), Some("Forbidden"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].method, "PUT");
    assert_eq!(seen[0].target, "/api/v1/event/approve-reject/e5");
    assert!(seen[0].header("authorization").is_none());
    assert_eq!(
        seen[0].json(),
        json!({"status": "rejected", "rejectionReason": "Duplicate"})
    );
}

#[tokio::test]
async fn test_register_for_event_and_list_registrations() {
    let (base, seen) = stub(vec![
        (201, json!({"message": "Registered"})),
        (
            200,
            json!({"registrations": [
                {"_id": "r1", "event": {"_id": "e5", "title": "Hackathon"}, "status": "registered"},
                {"_id": "r2", "event": "e9"}
            ]}),
        ),
    ])
    .await;
    let api = ApiClient::new(http(&base), Arc::new(FixedToken(Some("t1"))));

    let receipt = api
        .register_for_event(&EventId::from("e5"))
        .await
        .expect("register");
    assert!(receipt.success);

    let registrations = api.my_registrations().await.expect("registrations");
    assert_eq!(registrations[0].event_title(), Some("Hackathon"));
    assert_eq!(registrations[1].event_title(), None);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].json(), json!({"eventId": "e5"}));
    assert_eq!(seen[1].target, "/api/v1/registration/my");
}

#[tokio::test]
async fn test_undecodable_body_is_serialization_error() {
    let (base, _) = stub(vec![(200, json!({"user": "not-an-object"}))]).await;
    let api = ApiClient::new(http(&base), Arc::new(FixedToken(Some("t1"))));
    let err = api.profile().await.expect_err("bad body");
    assert_eq!(err.kind, ErrorKind::Serialization);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let auth = AuthClient::new(http(&format!("http://{addr}/api/v1")));
    let err = auth
        .login(&Credentials::new("a@b.c", "pw"))
        .await
        .expect_err("unreachable");
    assert_eq!(err.kind, ErrorKind::Transport);
}
