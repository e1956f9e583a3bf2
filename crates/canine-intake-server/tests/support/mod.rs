#![allow(dead_code)]

use std::sync::Arc;

use canine_intake_server::{build_router, ApiConfig, AppState, FakePayments, InMemoryStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub store: Arc<InMemoryStore>,
    pub payments: Arc<FakePayments>,
}

pub async fn spawn_server(api: ApiConfig) -> TestServer {
    let store = Arc::new(InMemoryStore::new());
    let payments = Arc::new(FakePayments::new());
    let state = AppState::with_config(store.clone(), payments.clone(), api);
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    TestServer {
        addr,
        store,
        payments,
    }
}

pub async fn send_raw(
    method: &str,
    addr: std::net::SocketAddr,
    path: &str,
    headers: &[(&str, &str)],
    body: &[u8],
) -> (u16, String, Vec<u8>) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    req.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request head");
    if !body.is_empty() {
        stream.write_all(body).await.expect("write request body");
    }
    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .expect("read response");
    let split = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("http response separator");
    let head = String::from_utf8(response[..split].to_vec()).expect("response head utf8");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head, response[split + 4..].to_vec())
}

pub async fn post_json(
    addr: std::net::SocketAddr,
    path: &str,
    body: &serde_json::Value,
) -> (u16, String, serde_json::Value) {
    let raw = serde_json::to_vec(body).expect("encode body");
    let (status, head, bytes) = send_raw(
        "POST",
        addr,
        path,
        &[("Content-Type", "application/json")],
        &raw,
    )
    .await;
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, head, json)
}

pub fn header_value(headers: &str, name: &str) -> Option<String> {
    let prefix = format!("{}:", name.to_ascii_lowercase());
    headers
        .lines()
        .find(|line| line.to_ascii_lowercase().starts_with(&prefix))
        .map(|line| line.split_once(':').map_or("", |(_, v)| v).trim().to_string())
}

pub fn booking_form(connect_method: &str) -> serde_json::Value {
    serde_json::json!({
        "issue": "puppy-out-of-control",
        "issueOther": "",
        "duration": "1-6-months",
        "tried": ["online-videos"],
        "impact": ["thought-about-rehoming"],
        "dogName": "Pixel",
        "dogBreed": "Border Collie",
        "dogAge": "under-6-months",
        "dogDuration": "less-than-3-months",
        "dogSource": "breeder",
        "goals": ["calm-walks"],
        "connectMethod": connect_method,
        "contactName": "Sam Tremblay",
        "contactEmail": "sam@example.com",
        "contactPhone": "514-555-0100",
        "contactBestTime": "",
        "contactNotes": ""
    })
}

pub fn program_form(sessions: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "dogName": "Nova",
        "dogBreed": "Labrador",
        "problems": ["leash-pulling"],
        "preferredDay": "Saturday",
        "preferredTimeSlot": "Morning (9am-12pm)",
        "sessionsCount": sessions,
        "ownerName": "Alex Roy",
        "ownerEmail": "alex@example.com",
        "ownerPhone": "438-555-0199"
    })
}
