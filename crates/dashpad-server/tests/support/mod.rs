#![allow(dead_code)]

use axum::Router;
use dashpad_server::{
    AppState, Authenticator, IngestPersistence, LocalFsStore, NoopHook, PostCommitHook,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub async fn spawn_app(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    addr
}

async fn send_request(
    addr: SocketAddr,
    method: &str,
    path: &str,
    body: Option<&Value>,
) -> (u16, Value) {
    let mut stream = TcpStream::connect(addr).await.expect("connect server");
    let payload = body.map(Value::to_string).unwrap_or_default();
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if body.is_some() {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", payload.len()));
    }
    req.push_str("\r\n");
    req.push_str(&payload);
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .expect("read response");
    let response = String::from_utf8_lossy(&response);
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    let parsed = serde_json::from_str(body).unwrap_or(Value::Null);
    (status, parsed)
}

pub async fn get_json(addr: SocketAddr, path: &str) -> (u16, Value) {
    send_request(addr, "GET", path, None).await
}

pub async fn post_json(addr: SocketAddr, path: &str, body: &Value) -> (u16, Value) {
    send_request(addr, "POST", path, Some(body)).await
}

pub fn seed_links() -> Value {
    json!({
        "quickLinks": [
            {"id": "1", "title": "Mail", "url": "https://mail.example.com", "icon": "inbox", "featured": true},
            {"id": "2", "title": "Calendar", "url": "https://cal.example.com", "icon": "calendar", "featured": false}
        ]
    })
}

pub fn seed_ideas() -> Value {
    json!([
        {"id": "101", "title": "Newer idea", "category": "Business", "content": "first in file",
         "timestamp": "2025-02-01T10:00:00.000Z", "tags": ["biz"]},
        {"id": "100", "title": "Older idea", "category": "Trading/ML", "content": "second in file",
         "timestamp": "2025-01-01T10:00:00.000Z", "tags": []}
    ])
}

pub fn seed_essays() -> Value {
    json!([
        {"id": "200", "title": "Draft essay", "content": "text", "status": "draft",
         "timestamp": "2025-01-05T09:00:00.000Z", "tags": []}
    ])
}

pub fn seed_reports() -> Value {
    json!([
        {"id": "300", "title": "Existing report", "content": "## Summary\nstable",
         "timestamp": "2025-01-03T08:00:00.000Z", "tags": ["research"]}
    ])
}

pub fn seed_ideation() -> Value {
    json!([
        {"id": "400", "title": "Project", "description": "desc", "priority": "high",
         "nextSteps": ["ship"], "linkedIdeas": [], "timestamp": "2025-01-02T07:00:00.000Z"}
    ])
}

/// Write all five well-formed collection files into `dir`.
pub fn seed_data_dir(dir: &Path) {
    write_collection(dir, "links.json", &seed_links());
    write_collection(dir, "ideas.json", &seed_ideas());
    write_collection(dir, "essays.json", &seed_essays());
    write_collection(dir, "research.json", &seed_reports());
    write_collection(dir, "ideation.json", &seed_ideation());
}

pub fn write_collection(dir: &Path, file: &str, value: &Value) {
    std::fs::write(
        dir.join(file),
        serde_json::to_vec_pretty(value).expect("serialize fixture"),
    )
    .expect("write fixture");
}

pub fn read_collection(dir: &Path, file: &str) -> Value {
    let bytes = std::fs::read(dir.join(file)).expect("read fixture");
    serde_json::from_slice(&bytes).expect("parse fixture")
}

/// AppState over a local filesystem store with the webhook's local
/// persistence strategy and no git hook.
pub fn local_state(data_dir: &Path, secret: Option<&str>) -> AppState {
    let hook: Arc<dyn PostCommitHook> = Arc::new(NoopHook);
    AppState::new(
        Arc::new(LocalFsStore::new(data_dir.to_path_buf())),
        Authenticator::new(secret.map(str::to_string)),
        IngestPersistence::Local {
            data_dir: data_dir.to_path_buf(),
            hook,
        },
    )
}
