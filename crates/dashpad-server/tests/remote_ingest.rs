//! Remote persistence strategy: the webhook commits through a hosted
//! contents API carrying the fetched revision marker. These tests stand up
//! a small fake of that API on a local listener.

mod support;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dashpad_server::{
    build_router, AppState, Authenticator, FakeStore, IngestPersistence, RemoteContentsClient,
    RemoteRepoConfig,
};
use serde_json::{json, Value};
use std::sync::Arc;
use support::{post_json, spawn_app};
use tokio::sync::Mutex;

struct FakeRepo {
    /// Base64 payload and revision marker of the tracked file.
    file: Mutex<Option<(String, String)>>,
    /// Respond to every update as if the marker went stale.
    conflict_on_update: bool,
    revision: Mutex<u64>,
    last_path: Mutex<Option<String>>,
}

fn fake_repo(initial: Option<Value>, conflict_on_update: bool) -> Arc<FakeRepo> {
    let file = initial.map(|v| {
        let bytes = serde_json::to_vec_pretty(&v).expect("serialize fixture");
        (BASE64.encode(bytes), "rev-0".to_string())
    });
    Arc::new(FakeRepo {
        file: Mutex::new(file),
        conflict_on_update,
        revision: Mutex::new(0),
        last_path: Mutex::new(None),
    })
}

impl FakeRepo {
    async fn decoded_records(&self) -> Value {
        let file = self.file.lock().await;
        let (content, _) = file.as_ref().expect("file must exist");
        let bytes = BASE64.decode(content).expect("decode stored content");
        serde_json::from_slice(&bytes).expect("parse stored content")
    }
}

async fn contents_get(
    State(repo): State<Arc<FakeRepo>>,
    Path((_owner, _name, path)): Path<(String, String, String)>,
) -> Response {
    *repo.last_path.lock().await = Some(path);
    match repo.file.lock().await.as_ref() {
        Some((content, sha)) => Json(json!({ "content": content, "sha": sha })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Not Found" })),
        )
            .into_response(),
    }
}

async fn contents_put(
    State(repo): State<Arc<FakeRepo>>,
    Path((_owner, _name, path)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    *repo.last_path.lock().await = Some(path);
    let mut file = repo.file.lock().await;
    let presented = body.get("sha").and_then(Value::as_str);
    let current = file.as_ref().map(|(_, sha)| sha.as_str());
    if repo.conflict_on_update || current != presented {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "is at a different revision" })),
        )
            .into_response();
    }
    let content = body["content"].as_str().expect("content field").to_string();
    let mut revision = repo.revision.lock().await;
    *revision += 1;
    let sha = format!("rev-{revision}");
    let commit = format!("commit-{revision}");
    *file = Some((content, sha.clone()));
    Json(json!({ "content": { "sha": sha }, "commit": { "sha": commit } })).into_response()
}

async fn spawn_fake_repo(repo: Arc<FakeRepo>) -> String {
    let router = Router::new()
        .route(
            "/repos/{owner}/{name}/contents/{*path}",
            get(contents_get).put(contents_put),
        )
        .with_state(repo);
    let addr = spawn_app(router).await;
    format!("http://{addr}")
}

fn remote_state(api_base: String, secret: &str) -> AppState {
    let client = RemoteContentsClient::new(RemoteRepoConfig {
        api_base,
        repo: "me/dashboard".to_string(),
        token: "test-token".to_string(),
        ..RemoteRepoConfig::default()
    })
    .expect("build contents client");
    AppState::new(
        Arc::new(FakeStore::default()),
        Authenticator::new(Some(secret.to_string())),
        IngestPersistence::Remote { client },
    )
}

#[tokio::test]
async fn remote_ingest_prepends_and_returns_commit_id() {
    let repo = fake_repo(
        Some(json!([
            {"id": "300", "title": "Existing", "content": "old",
             "timestamp": "2025-01-01T00:00:00.000Z", "tags": []}
        ])),
        false,
    );
    let api_base = spawn_fake_repo(repo.clone()).await;
    let addr = spawn_app(build_router(remote_state(api_base, "s"))).await;

    let (status, body) = post_json(
        addr,
        "/api/webhook/research",
        &json!({ "title": "Fresh report", "content": "## New", "secret": "s" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["commit"], json!("commit-1"));

    let stored = repo.decoded_records().await;
    let stored = stored.as_array().expect("stored array");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["title"], json!("Fresh report"));
    assert_eq!(stored[1]["id"], json!("300"));
    assert_eq!(
        repo.last_path.lock().await.as_deref(),
        Some("data/research.json")
    );
}

#[tokio::test]
async fn remote_ingest_creates_missing_file() {
    let repo = fake_repo(None, false);
    let api_base = spawn_fake_repo(repo.clone()).await;
    let addr = spawn_app(build_router(remote_state(api_base, "s"))).await;

    let (status, body) = post_json(
        addr,
        "/api/webhook/research",
        &json!({ "title": "First ever", "content": "## New", "secret": "s" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["commit"], json!("commit-1"));

    let stored = repo.decoded_records().await;
    assert_eq!(stored.as_array().expect("stored array").len(), 1);
}

#[tokio::test]
async fn stale_revision_marker_fails_without_retry() {
    let repo = fake_repo(Some(json!([])), true);
    let api_base = spawn_fake_repo(repo.clone()).await;
    let addr = spawn_app(build_router(remote_state(api_base, "s"))).await;

    let (status, body) = post_json(
        addr,
        "/api/webhook/research",
        &json!({ "title": "T", "content": "C", "secret": "s" }),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], json!("Failed to save research report"));
    assert!(body["details"]
        .as_str()
        .expect("details text")
        .contains("409"));
}

#[tokio::test]
async fn remote_idea_ingest_targets_ideas_path() {
    let repo = fake_repo(Some(json!([])), false);
    let api_base = spawn_fake_repo(repo.clone()).await;
    let addr = spawn_app(build_router(remote_state(api_base, "s"))).await;

    let (status, body) = post_json(
        addr,
        "/api/webhook/idea",
        &json!({ "title": "Remote idea", "category": "Learning", "secret": "s" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["commit"], json!("commit-1"));
    let stored = repo.decoded_records().await;
    assert_eq!(stored[0]["category"], json!("Learning"));
    assert_eq!(
        repo.last_path.lock().await.as_deref(),
        Some("data/ideas.json")
    );
}

#[tokio::test]
async fn remote_secret_check_precedes_any_repo_call() {
    let repo = fake_repo(Some(json!([])), false);
    let api_base = spawn_fake_repo(repo.clone()).await;
    let addr = spawn_app(build_router(remote_state(api_base, "s"))).await;

    let (status, _) = post_json(
        addr,
        "/api/webhook/research",
        &json!({ "title": "T", "content": "C", "secret": "wrong" }),
    )
    .await;
    assert_eq!(status, 401);
    assert!(repo.last_path.lock().await.is_none());
}
