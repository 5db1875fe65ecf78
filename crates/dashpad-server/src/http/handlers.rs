use crate::http::response::{error_response, failure_response};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dashpad_model::{Essay, Idea, IdeaCategory, IdeationItem, ResearchReport};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

pub(crate) async fn healthz_handler() -> Response {
    Json(json!({ "ok": true })).into_response()
}

/// Assemble all five collections for the UI's initial load.
///
/// Any single failure blanks the whole payload to empty arrays, status
/// 200. Partial success is not supported; the UI always gets all five
/// fields.
pub(crate) async fn data_handler(State(state): State<AppState>) -> Response {
    let (links, ideas, essays, reports, ideation) = tokio::join!(
        state.store.load_links(),
        state.store.load_ideas(),
        state.store.load_essays(),
        state.store.load_reports(),
        state.store.load_ideation(),
    );
    match (links, ideas, essays, reports, ideation) {
        (Ok(links), Ok(ideas), Ok(essays), Ok(reports), Ok(ideation)) => Json(json!({
            "links": links,
            "ideas": ideas,
            "essays": essays,
            "reports": reports,
            "ideation": ideation,
        }))
        .into_response(),
        (links, ideas, essays, reports, ideation) => {
            for err in [
                links.err(),
                ideas.err(),
                essays.err(),
                reports.err(),
                ideation.err(),
            ]
            .into_iter()
            .flatten()
            {
                warn!("data load degraded to empty: {err}");
            }
            Json(json!({
                "links": [],
                "ideas": [],
                "essays": [],
                "reports": [],
                "ideation": [],
            }))
            .into_response()
        }
    }
}

fn append_result(kind: &str, result: Result<(), crate::StoreError>) -> Response {
    match result {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => {
            error!("{kind} append failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false })),
            )
                .into_response()
        }
    }
}

pub(crate) async fn post_idea_handler(
    State(state): State<AppState>,
    Json(idea): Json<Idea>,
) -> Response {
    append_result("idea", state.store.append_idea(idea).await)
}

pub(crate) async fn post_essay_handler(
    State(state): State<AppState>,
    Json(essay): Json<Essay>,
) -> Response {
    append_result("essay", state.store.append_essay(essay).await)
}

pub(crate) async fn post_ideation_handler(
    State(state): State<AppState>,
    Json(item): Json<IdeationItem>,
) -> Response {
    append_result("ideation", state.store.append_ideation(item).await)
}

#[derive(Deserialize)]
pub(crate) struct ReportSubmission {
    title: Option<String>,
    content: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    secret: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct IdeaSubmission {
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    secret: Option<String>,
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

/// Ingest webhook for the report bot. Secret first, fields second, and no
/// storage is touched until both pass.
pub(crate) async fn webhook_research_handler(
    State(state): State<AppState>,
    Json(submission): Json<ReportSubmission>,
) -> Response {
    if !state.auth.verify(submission.secret.as_deref()) {
        return error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let (Some(title), Some(content)) = (present(submission.title), present(submission.content))
    else {
        return error_response(StatusCode::BAD_REQUEST, "Missing title or content");
    };

    let report = ResearchReport::new(title, content, submission.tags);
    match state.ingest.persist_report(&state.store, &report).await {
        Ok(commit) => {
            let mut body = json!({
                "success": true,
                "message": "Research report added",
                "report": report,
            });
            if let Some(commit) = commit {
                body["commit"] = json!(commit);
            }
            Json(body).into_response()
        }
        Err(e) => {
            error!("research ingest failed: {e}");
            failure_response("Failed to save research report", &e.0)
        }
    }
}

/// Idea variant of the ingest webhook. Only the title is required; an
/// absent category falls back to the default.
pub(crate) async fn webhook_idea_handler(
    State(state): State<AppState>,
    Json(submission): Json<IdeaSubmission>,
) -> Response {
    if !state.auth.verify(submission.secret.as_deref()) {
        return error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let Some(title) = present(submission.title) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing title");
    };
    let category = match submission.category.as_deref() {
        None | Some("") => IdeaCategory::default(),
        Some(raw) => match IdeaCategory::parse(raw) {
            Ok(category) => category,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        },
    };

    let idea = Idea::new(
        title,
        category,
        submission.content.unwrap_or_default(),
        submission.tags,
    );
    match state.ingest.persist_idea(&state.store, &idea).await {
        Ok(commit) => {
            let mut body = json!({
                "success": true,
                "message": "Idea added",
                "idea": idea,
            });
            if let Some(commit) = commit {
                body["commit"] = json!(commit);
            }
            Json(body).into_response()
        }
        Err(e) => {
            error!("idea ingest failed: {e}");
            failure_response("Failed to save idea", &e.0)
        }
    }
}
