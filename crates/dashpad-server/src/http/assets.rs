//! The dashboard UI, embedded in the binary and served as-is. All
//! interactivity (tabs, forms, search, filters, markdown rendering) runs
//! client-side against `/api/data`.

use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse, Response};

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const APP_JS: &str = include_str!("../../assets/app.js");
const APP_CSS: &str = include_str!("../../assets/app.css");

pub(crate) async fn index_handler() -> Response {
    Html(INDEX_HTML).into_response()
}

pub(crate) async fn app_js_handler() -> Response {
    ([(CONTENT_TYPE, "application/javascript; charset=utf-8")], APP_JS).into_response()
}

pub(crate) async fn app_css_handler() -> Response {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], APP_CSS).into_response()
}
