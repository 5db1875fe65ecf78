#![forbid(unsafe_code)]

use async_trait::async_trait;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use dashpad_model::{Essay, Idea, IdeationItem, QuickLink, ResearchReport};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod hooks;
mod http;
mod ingest;
mod store;

pub const CRATE_NAME: &str = "dashpad-server";

/// Storage-layer error: an opaque message plus, where available, the
/// underlying error text.
#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for StoreError {}

pub use auth::Authenticator;
pub use config::{validate_startup_config, ApiConfig, PersistConfig, RemoteRepoConfig};
pub use hooks::{GitPostCommitHook, NoopHook, PostCommitHook};
pub use ingest::{IngestPersistence, RemoteContentsClient};
pub use store::fake::FakeStore;
pub use store::local::LocalFsStore;

/// The dashboard's document store: one collection per category, records
/// newest-first.
///
/// `append_*` is a read-modify-write over the backing file with no lock;
/// two overlapping appends race and the later write wins. The trait is the
/// seam a locked or transactional backend would plug into.
#[async_trait]
pub trait DashboardStore: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str;

    async fn load_links(&self) -> Result<Vec<QuickLink>, StoreError>;
    async fn load_ideas(&self) -> Result<Vec<Idea>, StoreError>;
    async fn load_essays(&self) -> Result<Vec<Essay>, StoreError>;
    async fn load_reports(&self) -> Result<Vec<ResearchReport>, StoreError>;
    async fn load_ideation(&self) -> Result<Vec<IdeationItem>, StoreError>;

    async fn append_idea(&self, idea: Idea) -> Result<(), StoreError>;
    async fn append_essay(&self, essay: Essay) -> Result<(), StoreError>;
    async fn append_report(&self, report: ResearchReport) -> Result<(), StoreError>;
    async fn append_ideation(&self, item: IdeationItem) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DashboardStore>,
    pub auth: Authenticator,
    pub api: ApiConfig,
    pub ingest: Arc<IngestPersistence>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn DashboardStore>, auth: Authenticator, ingest: IngestPersistence) -> Self {
        Self::with_config(store, auth, ingest, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(
        store: Arc<dyn DashboardStore>,
        auth: Authenticator,
        ingest: IngestPersistence,
        api: ApiConfig,
    ) -> Self {
        Self {
            store,
            auth,
            api,
            ingest: Arc::new(ingest),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::assets::index_handler))
        .route("/assets/app.js", get(http::assets::app_js_handler))
        .route("/assets/app.css", get(http::assets::app_css_handler))
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/api/data", get(http::handlers::data_handler))
        .route("/api/ideas", post(http::handlers::post_idea_handler))
        .route("/api/essays", post(http::handlers::post_essay_handler))
        .route("/api/ideation", post(http::handlers::post_ideation_handler))
        .route(
            "/api/webhook/research",
            post(http::handlers::webhook_research_handler),
        )
        .route(
            "/api/webhook/idea",
            post(http::handlers::webhook_idea_handler),
        )
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
