#![forbid(unsafe_code)]

use dashpad_server::{
    build_router, validate_startup_config, ApiConfig, AppState, Authenticator, DashboardStore,
    GitPostCommitHook, IngestPersistence, LocalFsStore, NoopHook, PersistConfig, PostCommitHook,
    RemoteContentsClient, RemoteRepoConfig,
};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("DASHPAD_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn parse_persist_config() -> Result<PersistConfig, String> {
    match env_string("DASHPAD_PERSIST", "local").as_str() {
        "local" => Ok(PersistConfig::Local {
            git_sync: env_bool("DASHPAD_GIT_SYNC", false),
            repo_dir: PathBuf::from(env_string("DASHPAD_REPO_DIR", ".")),
        }),
        "remote" => Ok(PersistConfig::Remote(RemoteRepoConfig {
            api_base: env_string("DASHPAD_REMOTE_API_BASE", "https://api.github.com"),
            repo: env_string("DASHPAD_REMOTE_REPO", ""),
            branch: env_string("DASHPAD_REMOTE_BRANCH", "main"),
            research_path: env_string("DASHPAD_REMOTE_PATH", "data/research.json"),
            ideas_path: env_string("DASHPAD_REMOTE_IDEAS_PATH", "data/ideas.json"),
            token: env_string("DASHPAD_REMOTE_TOKEN", ""),
        })),
        other => Err(format!(
            "invalid DASHPAD_PERSIST value {other}; use local or remote"
        )),
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env_string("DASHPAD_BIND", "0.0.0.0:8080");
    let data_dir = PathBuf::from(env_string("DASHPAD_DATA_DIR", "data"));
    let api = ApiConfig {
        max_body_bytes: env_usize("DASHPAD_MAX_BODY_BYTES", 1024 * 1024),
    };
    let persist = parse_persist_config()?;
    validate_startup_config(&api, &persist)?;

    let secret = env::var("DASHPAD_WEBHOOK_SECRET").ok();
    if secret.as_deref().is_none_or(str::is_empty) {
        warn!("DASHPAD_WEBHOOK_SECRET is not set; the ingest webhook will reject every call");
    }
    let auth = Authenticator::new(secret);

    let ingest = match persist {
        PersistConfig::Local { git_sync, repo_dir } => {
            let hook: Arc<dyn PostCommitHook> = if git_sync {
                Arc::new(GitPostCommitHook::new(repo_dir))
            } else {
                Arc::new(NoopHook)
            };
            IngestPersistence::Local {
                data_dir: data_dir.clone(),
                hook,
            }
        }
        PersistConfig::Remote(remote) => IngestPersistence::Remote {
            client: RemoteContentsClient::new(remote).map_err(|e| e.0)?,
        },
    };

    let store = Arc::new(LocalFsStore::new(data_dir));
    info!("store backend: {}", store.backend_tag());
    let state = AppState::with_config(store, auth, ingest, api);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!("dashpad-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
