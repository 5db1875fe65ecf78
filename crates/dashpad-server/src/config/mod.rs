use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            // Generated reports run to tens of kilobytes of markdown.
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Remote contents-API target for the ingest webhook's remote strategy.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteRepoConfig {
    pub api_base: String,
    /// `owner/repo`.
    pub repo: String,
    pub branch: String,
    pub research_path: String,
    pub ideas_path: String,
    #[serde(skip_serializing)]
    pub token: String,
}

impl Default for RemoteRepoConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            repo: String::new(),
            branch: "main".to_string(),
            research_path: "data/research.json".to_string(),
            ideas_path: "data/ideas.json".to_string(),
            token: String::new(),
        }
    }
}

/// How the ingest webhook persists a new record. One configurable choice,
/// never both at once.
#[derive(Debug, Clone)]
pub enum PersistConfig {
    Local { git_sync: bool, repo_dir: PathBuf },
    Remote(RemoteRepoConfig),
}

pub fn validate_startup_config(api: &ApiConfig, persist: &PersistConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max body bytes must be > 0".to_string());
    }
    match persist {
        PersistConfig::Local { .. } => Ok(()),
        PersistConfig::Remote(remote) => {
            if remote.token.trim().is_empty() {
                return Err("remote persistence requires DASHPAD_REMOTE_TOKEN".to_string());
            }
            let (owner, name) = remote
                .repo
                .split_once('/')
                .ok_or_else(|| "DASHPAD_REMOTE_REPO must be owner/repo".to_string())?;
            if owner.is_empty() || name.is_empty() {
                return Err("DASHPAD_REMOTE_REPO must be owner/repo".to_string());
            }
            if remote.branch.trim().is_empty() {
                return Err("DASHPAD_REMOTE_BRANCH must not be empty".to_string());
            }
            Ok(())
        }
    }
}
