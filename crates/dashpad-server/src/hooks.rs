use crate::StoreError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Best-effort side step after a successful local write. Callers spawn it
/// and log the outcome; a hook failure never reaches the HTTP response.
#[async_trait]
pub trait PostCommitHook: Send + Sync + 'static {
    async fn record_committed(&self, file: &Path, message: &str) -> Result<(), StoreError>;
}

pub struct NoopHook;

#[async_trait]
impl PostCommitHook for NoopHook {
    async fn record_committed(&self, _file: &Path, _message: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Stages, commits, and pushes the rewritten collection file with the
/// bot identity the dashboard's history uses.
pub struct GitPostCommitHook {
    repo_dir: PathBuf,
}

impl GitPostCommitHook {
    #[must_use]
    pub fn new(repo_dir: PathBuf) -> Self {
        Self { repo_dir }
    }

    async fn git(&self, args: &[&str]) -> Result<(), StoreError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .await
            .map_err(|e| StoreError(format!("git {} failed to start: {e}", args.join(" "))))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StoreError(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PostCommitHook for GitPostCommitHook {
    async fn record_committed(&self, file: &Path, message: &str) -> Result<(), StoreError> {
        let file = file.to_string_lossy();
        self.git(&["config", "user.name", "Research Bot"]).await?;
        self.git(&["config", "user.email", "bot@dashpad.dev"])
            .await?;
        self.git(&["add", file.as_ref()]).await?;
        self.git(&["commit", "-m", message]).await?;
        self.git(&["push"]).await?;
        Ok(())
    }
}
