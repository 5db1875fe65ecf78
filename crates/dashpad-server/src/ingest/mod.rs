// SPDX-License-Identifier: Apache-2.0

use crate::config::RemoteRepoConfig;
use crate::hooks::PostCommitHook;
use crate::{DashboardStore, StoreError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dashpad_model::{Category, Idea, ResearchReport};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// How the ingest webhook persists a record once it passes the secret and
/// field checks. One configured strategy per deployment.
pub enum IngestPersistence {
    /// Rewrite the local file through the store, then fire the best-effort
    /// post-commit hook.
    Local {
        data_dir: PathBuf,
        hook: Arc<dyn PostCommitHook>,
    },
    /// Commit the updated file through a hosted contents API, guarded by
    /// the fetched revision marker.
    Remote { client: RemoteContentsClient },
}

impl IngestPersistence {
    /// Persist a report; returns the commit id under the remote strategy.
    pub async fn persist_report(
        &self,
        store: &Arc<dyn DashboardStore>,
        report: &ResearchReport,
    ) -> Result<Option<String>, StoreError> {
        match self {
            Self::Local { data_dir, hook } => {
                store.append_report(report.clone()).await?;
                let message = format!("Add research report: {}", report.title);
                spawn_hook(hook, data_dir.join(Category::Research.file_name()), message);
                Ok(None)
            }
            Self::Remote { client } => {
                let path = client.research_path().to_string();
                let message = format!("Add research report: {}", report.title);
                let commit = client.prepend_and_commit(&path, report, &message).await?;
                Ok(Some(commit))
            }
        }
    }

    /// Persist an idea submitted through the webhook variant.
    pub async fn persist_idea(
        &self,
        store: &Arc<dyn DashboardStore>,
        idea: &Idea,
    ) -> Result<Option<String>, StoreError> {
        match self {
            Self::Local { data_dir, hook } => {
                store.append_idea(idea.clone()).await?;
                let message = format!("Add idea: {}", idea.title);
                spawn_hook(hook, data_dir.join(Category::Ideas.file_name()), message);
                Ok(None)
            }
            Self::Remote { client } => {
                let path = client.ideas_path().to_string();
                let message = format!("Add idea: {}", idea.title);
                let commit = client.prepend_and_commit(&path, idea, &message).await?;
                Ok(Some(commit))
            }
        }
    }
}

fn spawn_hook(hook: &Arc<dyn PostCommitHook>, file: PathBuf, message: String) {
    let hook = hook.clone();
    tokio::spawn(async move {
        match hook.record_committed(&file, &message).await {
            Ok(()) => info!("post-commit hook finished for {}", file.display()),
            // The local write already succeeded; the response is not ours
            // to change at this point.
            Err(e) => warn!("post-commit hook failed: {e}"),
        }
    });
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Deserialize)]
struct CommitInfo {
    sha: String,
}

#[derive(Deserialize)]
struct UpdateResponse {
    commit: CommitInfo,
}

/// Client for a GitHub-style contents API: fetch a file with its revision
/// marker, commit an update carrying that marker. A stale marker fails the
/// update; the caller re-fetches and retries manually if it cares to.
pub struct RemoteContentsClient {
    http: reqwest::Client,
    config: RemoteRepoConfig,
}

impl RemoteContentsClient {
    pub fn new(config: RemoteRepoConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("dashpad/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError(format!("http client build failed: {e}")))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn research_path(&self) -> &str {
        &self.config.research_path
    }

    #[must_use]
    pub fn ideas_path(&self) -> &str {
        &self.config.ideas_path
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.repo,
            path
        )
    }

    /// Fetch the current collection and its revision marker. A missing
    /// file is an empty collection with no marker (the update becomes a
    /// create).
    async fn fetch_collection<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<(Vec<T>, Option<String>), StoreError> {
        let response = self
            .http
            .get(self.contents_url(path))
            .query(&[("ref", self.config.branch.as_str())])
            .bearer_auth(&self.config.token)
            .header("accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| StoreError(format!("contents fetch failed: {e}")))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok((Vec::new(), None));
        }
        if !response.status().is_success() {
            return Err(StoreError(format!(
                "contents fetch failed: status {}",
                response.status()
            )));
        }
        let contents: ContentsResponse = response
            .json()
            .await
            .map_err(|e| StoreError(format!("contents response parse failed: {e}")))?;
        // The API wraps the base64 payload across lines.
        let packed: String = contents
            .content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = BASE64
            .decode(packed)
            .map_err(|e| StoreError(format!("contents decode failed: {e}")))?;
        let records: Vec<T> = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError(format!("contents parse failed: {e}")))?;
        Ok((records, Some(contents.sha)))
    }

    /// Prepend `record`, re-encode, and commit with the fetched marker.
    pub async fn prepend_and_commit<T>(
        &self,
        path: &str,
        record: &T,
        message: &str,
    ) -> Result<String, StoreError>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let (mut records, sha) = self.fetch_collection::<T>(path).await?;
        records.insert(0, record.clone());
        let bytes = serde_json::to_vec_pretty(&records)
            .map_err(|e| StoreError(format!("contents serialize failed: {e}")))?;

        let mut body = serde_json::json!({
            "message": message,
            "content": BASE64.encode(&bytes),
            "branch": self.config.branch,
        });
        if let Some(sha) = sha {
            body["sha"] = serde_json::Value::String(sha);
        }

        let response = self
            .http
            .put(self.contents_url(path))
            .bearer_auth(&self.config.token)
            .header("accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError(format!("contents update failed: {e}")))?;
        if !response.status().is_success() {
            // 409 here means the marker went stale under a concurrent
            // writer; there is no retry loop.
            return Err(StoreError(format!(
                "contents update failed: status {}",
                response.status()
            )));
        }
        let update: UpdateResponse = response
            .json()
            .await
            .map_err(|e| StoreError(format!("update response parse failed: {e}")))?;
        Ok(update.commit.sha)
    }
}
