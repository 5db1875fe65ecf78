// SPDX-License-Identifier: Apache-2.0

use crate::{DashboardStore, StoreError};
use async_trait::async_trait;
use dashpad_model::{
    Category, Essay, Idea, IdeationItem, QuickLink, QuickLinksFile, ResearchReport,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Production backend: one JSON file per category under `data_dir`.
pub struct LocalFsStore {
    data_dir: PathBuf,
}

impl LocalFsStore {
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    #[must_use]
    pub fn category_path(&self, category: Category) -> PathBuf {
        self.data_dir.join(category.file_name())
    }

    async fn read_collection<T: DeserializeOwned>(
        &self,
        category: Category,
    ) -> Result<Vec<T>, StoreError> {
        let path = self.category_path(category);
        let bytes = read_bytes(&path, category).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| StoreError(format!("{category} parse failed: {e}")))
    }

    /// Prepend one record and rewrite the whole file.
    ///
    /// Not atomic: the read and the write are separate steps with no lock
    /// between them, so of two overlapping appends the later write wins.
    async fn prepend<T>(&self, category: Category, record: T) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned + Send,
    {
        let mut records: Vec<T> = self.read_collection(category).await?;
        records.insert(0, record);
        let bytes = serde_json::to_vec_pretty(&records)
            .map_err(|e| StoreError(format!("{category} serialize failed: {e}")))?;
        fs::write(self.category_path(category), bytes)
            .await
            .map_err(|e| StoreError(format!("{category} write failed: {e}")))
    }
}

async fn read_bytes(path: &Path, category: Category) -> Result<Vec<u8>, StoreError> {
    fs::read(path)
        .await
        .map_err(|e| StoreError(format!("{category} read failed: {e}")))
}

#[async_trait]
impl DashboardStore for LocalFsStore {
    fn backend_tag(&self) -> &'static str {
        "localfs"
    }

    async fn load_links(&self) -> Result<Vec<QuickLink>, StoreError> {
        let path = self.category_path(Category::Links);
        let bytes = read_bytes(&path, Category::Links).await?;
        let file: QuickLinksFile = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError(format!("links parse failed: {e}")))?;
        Ok(file.quick_links)
    }

    async fn load_ideas(&self) -> Result<Vec<Idea>, StoreError> {
        self.read_collection(Category::Ideas).await
    }

    async fn load_essays(&self) -> Result<Vec<Essay>, StoreError> {
        self.read_collection(Category::Essays).await
    }

    async fn load_reports(&self) -> Result<Vec<ResearchReport>, StoreError> {
        self.read_collection(Category::Research).await
    }

    async fn load_ideation(&self) -> Result<Vec<IdeationItem>, StoreError> {
        self.read_collection(Category::Ideation).await
    }

    async fn append_idea(&self, idea: Idea) -> Result<(), StoreError> {
        self.prepend(Category::Ideas, idea).await
    }

    async fn append_essay(&self, essay: Essay) -> Result<(), StoreError> {
        self.prepend(Category::Essays, essay).await
    }

    async fn append_report(&self, report: ResearchReport) -> Result<(), StoreError> {
        self.prepend(Category::Research, report).await
    }

    async fn append_ideation(&self, item: IdeationItem) -> Result<(), StoreError> {
        self.prepend(Category::Ideation, item).await
    }
}
