// SPDX-License-Identifier: Apache-2.0

use crate::{DashboardStore, StoreError};
use async_trait::async_trait;
use dashpad_model::{Essay, Idea, IdeationItem, QuickLink, ResearchReport};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// In-memory store for tests, with failure toggles.
pub struct FakeStore {
    pub links: Mutex<Vec<QuickLink>>,
    pub ideas: Mutex<Vec<Idea>>,
    pub essays: Mutex<Vec<Essay>>,
    pub reports: Mutex<Vec<ResearchReport>>,
    pub ideation: Mutex<Vec<IdeationItem>>,
    pub fail_loads: bool,
    pub fail_appends: bool,
    pub append_calls: AtomicU64,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self {
            links: Mutex::new(Vec::new()),
            ideas: Mutex::new(Vec::new()),
            essays: Mutex::new(Vec::new()),
            reports: Mutex::new(Vec::new()),
            ideation: Mutex::new(Vec::new()),
            fail_loads: false,
            fail_appends: false,
            append_calls: AtomicU64::new(0),
        }
    }
}

impl FakeStore {
    fn check_load(&self) -> Result<(), StoreError> {
        if self.fail_loads {
            return Err(StoreError("load failure injected".to_string()));
        }
        Ok(())
    }

    fn check_append(&self) -> Result<(), StoreError> {
        self.append_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_appends {
            return Err(StoreError("append failure injected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DashboardStore for FakeStore {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn load_links(&self) -> Result<Vec<QuickLink>, StoreError> {
        self.check_load()?;
        Ok(self.links.lock().await.clone())
    }

    async fn load_ideas(&self) -> Result<Vec<Idea>, StoreError> {
        self.check_load()?;
        Ok(self.ideas.lock().await.clone())
    }

    async fn load_essays(&self) -> Result<Vec<Essay>, StoreError> {
        self.check_load()?;
        Ok(self.essays.lock().await.clone())
    }

    async fn load_reports(&self) -> Result<Vec<ResearchReport>, StoreError> {
        self.check_load()?;
        Ok(self.reports.lock().await.clone())
    }

    async fn load_ideation(&self) -> Result<Vec<IdeationItem>, StoreError> {
        self.check_load()?;
        Ok(self.ideation.lock().await.clone())
    }

    async fn append_idea(&self, idea: Idea) -> Result<(), StoreError> {
        self.check_append()?;
        self.ideas.lock().await.insert(0, idea);
        Ok(())
    }

    async fn append_essay(&self, essay: Essay) -> Result<(), StoreError> {
        self.check_append()?;
        self.essays.lock().await.insert(0, essay);
        Ok(())
    }

    async fn append_report(&self, report: ResearchReport) -> Result<(), StoreError> {
        self.check_append()?;
        self.reports.lock().await.insert(0, report);
        Ok(())
    }

    async fn append_ideation(&self, item: IdeationItem) -> Result<(), StoreError> {
        self.check_append()?;
        self.ideation.lock().await.insert(0, item);
        Ok(())
    }
}
