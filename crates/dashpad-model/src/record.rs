// SPDX-License-Identifier: Apache-2.0

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Mint a record id: current Unix time in milliseconds as a decimal string.
///
/// Uniqueness is only probabilistic; two records minted within the same
/// millisecond collide. That matches the stored data this model reads.
#[must_use]
pub fn mint_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// Mint a creation timestamp as an ISO-8601 string with millisecond
/// precision and a trailing `Z`.
#[must_use]
pub fn mint_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    UnknownCategory(String),
    UnknownStatus(String),
    UnknownPriority(String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCategory(v) => write!(f, "unknown idea category: {v}"),
            Self::UnknownStatus(v) => write!(f, "unknown essay status: {v}"),
            Self::UnknownPriority(v) => write!(f, "unknown priority: {v}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Closed category set for ideas. Wire spellings are fixed; `Trading/ML`
/// carries the slash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IdeaCategory {
    Business,
    Training,
    Learning,
    #[serde(rename = "Trading/ML")]
    TradingMl,
    #[default]
    Personal,
}

impl IdeaCategory {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        match input {
            "Business" => Ok(Self::Business),
            "Training" => Ok(Self::Training),
            "Learning" => Ok(Self::Learning),
            "Trading/ML" => Ok(Self::TradingMl),
            "Personal" => Ok(Self::Personal),
            other => Err(ParseError::UnknownCategory(other.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Training => "Training",
            Self::Learning => "Learning",
            Self::TradingMl => "Trading/ML",
            Self::Personal => "Personal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EssayStatus {
    Idea,
    Draft,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A pinned link on the dashboard's front tab. Read-only from the UI; no
/// write endpoint exists for this collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuickLink {
    pub id: String,
    pub title: String,
    pub url: String,
    pub icon: String,
    pub featured: bool,
}

/// The links file wraps its sequence in an object; every other collection
/// file holds a bare array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickLinksFile {
    #[serde(rename = "quickLinks", default)]
    pub quick_links: Vec<QuickLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Idea {
    pub id: String,
    pub title: String,
    pub category: IdeaCategory,
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Idea {
    /// Build a new idea with a freshly minted id and timestamp.
    #[must_use]
    pub fn new(title: String, category: IdeaCategory, content: String, tags: Vec<String>) -> Self {
        Self {
            id: mint_id(),
            title,
            category,
            content,
            timestamp: mint_timestamp(),
            tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Essay {
    pub id: String,
    pub title: String,
    pub content: String,
    pub status: EssayStatus,
    pub timestamp: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A long-form markdown report, written by the user or pushed in by the
/// report bot through the ingest webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResearchReport {
    pub id: String,
    pub title: String,
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ResearchReport {
    /// Build a new report with a freshly minted id and timestamp.
    #[must_use]
    pub fn new(title: String, content: String, tags: Vec<String>) -> Self {
        Self {
            id: mint_id(),
            title,
            content,
            timestamp: mint_timestamp(),
            tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IdeationItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub next_steps: Vec<String>,
    /// Ids of related ideas. Nothing reads this yet; kept because the
    /// stored files carry it.
    pub linked_ideas: Vec<String>,
    pub timestamp: String,
}
