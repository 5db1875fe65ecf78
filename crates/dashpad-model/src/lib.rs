#![forbid(unsafe_code)]
//! Dashpad record model SSOT.
//!
//! Every collection the dashboard serves is a flat sequence of one of the
//! record types here, stored newest-first. Ids and timestamps are minted at
//! creation and never change.

mod category;
mod record;

pub use category::{Category, ALL_CATEGORIES};
pub use record::{
    mint_id, mint_timestamp, Essay, EssayStatus, Idea, IdeaCategory, IdeationItem, ParseError,
    Priority, QuickLink, QuickLinksFile, ResearchReport,
};

pub const CRATE_NAME: &str = "dashpad-model";
