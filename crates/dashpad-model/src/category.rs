// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

/// The five record collections, each backed by one JSON file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Links,
    Ideas,
    Essays,
    Research,
    Ideation,
}

pub const ALL_CATEGORIES: [Category; 5] = [
    Category::Links,
    Category::Ideas,
    Category::Essays,
    Category::Research,
    Category::Ideation,
];

impl Category {
    /// File name of the collection inside the data directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Links => "links.json",
            Self::Ideas => "ideas.json",
            Self::Essays => "essays.json",
            Self::Research => "research.json",
            Self::Ideation => "ideation.json",
        }
    }

    /// Field name the aggregator uses for this collection.
    #[must_use]
    pub fn response_field(self) -> &'static str {
        match self {
            Self::Links => "links",
            Self::Ideas => "ideas",
            Self::Essays => "essays",
            Self::Research => "reports",
            Self::Ideation => "ideation",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.response_field())
    }
}
