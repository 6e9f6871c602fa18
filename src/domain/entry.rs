use serde::{Deserialize, Serialize};

/// One posting exposed by a feed source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
}

impl Entry {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// Entries of one fetched feed, plus whether the parser considered the
/// document sound. Sources flagged as not well formed are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFeed {
    pub entries: Vec<Entry>,
    pub well_formed: bool,
}

impl ParsedFeed {
    pub fn well_formed(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            well_formed: true,
        }
    }

    pub fn malformed(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            well_formed: false,
        }
    }
}
