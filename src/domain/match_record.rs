use serde::{Deserialize, Serialize};

use super::Entry;

/// A posting that passed the keyword predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub title: String,
    pub link: String,
}

impl MatchRecord {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: normalize_whitespace(&title.into()),
            link: normalize_link(&link.into()),
        }
    }

    pub fn from_entry(entry: &Entry) -> Self {
        Self::new(entry.title.as_str(), entry.link.as_str())
    }
}

/// Strip every whitespace character from a link. URLs cannot contain raw
/// whitespace, and the digest renders each link on a single line.
pub fn normalize_link(link: &str) -> String {
    link.split_whitespace().collect()
}

/// Collapse runs of whitespace (including newlines) into single spaces so
/// every record renders on exactly one title line.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
