use chrono::{DateTime, Utc};

use super::MatchRecord;

const BULLET: &str = "• ";
const LINK_INDENT: &str = "  ";
const FOOTER_RULE: &str = "---";

/// The single message sent per run when matches exist.
#[derive(Debug, Clone)]
pub struct Digest<'a> {
    matches: &'a [MatchRecord],
    generated_at: DateTime<Utc>,
}

impl<'a> Digest<'a> {
    pub fn new(matches: &'a [MatchRecord], generated_at: DateTime<Utc>) -> Self {
        Self {
            matches,
            generated_at,
        }
    }

    pub fn subject(&self) -> String {
        format!("Job digest – {}", self.generated_at.format("%Y-%m-%d"))
    }

    /// Format:
    /// ```text
    /// Found 2 matching job postings:
    ///
    /// • {title}
    ///   {link}
    ///
    /// • {title}
    ///   {link}
    ///
    /// ---
    /// Generated on 2024-01-15 12:00 UTC
    /// ```
    pub fn body(&self) -> String {
        let blocks: Vec<String> = self
            .matches
            .iter()
            .map(|m| format!("{}{}\n{}{}", BULLET, m.title, LINK_INDENT, m.link))
            .collect();

        let mut body = format!("Found {} matching job postings:\n\n", self.matches.len());
        body.push_str(&blocks.join("\n\n"));
        body.push_str(&format!(
            "\n\n{}\nGenerated on {}",
            FOOTER_RULE,
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));
        body
    }

    /// Recover the (title, link) pairs from a rendered body, in order.
    pub fn parse_body(body: &str) -> Vec<MatchRecord> {
        let mut records = Vec::new();
        let mut pending_title: Option<&str> = None;

        for line in body.lines() {
            if line == FOOTER_RULE {
                break;
            }

            if let Some(title) = line.strip_prefix(BULLET) {
                pending_title = Some(title);
            } else if let Some(link) = line.strip_prefix(LINK_INDENT) {
                if let Some(title) = pending_title.take() {
                    records.push(MatchRecord::new(title, link));
                }
            }
        }

        records
    }
}
