use std::collections::HashSet;

use crate::domain::{normalize_link, MatchRecord};
use crate::errors::FeederError;
use crate::matching::KeywordPredicate;
use crate::sources::FeedSource;

/// A feed that could not be used this run.
#[derive(Debug)]
pub struct SourceFailure {
    pub url: String,
    pub error: FeederError,
}

/// Outcome of checking every configured feed once.
#[derive(Debug, Default)]
pub struct MatchReport {
    pub matches: Vec<MatchRecord>,
    pub failures: Vec<SourceFailure>,
    pub sources_checked: usize,
}

impl MatchReport {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

pub struct MatchService<S: FeedSource, P: KeywordPredicate> {
    source: S,
    predicate: P,
}

impl<S: FeedSource, P: KeywordPredicate> MatchService<S, P> {
    pub fn new(source: S, predicate: P) -> Self {
        Self { source, predicate }
    }

    /// Check every feed in order and collect matching postings, first seen
    /// first, with at most one record per link. A failing feed is recorded
    /// and skipped; it never affects the other feeds.
    pub fn find_matches(&self, feeds: &[String]) -> MatchReport {
        let total = feeds.len();
        let mut report = MatchReport::default();
        let mut seen_links: HashSet<String> = HashSet::new();

        tracing::info!(feeds = total, "Searching feeds");

        for (i, url) in feeds.iter().enumerate() {
            let position = i + 1;
            report.sources_checked += 1;

            let parsed = match self.source.fetch(url) {
                Ok(parsed) => parsed,
                Err(error) => {
                    tracing::warn!(position, total, url = %url, error = %error, "Feed fetch failed, skipping");
                    report.failures.push(SourceFailure {
                        url: url.clone(),
                        error,
                    });
                    continue;
                }
            };

            if !parsed.well_formed {
                tracing::warn!(position, total, url = %url, "Feed has parsing issues, skipping");
                report.failures.push(SourceFailure {
                    url: url.clone(),
                    error: FeederError::MalformedFeed(url.clone()),
                });
                continue;
            }

            tracing::debug!(position, total, url = %url, entries = parsed.entries.len(), "Feed fetched");

            for entry in &parsed.entries {
                // Dedup on the link as it will be reported
                let link = normalize_link(&entry.link);
                if seen_links.contains(&link) {
                    continue;
                }

                if self
                    .predicate
                    .matches_entry(&entry.title, entry.description.as_deref())
                {
                    tracing::info!(position, total, title = %entry.title, link = %entry.link, "Match found");
                    seen_links.insert(link);
                    report.matches.push(MatchRecord::from_entry(entry));
                }
            }
        }

        tracing::info!(
            matches = report.matches.len(),
            failed_feeds = report.failures.len(),
            "Feed search complete"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Entry, ParsedFeed};
    use crate::matching::JobProfilePredicate;
    use crate::sources::MockFeedSource;
    use mockall::predicate::eq;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn service(source: MockFeedSource) -> MatchService<MockFeedSource, JobProfilePredicate> {
        MatchService::new(source, JobProfilePredicate::new().unwrap())
    }

    #[test]
    fn test_only_matching_entries_returned() {
        let mut source = MockFeedSource::new();
        source.expect_fetch().with(eq("feed-1")).returning(|_| {
            Ok(ParsedFeed::well_formed(vec![
                Entry::new("Remote Junior Data Scientist", "a"),
                Entry::new("Senior Backend Engineer", "b"),
            ]))
        });

        let report = service(source).find_matches(&urls(&["feed-1"]));

        assert_eq!(
            report.matches,
            vec![MatchRecord::new("Remote Junior Data Scientist", "a")]
        );
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_duplicate_link_across_feeds_reported_once() {
        let mut source = MockFeedSource::new();
        source.expect_fetch().with(eq("feed-1")).returning(|_| {
            Ok(ParsedFeed::well_formed(vec![Entry::new(
                "Remote Data Engineer",
                "x",
            )]))
        });
        source.expect_fetch().with(eq("feed-2")).returning(|_| {
            Ok(ParsedFeed::well_formed(vec![Entry::new(
                "Remote Data Engineer (reposted)",
                "x",
            )]))
        });

        let report = service(source).find_matches(&urls(&["feed-1", "feed-2"]));

        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].link, "x");
        assert_eq!(report.matches[0].title, "Remote Data Engineer");
    }

    #[test]
    fn test_duplicate_link_within_feed_reported_once() {
        let mut source = MockFeedSource::new();
        source.expect_fetch().returning(|_| {
            Ok(ParsedFeed::well_formed(vec![
                Entry::new("Remote Quant Analyst", "q"),
                Entry::new("Remote Quant Analyst", "q"),
            ]))
        });

        let report = service(source).find_matches(&urls(&["feed-1"]));

        assert_eq!(report.matches.len(), 1);
    }

    #[test]
    fn test_links_differing_only_in_whitespace_reported_once() {
        let mut source = MockFeedSource::new();
        source.expect_fetch().returning(|url| {
            let link = if url == "feed-1" {
                "https://x.example/a\nb"
            } else {
                "https://x.example/ab"
            };
            Ok(ParsedFeed::well_formed(vec![Entry::new("Remote Quant Analyst", link)]))
        });

        let report = service(source).find_matches(&urls(&["feed-1", "feed-2"]));

        assert_eq!(
            report.matches,
            vec![MatchRecord::new("Remote Quant Analyst", "https://x.example/ab")]
        );
    }

    #[test]
    fn test_matches_keep_first_seen_order() {
        let mut source = MockFeedSource::new();
        source.expect_fetch().with(eq("feed-1")).returning(|_| {
            Ok(ParsedFeed::well_formed(vec![
                Entry::new("Remote Data Scientist", "z"),
                Entry::new("Remote Data Engineer", "a"),
            ]))
        });
        source.expect_fetch().with(eq("feed-2")).returning(|_| {
            Ok(ParsedFeed::well_formed(vec![
                Entry::new("Remote Quant Developer", "m"),
                Entry::new("Remote Data Scientist", "z"),
            ]))
        });

        let report = service(source).find_matches(&urls(&["feed-1", "feed-2"]));

        let links: Vec<&str> = report.matches.iter().map(|m| m.link.as_str()).collect();
        assert_eq!(links, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_failed_feed_does_not_affect_others() {
        let mut source = MockFeedSource::new();
        source.expect_fetch().with(eq("feed-1")).returning(|_| {
            Ok(ParsedFeed::well_formed(vec![Entry::new(
                "Remote Junior Data Scientist",
                "a",
            )]))
        });
        source
            .expect_fetch()
            .with(eq("feed-2"))
            .returning(|_| Err(FeederError::FeedParse("unexpected EOF".to_string())));
        source.expect_fetch().with(eq("feed-3")).returning(|_| {
            Ok(ParsedFeed::well_formed(vec![Entry::new(
                "Graduate Data Engineer, remote",
                "c",
            )]))
        });

        let report = service(source).find_matches(&urls(&["feed-1", "feed-2", "feed-3"]));

        let links: Vec<&str> = report.matches.iter().map(|m| m.link.as_str()).collect();
        assert_eq!(links, vec!["a", "c"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].url, "feed-2");
        assert_eq!(report.sources_checked, 3);
    }

    #[test]
    fn test_malformed_feed_skipped_entirely() {
        let mut source = MockFeedSource::new();
        source.expect_fetch().with(eq("broken")).returning(|_| {
            Ok(ParsedFeed::malformed(vec![Entry::new(
                "Remote Junior Data Scientist",
                "a",
            )]))
        });

        let report = service(source).find_matches(&urls(&["broken"]));

        assert!(report.matches.is_empty());
        assert!(matches!(
            report.failures[0].error,
            FeederError::MalformedFeed(_)
        ));
    }

    #[test]
    fn test_malformed_feed_links_not_marked_seen() {
        let mut source = MockFeedSource::new();
        source.expect_fetch().with(eq("broken")).returning(|_| {
            Ok(ParsedFeed::malformed(vec![Entry::new("Remote Data Engineer", "a")]))
        });
        source.expect_fetch().with(eq("good")).returning(|_| {
            Ok(ParsedFeed::well_formed(vec![Entry::new("Remote Data Engineer", "a")]))
        });

        let report = service(source).find_matches(&urls(&["broken", "good"]));

        assert_eq!(report.matches.len(), 1);
    }

    #[test]
    fn test_description_checked_when_title_misses() {
        let mut source = MockFeedSource::new();
        source.expect_fetch().returning(|_| {
            Ok(ParsedFeed::well_formed(vec![
                Entry::new("Analytics Opening", "d1")
                    .with_description(Some("Fully remote junior data engineer role".to_string())),
                Entry::new("Analytics Opening", "d2"),
            ]))
        });

        let report = service(source).find_matches(&urls(&["feed-1"]));

        assert_eq!(report.matches, vec![MatchRecord::new("Analytics Opening", "d1")]);
    }

    #[test]
    fn test_non_matching_link_can_match_later() {
        // Only matches are remembered; a rejected entry does not block its link.
        let mut source = MockFeedSource::new();
        source.expect_fetch().with(eq("feed-1")).returning(|_| {
            Ok(ParsedFeed::well_formed(vec![Entry::new("Data Team Opening", "l")]))
        });
        source.expect_fetch().with(eq("feed-2")).returning(|_| {
            Ok(ParsedFeed::well_formed(vec![Entry::new(
                "Data Team Opening",
                "l",
            )
            .with_description(Some("Remote data scientist".to_string()))]))
        });

        let report = service(source).find_matches(&urls(&["feed-1", "feed-2"]));

        assert_eq!(report.matches.len(), 1);
    }

    #[test]
    fn test_custom_predicate() {
        let mut source = MockFeedSource::new();
        source.expect_fetch().returning(|_| {
            Ok(ParsedFeed::well_formed(vec![
                Entry::new("Rust Engineer", "r"),
                Entry::new("Go Engineer", "g"),
            ]))
        });

        let service = MatchService::new(source, |text: &str| text.contains("Rust"));
        let report = service.find_matches(&urls(&["feed-1"]));

        assert_eq!(report.matches, vec![MatchRecord::new("Rust Engineer", "r")]);
    }

    #[test]
    fn test_no_feeds() {
        let source = MockFeedSource::new();
        let report = service(source).find_matches(&[]);
        assert!(report.is_empty());
        assert_eq!(report.sources_checked, 0);
    }
}
