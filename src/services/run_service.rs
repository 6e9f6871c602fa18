use crate::errors::FeederResult;
use crate::matching::KeywordPredicate;
use crate::services::match_service::{MatchReport, MatchService};
use crate::services::notification_service::{MailTransport, NotificationService};
use crate::sources::FeedSource;

/// What one run did.
#[derive(Debug)]
pub struct RunSummary {
    pub report: MatchReport,
    pub notified: bool,
}

/// Matching followed by notification, the unit both the one-shot and the
/// scheduled modes execute.
pub struct RunService<S: FeedSource, P: KeywordPredicate, T: MailTransport> {
    matcher: MatchService<S, P>,
    notifier: NotificationService<T>,
}

impl<S: FeedSource, P: KeywordPredicate, T: MailTransport> RunService<S, P, T> {
    pub fn new(matcher: MatchService<S, P>, notifier: NotificationService<T>) -> Self {
        Self { matcher, notifier }
    }

    pub fn matcher(&self) -> &MatchService<S, P> {
        &self.matcher
    }

    /// Check all feeds, then send the digest when anything matched. Feed
    /// failures are part of the summary; only a failed delivery is an error.
    pub fn run(&self, feeds: &[String]) -> FeederResult<RunSummary> {
        let report = self.matcher.find_matches(feeds);

        // Each failure was already logged by the matcher as it happened
        if !report.failures.is_empty() {
            tracing::warn!(
                failed = report.failures.len(),
                checked = report.sources_checked,
                "Some feeds were skipped this run"
            );
        }

        if report.is_empty() {
            tracing::info!("No jobs found matching criteria");
            return Ok(RunSummary {
                report,
                notified: false,
            });
        }

        self.notifier.notify(&report.matches)?;

        Ok(RunSummary {
            report,
            notified: true,
        })
    }
}
