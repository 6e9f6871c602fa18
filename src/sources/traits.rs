use crate::domain::ParsedFeed;
use crate::errors::FeederResult;

#[cfg_attr(test, mockall::automock)]
pub trait FeedSource {
    /// Fetch and parse one feed. Errors are scoped to this URL; callers
    /// are expected to carry on with the next source.
    fn fetch(&self, url: &str) -> FeederResult<ParsedFeed>;
}
