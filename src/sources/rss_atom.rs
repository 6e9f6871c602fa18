use std::io::Read;
use std::time::Duration;

use feed_rs::parser;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::domain::{normalize_link, Entry, ParsedFeed};
use crate::errors::{FeederError, FeederResult};
use crate::matching::html_to_text;
use crate::sources::traits::FeedSource;

/// Feed bodies above this size are refused.
pub const MAX_FEED_SIZE: usize = 10 * 1024 * 1024;

/// Content types that can never be a feed document. A feed parsed out of
/// one of these is most likely an error page.
const NON_FEED_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml", "text/plain"];

pub struct RssAtomSource {
    client: Client,
    max_size: usize,
}

impl RssAtomSource {
    pub fn new(timeout: Duration) -> FeederResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("jobwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            max_size: MAX_FEED_SIZE,
        })
    }

    fn read_body(&self, url: &str, response: reqwest::blocking::Response) -> FeederResult<Vec<u8>> {
        if let Some(length) = response.content_length() {
            if length > self.max_size as u64 {
                return Err(FeederError::FeedTooLarge {
                    url: url.to_string(),
                    limit: self.max_size,
                });
            }
        }

        read_limited(url, response, self.max_size)
    }
}

/// Read at most `max_size` bytes. Bodies without a usable Content-Length
/// are cut off here.
fn read_limited<R: Read>(url: &str, reader: R, max_size: usize) -> FeederResult<Vec<u8>> {
    let mut body = Vec::new();
    reader.take(max_size as u64 + 1).read_to_end(&mut body)?;

    if body.len() > max_size {
        return Err(FeederError::FeedTooLarge {
            url: url.to_string(),
            limit: max_size,
        });
    }

    Ok(body)
}

impl FeedSource for RssAtomSource {
    fn fetch(&self, url: &str) -> FeederResult<ParsedFeed> {
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeederError::FetchStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let body = self.read_body(url, response)?;

        parse_feed(&body, content_type.as_deref())
    }
}

/// Parse raw feed bytes into entries. The result is flagged as not well
/// formed when the server labelled the document as something other than a
/// feed, even if the parser recovered entries from it.
pub fn parse_feed(bytes: &[u8], content_type: Option<&str>) -> FeederResult<ParsedFeed> {
    let parsed = parser::parse(bytes).map_err(|e| FeederError::FeedParse(e.to_string()))?;

    let entries: Vec<Entry> = parsed
        .entries
        .into_iter()
        .filter_map(|entry| {
            // Entries without a link cannot be deduplicated or reported
            let link = entry
                .links
                .into_iter()
                .map(|l| normalize_link(&l.href))
                .find(|href| !href.is_empty())?;

            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());

            let description = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .map(|html| html_to_text(&html))
                .filter(|text| !text.is_empty());

            Some(Entry::new(title, link).with_description(description))
        })
        .collect();

    if content_type.is_some_and(is_non_feed_content_type) {
        return Ok(ParsedFeed::malformed(entries));
    }

    Ok(ParsedFeed::well_formed(entries))
}

fn is_non_feed_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    NON_FEED_CONTENT_TYPES.contains(&mime.as_str())
}
