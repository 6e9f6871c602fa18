use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;
use url::Url;

use crate::errors::{FeederError, FeederResult};

/// Job-board feeds checked on every run, in order.
pub const DEFAULT_FEEDS: &[&str] = &[
    // WeWorkRemotely
    "https://weworkremotely.com/categories/remote-data-jobs.rss",
    "https://weworkremotely.com/categories/remote-programming-jobs.rss",
    // RemoteOK by category
    "https://remoteok.com/remote-data-science-jobs.rss",
    "https://remoteok.com/remote-data-engineer-jobs.rss",
    "https://remoteok.com/remote-python-jobs.rss",
    "https://remoteok.com/remote-quantitative-jobs.rss",
    "https://remoteok.com/remote-analyst-jobs.rss",
    // Wellfound
    "https://angel.co/job_listings.rss?locations%5B%5D=1688-remote",
    // Stack Overflow
    "https://stackoverflow.com/jobs/feed?r=true&q=python+data+remote",
    // RemoteOK searches
    "https://remoteok.com/remote-jobs.rss?q=junior+data+scientist",
    "https://remoteok.com/remote-jobs.rss?q=entry+level+data+engineer",
    "https://remoteok.com/remote-jobs.rss?q=quantitative+developer",
    // JustRemote
    "https://justremote.co/remote-jobs.rss?q=data+scientist",
    "https://justremote.co/remote-jobs.rss?q=data+engineer",
    // General remote boards
    "https://remote.co/remote-jobs/developer/?feed=rss2",
    "https://www.workingnomads.co/jobs.rss",
    "https://nodesk.co/remote-jobs/rss.xml",
    "https://remotejobs.com/rss",
];

/// Times of day (UTC) the scheduler fires. 12:00 and 00:00 UTC are 08:00 and
/// 20:00 in UTC-4.
pub const DEFAULT_SCHEDULE: &str = "00:00,12:00";

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub feeds: Vec<String>,
    pub email_from: Option<String>,
    pub email_to: Option<String>,
    pub app_password: Option<String>,
    pub fetch_timeout: Duration,
    pub smtp_timeout: Duration,
    pub schedule: Vec<NaiveTime>,
    pub lock_path: PathBuf,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> FeederResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> FeederResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let feeds = match get("JOBWATCH_FEEDS") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
        };

        let fetch_timeout = parse_secs(get("FETCH_TIMEOUT_SECS"), "FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?;
        let smtp_timeout = parse_secs(get("SMTP_TIMEOUT_SECS"), "SMTP_TIMEOUT_SECS", DEFAULT_SMTP_TIMEOUT_SECS)?;

        let schedule = parse_schedule(get("JOBWATCH_SCHEDULE").as_deref().unwrap_or(DEFAULT_SCHEDULE))?;

        let lock_path = get("JOBWATCH_LOCK_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("jobwatch.lock"));

        Ok(Self {
            feeds,
            email_from: get("EMAIL_FROM"),
            email_to: get("EMAIL_TO"),
            app_password: get("APP_PASSWORD"),
            fetch_timeout,
            smtp_timeout,
            schedule,
            lock_path,
        })
    }

    /// Address the digest goes to: `EMAIL_TO`, or the sender when unset.
    pub fn recipient(&self) -> Option<&str> {
        self.email_to.as_deref().or(self.email_from.as_deref())
    }

    /// Problems that will make the run fail later or skip work. None of
    /// these stop a run from being attempted.
    pub fn validate(&self) -> Vec<FeederError> {
        let mut problems = Vec::new();

        if self.email_from.is_none() {
            problems.push(FeederError::MissingEnvVar("EMAIL_FROM".to_string()));
        }
        if self.app_password.is_none() {
            problems.push(FeederError::MissingEnvVar("APP_PASSWORD".to_string()));
        }
        if self.feeds.is_empty() {
            problems.push(FeederError::Config("no feeds configured".to_string()));
        }
        for feed in &self.feeds {
            if let Err(e) = Url::parse(feed) {
                problems.push(FeederError::InvalidUrl(format!("{}: {}", feed, e)));
            }
        }

        problems
    }
}

fn parse_secs(value: Option<String>, key: &str, default: u64) -> FeederResult<Duration> {
    match value {
        None => Ok(Duration::from_secs(default)),
        Some(v) => v
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| FeederError::Config(format!("{} must be a positive number of seconds, got '{}'", key, v))),
    }
}

/// Parse `HH:MM[,HH:MM...]` into sorted, distinct times of day.
pub fn parse_schedule(value: &str) -> FeederResult<Vec<NaiveTime>> {
    let mut times = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveTime::parse_from_str(s, "%H:%M")
                .map_err(|_| FeederError::Config(format!("invalid schedule time '{}', expected HH:MM", s)))
        })
        .collect::<FeederResult<Vec<_>>>()?;

    times.sort();
    times.dedup();

    if times.is_empty() {
        return Err(FeederError::Config("schedule has no times".to_string()));
    }

    Ok(times)
}
