use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeederError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Feed errors
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    #[error("Feed returned HTTP {status}: {url}")]
    FetchStatus { url: String, status: u16 },

    #[error("Feed body exceeds {limit} bytes: {url}")]
    FeedTooLarge { url: String, limit: usize },

    #[error("Feed is malformed, skipped: {0}")]
    MalformedFeed(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    // Digest delivery errors
    #[error("Mail transport failed: {0}")]
    Transport(String),

    // Run coordination
    #[error("Another run holds the lock at {0}")]
    RunInProgress(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lettre::error::Error> for FeederError {
    fn from(err: lettre::error::Error) -> Self {
        FeederError::Transport(err.to_string())
    }
}

impl From<lettre::address::AddressError> for FeederError {
    fn from(err: lettre::address::AddressError) -> Self {
        FeederError::Transport(format!("invalid address: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for FeederError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        FeederError::Transport(err.to_string())
    }
}

pub type FeederResult<T> = Result<T, FeederError>;
