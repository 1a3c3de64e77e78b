//! Error types for calendar event sources.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by a remote calendar endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP-level error with status code.
    Http { status: u16, message: String },
    /// Authentication failure (401/403).
    Auth { message: String },
    /// Rate limit exceeded.
    RateLimit { retry_after: Option<u64> },
    /// Calendar or feed not found.
    NotFound { resource: String },
    /// The request was rejected as invalid (400).
    Validation { message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, message } => write!(f, "HTTP error {}: {}", status, message),
            ApiError::Auth { message } => write!(f, "Auth error: {}", message),
            ApiError::RateLimit { retry_after } => match retry_after {
                Some(secs) => write!(f, "Rate limited, retry after {} seconds", secs),
                None => write!(f, "Rate limited"),
            },
            ApiError::NotFound { resource } => write!(f, "Not found: {}", resource),
            ApiError::Validation { message } => write!(f, "Bad request: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Returns true if the request may succeed when retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::RateLimit { .. } => true,
            ApiError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Errors that can occur while fetching calendar events.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The remote endpoint answered with an error status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request could not be sent or the body could not be read.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The calendar URL could not be used.
    #[error("Invalid calendar URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// A local calendar file does not exist.
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A local calendar file is not an `.ics` file.
    #[error("File must have .ics extension: {}", path.display())]
    InvalidExtension { path: PathBuf },

    /// A local calendar file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The calendar data is not valid iCalendar.
    #[error("Invalid calendar data: {0}")]
    Parse(String),

    /// An API response body was not the expected JSON.
    #[error("Invalid API response: {0}")]
    Json(#[from] serde_json::Error),

    /// A Google Calendar ID was given without an access token.
    #[error("An access token is required to read Google calendar '{calendar_id}'")]
    MissingToken { calendar_id: String },
}

impl FeedError {
    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        FeedError::Parse(message.into())
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        FeedError::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Returns true if the error concerns a local file rather than a remote source.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            FeedError::NotFound { .. } | FeedError::InvalidExtension { .. } | FeedError::Io { .. }
        )
    }

    /// Returns the CLI exit code for this error.
    ///
    /// Local file problems map to 3, a missing token to 5 (configuration),
    /// everything else to 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            FeedError::NotFound { .. } | FeedError::InvalidExtension { .. } | FeedError::Io { .. } => 3,
            FeedError::MissingToken { .. } => 5,
            _ => 2,
        }
    }
}

/// Result type for event source operations.
pub type Result<T> = std::result::Result<T, FeedError>;
