//! Custom error types for show-browser.
//!
//! Fetch failures get their own type so the browser can surface them per
//! cache key; everything else funnels into [`AppError`].

use std::error::Error;
use std::fmt;
use std::io;

/// A failed request against the remote data source.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection, DNS, timeout or other transport failure
    Transport(String),
    /// The server answered with a non-success status code
    Status { status: u16, url: String },
    /// The body could not be decoded into the expected records
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "Network error: {}", msg),
            FetchError::Status { status, url } => {
                write!(f, "HTTP {} from {}", status, url)
            }
            FetchError::Decode(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Application error types.
#[derive(Debug)]
pub enum AppError {
    /// Remote data source errors
    Fetch(FetchError),
    /// Configuration errors
    Config(String),
    /// File and terminal I/O errors
    Io(io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Fetch(err) => write!(f, "{}", err),
            AppError::Config(msg) => write!(f, "Config error: {}", msg),
            AppError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Fetch(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Config(_) => None,
        }
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::Fetch(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Fetch(err.into())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
