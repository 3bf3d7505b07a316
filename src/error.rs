use std::io;
use std::result::Result as StdResult;
use thiserror::Error;

/// Message shown when the backend rejects a request without a usable `detail`.
pub const GENERIC_FAILURE: &str = "Failed";
/// Message shown when the request never produced a readable response.
pub const TRANSPORT_FAILURE: &str = "Something went wrong";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Backend error: {0}")]
    BackendError(String),
    #[error("Backend returned status {0}")]
    HttpStatus(u16),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Coarse classification used by render sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Backend,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ValidationError(_) => ErrorKind::Validation,
            Error::BackendError(_) => ErrorKind::Backend,
            Error::HttpStatus(_) | Error::InvalidResponse(_) | Error::HttpError(_) => {
                ErrorKind::Transport
            }
            Error::ConfigError(_) | Error::IoError(_) => ErrorKind::Config,
        }
    }

    /// The inline message shown next to the form that triggered the request.
    pub fn user_message(&self) -> String {
        match self {
            Error::ValidationError(msg) | Error::BackendError(msg) => msg.clone(),
            Error::HttpStatus(_) => GENERIC_FAILURE.to_string(),
            Error::InvalidResponse(_) | Error::HttpError(_) => TRANSPORT_FAILURE.to_string(),
            Error::ConfigError(_) | Error::IoError(_) => self.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidResponse(err.to_string())
    }
}

pub type Result<T> = StdResult<T, Error>;
