//! Error types
//!
//! Data-quality problems (malformed structured data, selector misses) are
//! never errors; they degrade to absent fields. What remains is the contract
//! violation of an unusable document address and upstream fetch failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure of the document source; never turned into an empty record
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {0:?}")]
    InvalidUrl(String),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
