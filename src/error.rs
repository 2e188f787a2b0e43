//! Error types shared across the digest pipeline.
//!
//! Each variant corresponds to one failure surface of the service:
//! request validation, the news-search API, the summarization API, and
//! startup configuration. Fetch and summarization failures are surfaced
//! to the user per call; configuration failures are fatal at startup.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A search request with neither free text nor a known category.
    #[error("no search criteria: {0}")]
    InvalidRequest(String),

    /// The news API call failed (network error or non-success status).
    #[error("news search failed: {0}")]
    Fetch(String),

    /// The news API signalled quota exhaustion.
    #[error("news API rate limit exhausted; try again later")]
    RateLimited,

    /// The completion API call failed, timed out, or returned unusable output.
    #[error("summarization failed: {0}")]
    Summarization(String),

    /// A required secret or setting is missing at startup.
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
