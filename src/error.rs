use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure fetching or parsing one remote page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("{url}: {what} not found")]
    MissingContent { url: String, what: &'static str },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write record to {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Fatal batch failures. Per-issue fetch errors are not fatal and are
/// collected in `BatchResult::failures` instead.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("issue count discovery failed: {0}")]
    CountDiscovery(#[source] FetchError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
