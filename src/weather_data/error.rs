use crate::types::error::ConfigError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a bulk retrieval. Any of them aborts the whole call.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The bulk-export host could not be reached (DNS, refused connection, timeout).
    #[error("Could not reach {url}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    /// The connection was made but the file could not be transferred completely.
    #[error("Transfer of {url} failed")]
    Transfer {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create a temporary directory for downloads")]
    TempDir(#[source] std::io::Error),

    #[error("Failed to read downloaded file '{0}'")]
    SliceRead(PathBuf, #[source] std::io::Error),

    #[error("Downloaded file for station {station} ({url}) has no content")]
    EmptySlice { station: u32, url: String },

    #[error("Failed to parse CSV data for station {station} from {url}")]
    CsvParse {
        station: u32,
        url: String,
        #[source]
        source: PolarsError,
    },

    #[error("Background parsing task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed to combine downloaded data")]
    DataFrame(#[from] PolarsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
