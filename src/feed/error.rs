use crate::types::depth::Depth;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),

    #[error("Payload from {url} ended before the column header")]
    MissingHeader { url: String },

    #[error("Parsing error processing data from {url}")]
    Parse {
        url: String,
        #[source]
        source: PolarsError,
    },

    #[error("Missing required column '{column}' in data from {url}")]
    MissingColumn { url: String, column: String },

    #[error("Station {site} reported more than one reading at {depth}")]
    DuplicateReading { site: String, depth: Depth },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
