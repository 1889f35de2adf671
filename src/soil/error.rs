use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum HydraulicParamsError {
    #[error("Hydraulic parameter dataset not found at '{0}'")]
    NotFound(PathBuf),

    #[error("Could not determine the location of the hydraulic parameter dataset")]
    PathResolution,

    #[error("Failed to read hydraulic parameter dataset '{0}'")]
    Read(PathBuf, #[source] PolarsError),

    #[error("Failed to parse hydraulic parameter dataset")]
    Parse(#[source] PolarsError),

    #[error("Missing required column '{0}' in hydraulic parameter dataset")]
    MissingColumn(String),

    #[error("Row {row} of the hydraulic parameter dataset has no site")]
    MissingSite { row: usize },

    #[error("Unsupported depth {depth:?} for site {site} (expected 5, 25 or 60)")]
    InvalidDepth { site: String, depth: Option<i64> },

    #[error("Hydraulic parameters for site {site} at {depth} cm appear more than once")]
    DuplicateRow { site: String, depth: i64 },

    #[error("Loading task failed: {0}")]
    TaskJoin(#[from] JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
