use std::path::PathBuf;

use thiserror::Error;

/// Centralized error type for the aggregation core.
#[derive(Error, Debug)]
pub enum DengueError {
    /// The dataset directory or a source table is missing or unreadable.
    /// Fatal to the current view; surfaced to the user as-is.
    #[error("dataset catalog unavailable at {path}: {source}")]
    CatalogUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The filter names a region the catalog never listed.
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    /// A municipality filter was selected without a concrete state.
    #[error("a municipality filter requires a concrete state")]
    LocalityWithoutRegion,

    /// A valid filter matched zero rows. Non-fatal: callers render a
    /// "no data" state and must not compute statistics.
    #[error("no rows matched the current filter")]
    EmptyResult,

    /// Statistics were requested for an empty series.
    #[error("cannot summarize an empty series")]
    DivisionUndefined,

    #[error("query engine error: {0}")]
    Query(#[from] polars::error::PolarsError),

    #[error("JSON (de)serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for fallible operations in this crate.
pub type DengueResult<T> = Result<T, DengueError>;
