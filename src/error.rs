//! Error types for the store adapter and the benchmark harness.
//!
//! Nothing here is retried: store errors propagate unchanged through the
//! strategies, and any failure mid-run aborts the whole run.

use thiserror::Error;

use crate::store::DatasetTag;

/// Errors surfaced by a [`crate::store::Store`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The one-time connection could not be established. Fatal: the run
    /// never starts.
    #[error("store connection failed: {0}")]
    Connection(String),

    /// A query referenced a collection the store does not hold.
    #[error("unknown collection '{0}'")]
    UnknownCollection(String),

    /// A find or aggregate call failed inside the store.
    #[error("query on '{collection}' failed: {reason}")]
    Query { collection: String, reason: String },
}

/// Top-level harness errors.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No anchor user exists for a dataset tag, so none of that tag's cells
    /// can pick a reference id.
    #[error("no anchor user available for dataset '{0}'")]
    EmptyReferencePool(DatasetTag),

    /// The formatter was handed a series with zero samples. Always a harness
    /// bug; never papered over with a numeric default.
    #[error("cannot summarize an empty duration series")]
    EmptySeries,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
