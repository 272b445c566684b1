//! Run failure reporting.

use thiserror::Error;
use trowel_fetch::SnapshotError;
use trowel_store::SinkError;
use trowel_types::Stage;

/// What went wrong in a failed run.
#[derive(Error, Debug)]
pub enum RunFailure {
    /// Every source came back empty or failed.
    #[error("no records fetched ({failed_endpoints} endpoints failed)")]
    NoData {
        /// Number of endpoints that failed.
        failed_endpoints: usize,
    },

    /// The board snapshot could not be read.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The sink rejected a read or write.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// A run that stopped at `stage` after processing `processed` records.
#[derive(Error, Debug)]
#[error("{stage} stage failed after {processed} records: {source}")]
pub struct RunError {
    /// Stage that failed.
    pub stage: Stage,
    /// Records handled before the failure.
    pub processed: usize,
    /// Underlying failure.
    pub source: RunFailure,
}

impl RunError {
    /// Creates a run error.
    pub fn new(stage: Stage, processed: usize, source: impl Into<RunFailure>) -> Self {
        Self {
            stage,
            processed,
            source: source.into(),
        }
    }
}
