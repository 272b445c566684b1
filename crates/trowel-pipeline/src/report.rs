//! Run summaries.

use serde::Serialize;
use std::time::Duration;
use trowel_types::{CanonicalRecord, ScrapeStamp};
use uuid::Uuid;

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Collection stamp shared by every record of the run.
    pub started_at: ScrapeStamp,
    /// Wall time of the run.
    pub elapsed: Duration,
    /// Records parsed from the source.
    pub fetched: usize,
    /// Keys already present in the sink.
    pub existing_keys: usize,
    /// Rows appended (zero on a dry run).
    pub appended: usize,
    /// Fields nulled because of malformed input.
    pub skipped_fields: usize,
    /// Endpoints that failed and were left out.
    pub failed_endpoints: Vec<String>,
    /// True if the delta was computed but not written.
    pub dry_run: bool,
    /// The new records found by this run.
    #[serde(skip)]
    pub delta: Vec<CanonicalRecord>,
}

impl RunReport {
    /// Returns the number of new records.
    #[must_use]
    pub fn new_records(&self) -> usize {
        self.delta.len()
    }

    /// Returns true if every endpoint succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_endpoints.is_empty()
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "run {}: fetched {}, new {}, appended {}",
            self.run_id,
            self.fetched,
            self.delta.len(),
            self.appended
        )?;
        if self.dry_run {
            write!(f, " (dry run)")?;
        }
        if !self.failed_endpoints.is_empty() {
            write!(f, ", {} endpoints failed", self.failed_endpoints.len())?;
        }
        Ok(())
    }
}
