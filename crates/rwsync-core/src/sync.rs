//! Batch resync statistics and per-dataset results.
//!
//! Pure bookkeeping, decoupled from I/O and from the registration workflow.

use chrono::{DateTime, Utc};

/// Outcome of processing a single dataset during batch resync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Metadata record refreshed
    Updated,
    /// Registration workflow failed for this dataset
    Failed,
    /// Listed reference was unusable (missing id or table identifier)
    Skipped,
}

impl SyncOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOutcome::Updated => "updated",
            SyncOutcome::Failed => "failed",
            SyncOutcome::Skipped => "skipped",
        }
    }
}

/// Result for one dataset of a batch resync.
#[derive(Debug, Clone)]
pub struct DatasetSyncResult {
    /// Registry identifier, when the listing carried one.
    pub dataset_id: Option<String>,
    /// Provider table identifier.
    pub table_name: String,
    pub outcome: SyncOutcome,
    /// Error or skip reason.
    pub error: Option<String>,
}

impl DatasetSyncResult {
    /// Creates a result for a refreshed dataset.
    pub fn updated(dataset_id: Option<String>, table_name: String) -> Self {
        Self {
            dataset_id,
            table_name,
            outcome: SyncOutcome::Updated,
            error: None,
        }
    }

    /// Creates a result for a dataset whose resync failed.
    pub fn failure(dataset_id: Option<String>, table_name: String, error: String) -> Self {
        Self {
            dataset_id,
            table_name,
            outcome: SyncOutcome::Failed,
            error: Some(error),
        }
    }

    /// Creates a result for a listed reference that could not be processed.
    pub fn skipped(dataset_id: Option<String>, table_name: String, reason: String) -> Self {
        Self {
            dataset_id,
            table_name,
            outcome: SyncOutcome::Skipped,
            error: Some(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == SyncOutcome::Updated
    }
}

/// Summary of a batch resync over every registered dataset of a provider.
#[derive(Debug, Clone)]
pub struct BatchResyncSummary {
    /// Per-dataset results, in listing order.
    pub results: Vec<DatasetSyncResult>,
    pub updated: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Number of datasets the registry listed.
    pub listed: usize,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for BatchResyncSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchResyncSummary {
    /// Creates an empty summary starting now.
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
            updated: 0,
            failed: 0,
            skipped: 0,
            listed: 0,
            cancelled: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Adds a dataset result, incrementing the matching counter.
    pub fn add(&mut self, result: DatasetSyncResult) {
        match result.outcome {
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::Failed => self.failed += 1,
            SyncOutcome::Skipped => self.skipped += 1,
        }
        self.results.push(result);
    }

    /// Marks the run finished.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Returns the number of datasets processed so far.
    pub fn total(&self) -> usize {
        self.updated + self.failed + self.skipped
    }

    /// Returns true if no dataset failed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Iterates over failed results.
    pub fn failures(&self) -> impl Iterator<Item = &DatasetSyncResult> {
        self.results
            .iter()
            .filter(|r| r.outcome == SyncOutcome::Failed)
    }

    /// Wall-clock duration in milliseconds, once finished.
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }
}
