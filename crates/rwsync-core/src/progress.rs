//! Progress reporting for registration and batch resync.
//!
//! The registration workflow emits [`SyncEvent`]s through a
//! [`ProgressReporter`] instead of logging directly, so the CLI, the server
//! and tests can each decide what to do with them.

use tracing::{debug, error, info, warn};

use crate::sync::BatchResyncSummary;

/// Step of the registration workflow that was reached or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStage {
    /// Fetching dataset info and metadata candidates, normalizing.
    Metadata,
    /// Writing the metadata record to the registry.
    MetadataWrite,
    /// Fetching upstream tags and writing the vocabulary payload.
    Vocabulary,
}

impl RegistrationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStage::Metadata => "metadata",
            RegistrationStage::MetadataWrite => "metadata-write",
            RegistrationStage::Vocabulary => "vocabulary",
        }
    }
}

/// Events emitted while registering datasets.
#[derive(Debug, Clone)]
pub enum SyncEvent<'a> {
    /// A single registration started.
    RegistrationStarted {
        table_id: &'a str,
        dataset_id: Option<&'a str>,
        resync: bool,
    },
    /// The provider has no dataset info; registration continues without it.
    DatasetInfoUnavailable { table_id: &'a str },
    /// A metadata candidate was selected.
    CandidateSelected {
        table_id: &'a str,
        language: &'a str,
        application: &'a str,
        candidates: usize,
    },
    /// A registration step completed.
    StageCompleted {
        table_id: &'a str,
        stage: RegistrationStage,
    },
    /// A single registration succeeded.
    RegistrationCompleted { table_id: &'a str, resync: bool },
    /// A single registration failed.
    RegistrationFailed {
        table_id: &'a str,
        stage: RegistrationStage,
        error: &'a str,
    },
    /// Batch resync started.
    BatchStarted { total_datasets: usize },
    /// Batch resync moved on to the next dataset.
    DatasetStarted {
        index: usize,
        total_datasets: usize,
        table_id: &'a str,
    },
    /// A listed dataset was skipped because its reference is unusable.
    DatasetSkipped {
        index: usize,
        table_id: &'a str,
        reason: &'a str,
    },
    /// Batch resync stopped early on cancellation.
    BatchCancelled {
        completed_datasets: usize,
        total_datasets: usize,
    },
    /// Batch resync finished.
    BatchCompleted { summary: &'a BatchResyncSummary },
}

/// Trait for reporting registration progress.
pub trait ProgressReporter: Send + Sync {
    /// Called when a registration event occurs.
    ///
    /// The default implementation does nothing (silent mode).
    fn report(&self, event: SyncEvent<'_>) {
        let _ = event;
    }
}

/// Silent reporter that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

/// Tracing-based reporter for CLI/server logging.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: SyncEvent<'_>) {
        match event {
            SyncEvent::RegistrationStarted {
                table_id,
                dataset_id,
                resync,
            } => {
                info!(table_id, dataset_id, resync, "Registering dataset");
            }
            SyncEvent::DatasetInfoUnavailable { table_id } => {
                debug!(table_id, "No dataset info, using endpoint as landing page");
            }
            SyncEvent::CandidateSelected {
                table_id,
                language,
                application,
                candidates,
            } => {
                debug!(table_id, language, application, candidates, "Metadata candidate selected");
            }
            SyncEvent::StageCompleted { table_id, stage } => {
                debug!(table_id, stage = stage.as_str(), "Stage completed");
            }
            SyncEvent::RegistrationCompleted { table_id, resync } => {
                info!(table_id, resync, "Dataset registered");
            }
            SyncEvent::RegistrationFailed {
                table_id,
                stage,
                error,
            } => {
                error!(table_id, stage = stage.as_str(), %error, "Registration failed");
            }
            SyncEvent::BatchStarted { total_datasets } => {
                info!(total_datasets, "Starting batch resync");
            }
            SyncEvent::DatasetStarted {
                index,
                total_datasets,
                table_id,
            } => {
                debug!("[{}/{}] Resyncing {}", index + 1, total_datasets, table_id);
            }
            SyncEvent::DatasetSkipped {
                index,
                table_id,
                reason,
            } => {
                warn!(index, table_id, reason, "Skipping dataset");
            }
            SyncEvent::BatchCancelled {
                completed_datasets,
                total_datasets,
            } => {
                warn!(completed_datasets, total_datasets, "Batch resync cancelled");
            }
            SyncEvent::BatchCompleted { summary } => {
                info!(
                    total = summary.total(),
                    updated = summary.updated,
                    failed = summary.failed,
                    skipped = summary.skipped,
                    "Batch resync complete"
                );
            }
        }
    }
}
