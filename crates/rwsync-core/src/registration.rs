//! Registration service for provider datasets.
//!
//! This module provides the core workflow that turns a dataset reference into
//! a registry metadata record and, on first registration, a vocabulary
//! payload.
//!
//! # Architecture
//!
//! The [`RegistrationService`] is generic over two traits:
//! - [`ProviderAdapter`] - read access to the upstream provider
//! - [`RegistryGateway`] - write access to the dataset registry
//!
//! Everything between the network calls (candidate selection, license and
//! organization mapping, vocabulary construction) is pure and lives in
//! [`crate::normalize`], [`crate::license`], [`crate::organization`] and
//! [`crate::vocabulary`].
//!
//! # Workflow
//!
//! ```text
//! Fetching -> Normalizing -> Persisting -> Tagging (first time only) -> Done
//!     \            \              \              \
//!      `------------`--------------`--------------`--> Failed(reason)
//! ```
//!
//! - Fetching, normalizing and persisting failures surface as
//!   [`AppError::MetadataError`].
//! - Tagging failures surface as [`AppError::VocabularyError`]; the metadata
//!   record written before is kept.
//! - The service never touches lifecycle status. See [`crate::intake`].
//!
//! # Cancellation Support
//!
//! The `*_cancellable` batch methods accept a `CancellationToken`. The token
//! is checked between datasets and interrupts the inter-item delay; a dataset
//! already in flight runs to completion and its writes are never rolled back.

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::normalize::{normalize_entry, select_candidate};
use crate::progress::{ProgressReporter, RegistrationStage, SilentReporter, SyncEvent};
use crate::sync::{BatchResyncSummary, DatasetSyncResult};
use crate::traits::{ProviderAdapter, RegistryGateway};
use crate::vocabulary::build_vocabulary;
use crate::{
    AppError, CanonicalMetadata, DatasetReference, ProviderConfig, RegistrationOutcome,
    SyncConfig,
};

/// Service for registering and resyncing provider datasets.
///
/// # Type Parameters
///
/// * `P` - Provider adapter
/// * `G` - Registry gateway
pub struct RegistrationService<P, G>
where
    P: ProviderAdapter,
    G: RegistryGateway,
{
    provider: P,
    registry: G,
    config: ProviderConfig,
    sync_config: SyncConfig,
}

impl<P, G> Clone for RegistrationService<P, G>
where
    P: ProviderAdapter,
    G: RegistryGateway,
{
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            registry: self.registry.clone(),
            config: self.config.clone(),
            sync_config: self.sync_config.clone(),
        }
    }
}

impl<P, G> RegistrationService<P, G>
where
    P: ProviderAdapter,
    G: RegistryGateway,
{
    /// Creates a new registration service with the default sync configuration.
    pub fn new(provider: P, registry: G, config: ProviderConfig) -> Self {
        Self::with_config(provider, registry, config, SyncConfig::default())
    }

    /// Creates a new registration service with a custom sync configuration.
    pub fn with_config(
        provider: P,
        registry: G,
        config: ProviderConfig,
        sync_config: SyncConfig,
    ) -> Self {
        Self {
            provider,
            registry,
            config,
            sync_config,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the registry gateway, used by callers that own lifecycle writes.
    pub fn registry(&self) -> &G {
        &self.registry
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn sync_config(&self) -> &SyncConfig {
        &self.sync_config
    }

    // =========================================================================
    // Single registration
    // =========================================================================

    /// Registers one dataset.
    ///
    /// With `is_resync` the metadata record is replaced and no vocabulary is
    /// fetched or written; otherwise the record is created and the dataset is
    /// tagged.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidDatasetReference`] if the reference lacks a table
    ///   identifier or registry id. Nothing is fetched or written.
    /// - [`AppError::MetadataError`] if fetching, selection or the metadata
    ///   write fails.
    /// - [`AppError::VocabularyError`] if tagging fails after the metadata
    ///   record was written.
    pub async fn register(
        &self,
        reference: &DatasetReference,
        user_id: Option<&str>,
        is_resync: bool,
    ) -> Result<RegistrationOutcome, AppError> {
        self.register_with_progress(reference, user_id, is_resync, &SilentReporter)
            .await
    }

    /// Registers one dataset with progress reporting.
    ///
    /// Same as [`register`](Self::register), but emits progress events
    /// through the provided reporter.
    pub async fn register_with_progress<R: ProgressReporter>(
        &self,
        reference: &DatasetReference,
        user_id: Option<&str>,
        is_resync: bool,
        reporter: &R,
    ) -> Result<RegistrationOutcome, AppError> {
        reference.validate()?;
        let dataset_id = reference.require_id()?;
        let table_id = reference.table_name.as_str();

        reporter.report(SyncEvent::RegistrationStarted {
            table_id,
            dataset_id: Some(dataset_id),
            resync: is_resync,
        });

        // Fetching + Normalizing
        let metadata = match self.build_metadata(reference, user_id, reporter).await {
            Ok(metadata) => metadata,
            Err(e) => {
                return Err(fail(
                    reporter,
                    table_id,
                    RegistrationStage::Metadata,
                    AppError::metadata(e),
                ));
            }
        };
        reporter.report(SyncEvent::StageCompleted {
            table_id,
            stage: RegistrationStage::Metadata,
        });

        // Persisting
        let written = if is_resync {
            self.registry.update_metadata(dataset_id, &metadata).await
        } else {
            self.registry.create_metadata(dataset_id, &metadata).await
        };
        if let Err(e) = written {
            return Err(fail(
                reporter,
                table_id,
                RegistrationStage::MetadataWrite,
                AppError::metadata(e),
            ));
        }
        reporter.report(SyncEvent::StageCompleted {
            table_id,
            stage: RegistrationStage::MetadataWrite,
        });

        if is_resync {
            reporter.report(SyncEvent::RegistrationCompleted {
                table_id,
                resync: true,
            });
            return Ok(RegistrationOutcome::ResyncUpdated);
        }

        // Tagging
        if let Err(e) = self.tag_dataset(dataset_id, table_id, &metadata).await {
            return Err(fail(
                reporter,
                table_id,
                RegistrationStage::Vocabulary,
                AppError::vocabulary(e),
            ));
        }
        reporter.report(SyncEvent::StageCompleted {
            table_id,
            stage: RegistrationStage::Vocabulary,
        });
        reporter.report(SyncEvent::RegistrationCompleted {
            table_id,
            resync: false,
        });

        Ok(RegistrationOutcome::Registered)
    }

    /// Fetches and normalizes the metadata of one dataset without writing
    /// anything to the registry.
    ///
    /// Does not require a registry id. The owner recorded on the reference is
    /// used as the record's user.
    pub async fn preview(&self, reference: &DatasetReference) -> Result<CanonicalMetadata, AppError> {
        reference.validate()?;
        self.build_metadata(reference, reference.user_id.as_deref(), &SilentReporter)
            .await
    }

    async fn build_metadata<R: ProgressReporter>(
        &self,
        reference: &DatasetReference,
        user_id: Option<&str>,
        reporter: &R,
    ) -> Result<CanonicalMetadata, AppError> {
        let table_id = reference.table_name.as_str();

        let dataset_info = self.provider.fetch_dataset_info(table_id).await?;
        if dataset_info.is_none() {
            reporter.report(SyncEvent::DatasetInfoUnavailable { table_id });
        }

        let candidates = self.provider.fetch_metadata_candidates(table_id).await?;
        let entry = select_candidate(&candidates, reference)?;
        reporter.report(SyncEvent::CandidateSelected {
            table_id,
            language: &entry.language,
            application: &entry.application,
            candidates: candidates.len(),
        });

        Ok(normalize_entry(
            &self.config,
            reference,
            entry,
            dataset_info.as_ref(),
            user_id,
        ))
    }

    async fn tag_dataset(
        &self,
        dataset_id: &str,
        table_id: &str,
        metadata: &CanonicalMetadata,
    ) -> Result<(), AppError> {
        let upstream_tags = self.provider.fetch_vocabulary(table_id).await?;
        let payload = build_vocabulary(&self.config, &metadata.source_organization, upstream_tags);
        self.registry.create_vocabulary(dataset_id, &payload).await
    }

    // =========================================================================
    // Batch resync
    // =========================================================================

    /// Resyncs every registered dataset of this provider.
    ///
    /// Datasets are processed strictly one at a time, in listing order, with
    /// [`SyncConfig::item_delay`] between consecutive items. A failing dataset
    /// is recorded in the summary and never stops the batch.
    ///
    /// # Errors
    ///
    /// Only a failure to list the registered datasets is returned as an error.
    pub async fn batch_resync(&self) -> Result<BatchResyncSummary, AppError> {
        self.batch_resync_with_progress(&SilentReporter).await
    }

    /// Resyncs every registered dataset with progress reporting.
    pub async fn batch_resync_with_progress<R: ProgressReporter>(
        &self,
        reporter: &R,
    ) -> Result<BatchResyncSummary, AppError> {
        self.batch_resync_with_progress_cancellable(reporter, CancellationToken::new())
            .await
    }

    /// Resyncs every registered dataset with cancellation support.
    pub async fn batch_resync_cancellable(
        &self,
        cancel_token: CancellationToken,
    ) -> Result<BatchResyncSummary, AppError> {
        self.batch_resync_with_progress_cancellable(&SilentReporter, cancel_token)
            .await
    }

    /// Resyncs every registered dataset with progress reporting and
    /// cancellation support.
    ///
    /// On cancellation the summary is returned with `cancelled` set and only
    /// the datasets processed so far.
    pub async fn batch_resync_with_progress_cancellable<R: ProgressReporter>(
        &self,
        reporter: &R,
        cancel_token: CancellationToken,
    ) -> Result<BatchResyncSummary, AppError> {
        let references = self
            .registry
            .list_registered(self.provider.provider_name(), self.sync_config.page_size)
            .await?;

        let total = references.len();
        let mut summary = BatchResyncSummary::new();
        summary.listed = total;

        reporter.report(SyncEvent::BatchStarted {
            total_datasets: total,
        });

        for (index, reference) in references.iter().enumerate() {
            // Delay between items, not before the first one
            if index > 0 && !self.pause(&cancel_token).await {
                summary.cancelled = true;
            }
            if summary.cancelled || cancel_token.is_cancelled() {
                summary.cancelled = true;
                reporter.report(SyncEvent::BatchCancelled {
                    completed_datasets: index,
                    total_datasets: total,
                });
                break;
            }

            let table_id = reference.table_name.as_str();
            reporter.report(SyncEvent::DatasetStarted {
                index,
                total_datasets: total,
                table_id,
            });

            if let Some(reason) = unusable_reason(reference) {
                reporter.report(SyncEvent::DatasetSkipped {
                    index,
                    table_id,
                    reason: &reason,
                });
                summary.add(DatasetSyncResult::skipped(
                    reference.id.clone(),
                    reference.table_name.clone(),
                    reason,
                ));
                continue;
            }

            match self
                .register_with_progress(reference, reference.user_id.as_deref(), true, reporter)
                .await
            {
                Ok(_) => summary.add(DatasetSyncResult::updated(
                    reference.id.clone(),
                    reference.table_name.clone(),
                )),
                Err(e) => {
                    warn!(
                        dataset_id = reference.id.as_deref(),
                        table_name = table_id,
                        error = %e,
                        "Error updating dataset"
                    );
                    summary.add(DatasetSyncResult::failure(
                        reference.id.clone(),
                        reference.table_name.clone(),
                        e.to_string(),
                    ));
                }
            }
        }

        summary.finish();
        if !summary.cancelled {
            reporter.report(SyncEvent::BatchCompleted { summary: &summary });
        }

        Ok(summary)
    }

    /// Waits the inter-item delay. Returns false if cancelled while waiting.
    async fn pause(&self, cancel_token: &CancellationToken) -> bool {
        if self.sync_config.item_delay.is_zero() {
            return !cancel_token.is_cancelled();
        }
        tokio::select! {
            _ = cancel_token.cancelled() => false,
            _ = tokio::time::sleep(self.sync_config.item_delay) => true,
        }
    }
}

/// Returns why a listed reference cannot be resynced, if it cannot.
fn unusable_reason(reference: &DatasetReference) -> Option<String> {
    reference
        .validate()
        .and_then(|()| reference.require_id().map(drop))
        .err()
        .map(|e| e.to_string())
}

fn fail<R: ProgressReporter>(
    reporter: &R,
    table_id: &str,
    stage: RegistrationStage,
    err: AppError,
) -> AppError {
    let error = err.to_string();
    reporter.report(SyncEvent::RegistrationFailed {
        table_id,
        stage,
        error: &error,
    });
    err
}
