//! Trait definitions for external dependencies.
//!
//! This module defines traits that abstract over the two remote services the
//! connector talks to, enabling:
//!
//! - **Testability**: Mock implementations for unit and integration testing
//! - **Flexibility**: Different upstream providers behind one adapter seam
//! - **Decoupling**: The registration workflow doesn't depend on HTTP details
//!
//! # Example
//!
//! ```
//! use rwsync_core::traits::ProviderAdapter;
//! use rwsync_core::{AppError, DatasetReference};
//!
//! // Business logic uses traits, not concrete types
//! async fn count_candidates<P: ProviderAdapter>(
//!     provider: &P,
//!     reference: &DatasetReference,
//! ) -> Result<usize, AppError> {
//!     Ok(provider.fetch_metadata_candidates(&reference.table_name).await?.len())
//! }
//! ```

use std::future::Future;

use crate::{
    AppError, CanonicalMetadata, DatasetReference, LifecycleUpdate, RawDatasetInfo,
    RawMetadataEntry, VocabularyPayload,
};

/// Read-only access to one upstream metadata provider.
///
/// Every method performs a single request attempt. Transport failures are
/// reported as [`AppError::ClientError`], [`AppError::NetworkError`] or
/// [`AppError::Timeout`]; responses that parse but lack the expected shape
/// are reported as [`AppError::UpstreamFormat`].
pub trait ProviderAdapter: Send + Sync + Clone {
    /// Provider key used in registry listings and routes, e.g. `resourcewatch`.
    fn provider_name(&self) -> &str;

    /// Fetches descriptive information for a table.
    ///
    /// Returns `Ok(None)` when the provider has no usable record, in which
    /// case landing pages fall back to the data-source endpoint.
    fn fetch_dataset_info(
        &self,
        table_id: &str,
    ) -> impl Future<Output = Result<Option<RawDatasetInfo>, AppError>> + Send;

    /// Fetches all metadata candidates for a table, in provider order.
    ///
    /// A missing or empty candidate list is an [`AppError::UpstreamFormat`].
    fn fetch_metadata_candidates(
        &self,
        table_id: &str,
    ) -> impl Future<Output = Result<Vec<RawMetadataEntry>, AppError>> + Send;

    /// Fetches the provider's topic tags for a table.
    ///
    /// An absent tag structure yields an empty list.
    fn fetch_vocabulary(
        &self,
        table_id: &str,
    ) -> impl Future<Output = Result<Vec<String>, AppError>> + Send;
}

/// Write access to the central dataset registry.
pub trait RegistryGateway: Send + Sync + Clone {
    /// Lists the datasets registered for `provider` that are in the active
    /// (saved) state, in registry order.
    fn list_registered(
        &self,
        provider: &str,
        page_size: usize,
    ) -> impl Future<Output = Result<Vec<DatasetReference>, AppError>> + Send;

    /// Creates the metadata record for a dataset.
    fn create_metadata(
        &self,
        dataset_id: &str,
        metadata: &CanonicalMetadata,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Replaces the metadata record of an already registered dataset.
    fn update_metadata(
        &self,
        dataset_id: &str,
        metadata: &CanonicalMetadata,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Attaches a vocabulary payload to a dataset.
    fn create_vocabulary(
        &self,
        dataset_id: &str,
        vocabulary: &VocabularyPayload,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Sets the lifecycle status of a dataset.
    fn update_status(
        &self,
        dataset_id: &str,
        update: &LifecycleUpdate,
    ) -> impl Future<Output = Result<(), AppError>> + Send;
}
