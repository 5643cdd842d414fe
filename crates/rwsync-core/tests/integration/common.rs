//! Test utilities and mock implementations for integration tests.
//!
//! Provides mock implementations of the core traits for testing
//! `RegistrationService` and `DatasetIntake` in isolation.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rwsync_core::traits::{ProviderAdapter, RegistryGateway};
use rwsync_core::{
    AppError, CanonicalMetadata, DatasetReference, LifecycleStatus, LifecycleUpdate, ProviderConfig,
    RawDatasetInfo, RawMetadataEntry, RegistrationService, SyncConfig, VocabularyPayload,
};

// =============================================================================
// Failure injection
// =============================================================================

/// Kind of error a mock should return.
#[derive(Clone, Copy, Debug)]
pub enum Failure {
    /// Non-success HTTP status.
    Transport,
    /// Provider answered with an unusable shape.
    Format,
}

impl Failure {
    fn into_error(self, context: &str) -> AppError {
        match self {
            Failure::Transport => AppError::ClientError(format!("HTTP 503 ({})", context)),
            Failure::Format => AppError::UpstreamFormat(format!("malformed {}", context)),
        }
    }
}

// =============================================================================
// MockProvider
// =============================================================================

/// In-memory provider adapter keyed by table identifier.
///
/// Records every call as `"<operation>:<table_id>"`.
#[derive(Clone, Default)]
pub struct MockProvider {
    dataset_info: HashMap<String, RawDatasetInfo>,
    candidates: HashMap<String, Vec<RawMetadataEntry>>,
    vocabulary: HashMap<String, Vec<String>>,
    failures: HashMap<(&'static str, String), Failure>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds metadata candidates for a table.
    pub fn with_candidates(mut self, table_id: &str, candidates: Vec<RawMetadataEntry>) -> Self {
        self.candidates.insert(table_id.to_string(), candidates);
        self
    }

    /// Adds dataset info with the given slug for a table.
    #[allow(dead_code)]
    pub fn with_slug(mut self, table_id: &str, slug: &str) -> Self {
        self.dataset_info.insert(
            table_id.to_string(),
            RawDatasetInfo {
                slug: Some(slug.to_string()),
                ..Default::default()
            },
        );
        self
    }

    /// Adds upstream topic tags for a table.
    #[allow(dead_code)]
    pub fn with_vocabulary(mut self, table_id: &str, tags: &[&str]) -> Self {
        self.vocabulary.insert(
            table_id.to_string(),
            tags.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    /// Makes `operation` (`dataset_info`, `metadata` or `vocabulary`) fail for a table.
    #[allow(dead_code)]
    pub fn failing(mut self, operation: &'static str, table_id: &str, failure: Failure) -> Self {
        self.failures
            .insert((operation, table_id.to_string()), failure);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, table_id: &str) -> Result<(), AppError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", operation, table_id));
        match self.failures.get(&(operation, table_id.to_string())) {
            Some(failure) => Err(failure.into_error(operation)),
            None => Ok(()),
        }
    }
}

impl ProviderAdapter for MockProvider {
    fn provider_name(&self) -> &str {
        "resourcewatch"
    }

    async fn fetch_dataset_info(&self, table_id: &str) -> Result<Option<RawDatasetInfo>, AppError> {
        self.record("dataset_info", table_id)?;
        Ok(self.dataset_info.get(table_id).cloned())
    }

    async fn fetch_metadata_candidates(
        &self,
        table_id: &str,
    ) -> Result<Vec<RawMetadataEntry>, AppError> {
        self.record("metadata", table_id)?;
        match self.candidates.get(table_id) {
            Some(candidates) if !candidates.is_empty() => Ok(candidates.clone()),
            _ => Err(AppError::UpstreamFormat(
                "empty metadata candidate list".to_string(),
            )),
        }
    }

    async fn fetch_vocabulary(&self, table_id: &str) -> Result<Vec<String>, AppError> {
        self.record("vocabulary", table_id)?;
        Ok(self.vocabulary.get(table_id).cloned().unwrap_or_default())
    }
}

// =============================================================================
// MockRegistry
// =============================================================================

/// One recorded registry call.
#[derive(Clone, Debug)]
pub enum RegistryCall {
    List { provider: String, page_size: usize },
    CreateMetadata { dataset_id: String, metadata: CanonicalMetadata },
    UpdateMetadata { dataset_id: String, metadata: CanonicalMetadata },
    CreateVocabulary { dataset_id: String, payload: VocabularyPayload },
    UpdateStatus { dataset_id: String, update: LifecycleUpdate },
}

impl RegistryCall {
    /// Short operation name, for order assertions.
    pub fn op(&self) -> &'static str {
        match self {
            RegistryCall::List { .. } => "list",
            RegistryCall::CreateMetadata { .. } => "create_metadata",
            RegistryCall::UpdateMetadata { .. } => "update_metadata",
            RegistryCall::CreateVocabulary { .. } => "create_vocabulary",
            RegistryCall::UpdateStatus { .. } => "update_status",
        }
    }
}

/// In-memory registry recording every call behind `Arc<Mutex<..>>`.
#[derive(Clone, Default)]
pub struct MockRegistry {
    registered: Vec<DatasetReference>,
    failing_ops: HashSet<&'static str>,
    failing_status: Option<LifecycleStatus>,
    pub calls: Arc<Mutex<Vec<RegistryCall>>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the datasets returned by the listing.
    #[allow(dead_code)]
    pub fn with_registered(mut self, registered: Vec<DatasetReference>) -> Self {
        self.registered = registered;
        self
    }

    /// Makes every call of `op` (see [`RegistryCall::op`]) fail with HTTP 500.
    #[allow(dead_code)]
    pub fn failing(mut self, op: &'static str) -> Self {
        self.failing_ops.insert(op);
        self
    }

    /// Makes status updates to `status` fail with HTTP 502.
    #[allow(dead_code)]
    pub fn failing_status(mut self, status: LifecycleStatus) -> Self {
        self.failing_status = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ops(&self) -> Vec<&'static str> {
        self.calls().iter().map(RegistryCall::op).collect()
    }

    /// Returns true if any write (anything but a listing) was recorded.
    #[allow(dead_code)]
    pub fn has_writes(&self) -> bool {
        self.calls()
            .iter()
            .any(|c| !matches!(c, RegistryCall::List { .. }))
    }

    fn record(&self, call: RegistryCall) -> Result<(), AppError> {
        let op = call.op();
        self.calls.lock().unwrap().push(call);
        if self.failing_ops.contains(op) {
            return Err(AppError::ClientError(format!("HTTP 500 ({})", op)));
        }
        Ok(())
    }
}

impl RegistryGateway for MockRegistry {
    async fn list_registered(
        &self,
        provider: &str,
        page_size: usize,
    ) -> Result<Vec<DatasetReference>, AppError> {
        self.record(RegistryCall::List {
            provider: provider.to_string(),
            page_size,
        })?;
        Ok(self.registered.clone())
    }

    async fn create_metadata(
        &self,
        dataset_id: &str,
        metadata: &CanonicalMetadata,
    ) -> Result<(), AppError> {
        self.record(RegistryCall::CreateMetadata {
            dataset_id: dataset_id.to_string(),
            metadata: metadata.clone(),
        })
    }

    async fn update_metadata(
        &self,
        dataset_id: &str,
        metadata: &CanonicalMetadata,
    ) -> Result<(), AppError> {
        self.record(RegistryCall::UpdateMetadata {
            dataset_id: dataset_id.to_string(),
            metadata: metadata.clone(),
        })
    }

    async fn create_vocabulary(
        &self,
        dataset_id: &str,
        vocabulary: &VocabularyPayload,
    ) -> Result<(), AppError> {
        self.record(RegistryCall::CreateVocabulary {
            dataset_id: dataset_id.to_string(),
            payload: vocabulary.clone(),
        })
    }

    async fn update_status(
        &self,
        dataset_id: &str,
        update: &LifecycleUpdate,
    ) -> Result<(), AppError> {
        self.record(RegistryCall::UpdateStatus {
            dataset_id: dataset_id.to_string(),
            update: update.clone(),
        })?;
        if self.failing_status == Some(update.status) {
            return Err(AppError::ClientError("HTTP 502".to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Builds a Resource Watch style metadata candidate.
pub fn entry(dataset: &str, language: &str, application: &str, name: &str) -> RawMetadataEntry {
    RawMetadataEntry {
        dataset: dataset.to_string(),
        language: language.to_string(),
        application: application.to_string(),
        name: Some(name.to_string()),
        description: Some(format!("{} description", name)),
        license: Some("CC-BY".to_string()),
        info: None,
        tags: Vec::new(),
    }
}

/// Builds a registered dataset reference.
pub fn registered(table_id: &str, dataset_id: &str) -> DatasetReference {
    DatasetReference::new(table_id).with_id(dataset_id)
}

/// Sync configuration without inter-item delay.
pub fn fast_sync() -> SyncConfig {
    SyncConfig::default().with_item_delay(Duration::ZERO)
}

/// Resource Watch registration service over the given mocks, without delay.
pub fn service(
    provider: MockProvider,
    registry: MockRegistry,
) -> RegistrationService<MockProvider, MockRegistry> {
    RegistrationService::with_config(
        provider,
        registry,
        ProviderConfig::resource_watch(),
        fast_sync(),
    )
}
