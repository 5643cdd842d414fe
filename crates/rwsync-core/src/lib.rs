//! rwsync Core - Domain types, normalization and the registration workflow.
//!
//! This crate provides the core functionality for rwsync, including:
//!
//! - **Domain models**: [`DatasetReference`], [`RawMetadataEntry`], [`CanonicalMetadata`], [`VocabularyPayload`]
//! - **Pure transforms**: candidate selection and normalization, license classification,
//!   organization resolution, vocabulary construction
//! - **Services**: [`RegistrationService`] for registration and batch resync, [`DatasetIntake`]
//!   for inbound registrations with lifecycle tracking
//! - **Traits**: [`ProviderAdapter`], [`RegistryGateway`] for dependency injection
//! - **Progress reporting**: [`ProgressReporter`] trait for decoupled logging/UI
//!
//! # Architecture
//!
//! This crate is designed to be reusable by different frontends (CLI, server, etc.).
//! Business logic is decoupled from I/O concerns through traits:
//!
//! - [`ProviderAdapter`] - abstracts upstream metadata access (e.g., Resource Watch API)
//! - [`RegistryGateway`] - abstracts the dataset registry
//!
//! HTTP implementations of both live in `rwsync-client`.
//!
//! # Example
//!
//! ```ignore
//! use rwsync_core::{DatasetReference, ProviderConfig, RegistrationService};
//! use rwsync_core::progress::TracingReporter;
//!
//! let service = RegistrationService::new(provider, registry, ProviderConfig::resource_watch());
//!
//! let reference = DatasetReference::new("0b9f0100-ce5b-430f-ad8f-3363efa05481").with_id("ds-1");
//! service.register_with_progress(&reference, Some("user-1"), false, &TracingReporter).await?;
//!
//! let summary = service.batch_resync_with_progress(&TracingReporter).await?;
//! ```

pub mod config;
pub mod error;
pub mod intake;
pub mod license;
pub mod models;
pub mod normalize;
pub mod organization;
pub mod progress;
pub mod registration;
pub mod scheduler;
pub mod sync;
pub mod traits;
pub mod vocabulary;

// Configuration
pub use config::{
    ConnectorConfig, HttpConfig, OrganizationRule, ProviderConfig, ProviderKind, SyncConfig,
    default_config_path, load_connector_config,
};

// Error handling
pub use error::AppError;

// Domain models
pub use models::{
    CanonicalMetadata, DatasetReference, LifecycleStatus, LifecycleUpdate, RawDatasetInfo,
    RawMetadataEntry, RegistrationOutcome, TagSet, VocabularyPayload,
};

// Batch results
pub use sync::{BatchResyncSummary, DatasetSyncResult, SyncOutcome};

// Progress reporting
pub use progress::{ProgressReporter, RegistrationStage, SilentReporter, SyncEvent, TracingReporter};

// Traits for dependency injection
pub use traits::{ProviderAdapter, RegistryGateway};

// Services (generic over trait implementations)
pub use intake::{DatasetIntake, IntakeOutcome};
pub use registration::RegistrationService;
pub use scheduler::run_scheduled_resync;
