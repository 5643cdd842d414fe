//! Inbound registration handling.
//!
//! [`DatasetIntake`] is what an inbound "register dataset" request runs: a
//! first-time registration followed by the lifecycle status write that the
//! registration workflow itself never performs.

use tracing::{error, info};

use crate::progress::{ProgressReporter, SilentReporter};
use crate::registration::RegistrationService;
use crate::traits::{ProviderAdapter, RegistryGateway};
use crate::{AppError, DatasetReference, LifecycleUpdate};

/// Result of one inbound registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Registered and marked active.
    Registered,
    /// Registration failed; the dataset was marked failed with this message.
    Failed { error_message: String },
}

impl IntakeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, IntakeOutcome::Registered)
    }
}

/// Runs first-time registrations and records their lifecycle status.
pub struct DatasetIntake<P, G>
where
    P: ProviderAdapter,
    G: RegistryGateway,
{
    service: RegistrationService<P, G>,
}

impl<P, G> Clone for DatasetIntake<P, G>
where
    P: ProviderAdapter,
    G: RegistryGateway,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<P, G> DatasetIntake<P, G>
where
    P: ProviderAdapter,
    G: RegistryGateway,
{
    pub fn new(service: RegistrationService<P, G>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &RegistrationService<P, G> {
        &self.service
    }

    /// Registers a dataset and marks it active, or failed with the error's
    /// name and message.
    ///
    /// `user_id` falls back to the reference's owner when absent. A failed
    /// registration is not an error: it is reported as
    /// [`IntakeOutcome::Failed`] once the failure has been recorded.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidDatasetReference`] if the reference has no
    ///   registry id, since no status can be recorded without one.
    /// - Any error from the failed-status write. A failed active-status write
    ///   is itself recorded as a failure.
    pub async fn register(
        &self,
        reference: &DatasetReference,
        user_id: Option<&str>,
    ) -> Result<IntakeOutcome, AppError> {
        self.register_with_progress(reference, user_id, &SilentReporter)
            .await
    }

    /// Same as [`register`](Self::register), with progress reporting.
    pub async fn register_with_progress<R: ProgressReporter>(
        &self,
        reference: &DatasetReference,
        user_id: Option<&str>,
        reporter: &R,
    ) -> Result<IntakeOutcome, AppError> {
        let dataset_id = reference.require_id()?;
        let user_id = user_id.or(reference.user_id.as_deref());

        let registered = match self
            .service
            .register_with_progress(reference, user_id, false, reporter)
            .await
        {
            Ok(outcome) => self
                .service
                .registry()
                .update_status(dataset_id, &LifecycleUpdate::active())
                .await
                .map(|()| outcome),
            Err(e) => Err(e),
        };

        match registered {
            Ok(outcome) => {
                info!(
                    dataset_id,
                    table_name = %reference.table_name,
                    outcome = outcome.as_str(),
                    "Dataset marked active"
                );
                Ok(IntakeOutcome::Registered)
            }
            Err(e) => {
                let update = LifecycleUpdate::failed(&e);
                error!(
                    dataset_id,
                    table_name = %reference.table_name,
                    error = %e,
                    "Registration failed, marking dataset failed"
                );
                self.service
                    .registry()
                    .update_status(dataset_id, &update)
                    .await?;
                Ok(IntakeOutcome::Failed {
                    error_message: update.error_message.unwrap_or_default(),
                })
            }
        }
    }
}
