use rwsync_client::{ProviderAdapterEnum, RegistryClient};
use rwsync_core::error::AppError;
use rwsync_core::{ConnectorConfig, DatasetIntake, HttpConfig, ProviderKind, RegistrationService};

use crate::config::ServerConfig;

/// Registration service wired to the real provider and registry clients.
pub type ConnectorService = RegistrationService<ProviderAdapterEnum, RegistryClient>;

/// Shared application state for all handlers.
///
/// Axum clones this per request; the clients inside share their connection
/// pools.
#[derive(Clone)]
pub struct AppState {
    /// Inbound registration with lifecycle status writes
    pub intake: DatasetIntake<ProviderAdapterEnum, RegistryClient>,

    /// Provider this server registers datasets for
    pub provider: ProviderKind,
}

impl AppState {
    pub fn new(service: ConnectorService) -> Self {
        Self {
            provider: service.config().kind,
            intake: DatasetIntake::new(service),
        }
    }

    pub fn service(&self) -> &ConnectorService {
        self.intake.service()
    }
}

/// Builds the registration service from command line and file configuration.
///
/// The registry URL comes from `REGISTRY_URL`, then `[registry] url`.
///
/// # Errors
///
/// Returns `AppError::ConfigError` if no registry URL is configured or the
/// provider configuration is invalid.
pub fn build_service(
    config: &ServerConfig,
    connector: Option<&ConnectorConfig>,
) -> Result<ConnectorService, AppError> {
    let connector = connector.cloned().unwrap_or_default();
    let http_config = HttpConfig::default();

    let registry_url = config
        .registry_url
        .clone()
        .or_else(|| connector.registry.url.clone())
        .ok_or_else(|| {
            AppError::ConfigError(
                "Registry URL not configured: set REGISTRY_URL or [registry] url".to_string(),
            )
        })?;

    let mut registry = RegistryClient::new(&registry_url, &http_config)?;
    if let Some(token) = &config.registry_token {
        registry = registry.with_token(token);
    }

    let provider_config = connector.provider_config(config.provider)?;
    let provider = ProviderAdapterEnum::from_config(&provider_config, &http_config)?;

    Ok(RegistrationService::with_config(
        provider,
        registry,
        provider_config,
        connector.sync_config(),
    ))
}
