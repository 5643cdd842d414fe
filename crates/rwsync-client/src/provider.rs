//! Provider adapter factory and enum dispatch.
//!
//! The [`ProviderAdapter`] trait uses `impl Future` return types (RPITIT),
//! which makes it not object-safe. [`ProviderAdapterEnum`] selects the
//! concrete client at runtime while keeping static dispatch.
//!
//! ```no_run
//! use rwsync_client::ProviderAdapterEnum;
//! use rwsync_core::traits::ProviderAdapter;
//! use rwsync_core::{HttpConfig, ProviderConfig, ProviderKind};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProviderConfig::for_kind(ProviderKind::WorldBank);
//! let provider = ProviderAdapterEnum::from_config(&config, &HttpConfig::default())?;
//! let tags = provider.fetch_vocabulary("SP.POP.TOTL").await?;
//! println!("{}: {:?}", provider.provider_name(), tags);
//! # Ok(())
//! # }
//! ```

use rwsync_core::error::AppError;
use rwsync_core::traits::ProviderAdapter;
use rwsync_core::{HttpConfig, ProviderConfig, ProviderKind, RawDatasetInfo, RawMetadataEntry};

use crate::{ResourceWatchClient, WorldBankClient};

/// Unified provider adapter wrapping the concrete clients.
#[derive(Clone)]
pub enum ProviderAdapterEnum {
    /// JSON:API provider with dataset, metadata and vocabulary endpoints.
    ResourceWatch(ResourceWatchClient),
    /// Indicator provider with embedded topics.
    WorldBank(WorldBankClient),
}

impl ProviderAdapterEnum {
    /// Builds the adapter variant selected by `config.kind`.
    pub fn from_config(config: &ProviderConfig, http_config: &HttpConfig) -> Result<Self, AppError> {
        Ok(match config.kind {
            ProviderKind::ResourceWatch => {
                Self::ResourceWatch(ResourceWatchClient::new(config.clone(), http_config)?)
            }
            ProviderKind::WorldBank => {
                Self::WorldBank(WorldBankClient::new(config.clone(), http_config)?)
            }
        })
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::ResourceWatch(_) => ProviderKind::ResourceWatch,
            Self::WorldBank(_) => ProviderKind::WorldBank,
        }
    }
}

impl ProviderAdapter for ProviderAdapterEnum {
    fn provider_name(&self) -> &str {
        match self {
            Self::ResourceWatch(c) => c.provider_name(),
            Self::WorldBank(c) => c.provider_name(),
        }
    }

    async fn fetch_dataset_info(&self, table_id: &str) -> Result<Option<RawDatasetInfo>, AppError> {
        match self {
            Self::ResourceWatch(c) => c.fetch_dataset_info(table_id).await,
            Self::WorldBank(c) => c.fetch_dataset_info(table_id).await,
        }
    }

    async fn fetch_metadata_candidates(
        &self,
        table_id: &str,
    ) -> Result<Vec<RawMetadataEntry>, AppError> {
        match self {
            Self::ResourceWatch(c) => c.fetch_metadata_candidates(table_id).await,
            Self::WorldBank(c) => c.fetch_metadata_candidates(table_id).await,
        }
    }

    async fn fetch_vocabulary(&self, table_id: &str) -> Result<Vec<String>, AppError> {
        match self {
            Self::ResourceWatch(c) => c.fetch_vocabulary(table_id).await,
            Self::WorldBank(c) => c.fetch_vocabulary(table_id).await,
        }
    }
}
