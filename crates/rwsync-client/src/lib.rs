//! rwsync Client - HTTP clients for upstream providers and the registry
//!
//! This crate provides HTTP clients for interacting with:
//!
//! - [`resourcewatch`] - Resource Watch API (JSON:API metadata lists)
//! - [`worldbank`] - World Bank indicators API
//! - [`registry`] - the internal dataset registry
//!
//! # Overview
//!
//! Provider clients implement [`rwsync_core::traits::ProviderAdapter`] and
//! are selected at runtime through [`ProviderAdapterEnum`]. The registry
//! client implements [`rwsync_core::traits::RegistryGateway`]. All clients
//! share the single-attempt transport in [`http`].

pub mod http;
pub mod provider;
pub mod registry;
pub mod resourcewatch;
pub mod worldbank;

pub use provider::ProviderAdapterEnum;
pub use registry::RegistryClient;
pub use resourcewatch::ResourceWatchClient;
pub use worldbank::WorldBankClient;
