use clap::Parser;
use rwsync_core::ProviderKind;
use std::path::PathBuf;

/// Server configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug, Clone)]
#[command(name = "rwsync-server")]
#[command(author, version, about = "Registration connector for provider dataset metadata")]
pub struct ServerConfig {
    /// Base URL of the dataset registry API
    ///
    /// Falls back to `[registry] url` in connector.toml.
    #[arg(long, env = "REGISTRY_URL")]
    pub registry_url: Option<String>,

    /// Bearer token sent to the registry
    #[arg(long, env = "REGISTRY_TOKEN", hide_env_values = true)]
    pub registry_token: Option<String>,

    /// Upstream provider (resourcewatch, worldbank)
    #[arg(long, env = "PROVIDER", default_value = "resourcewatch")]
    pub provider: ProviderKind,

    /// Path to connector.toml configuration file
    #[arg(long, env = "CONNECTOR_CONFIG")]
    pub connector_config: Option<PathBuf>,

    /// Seconds between scheduled batch resyncs (0 disables)
    #[arg(long, env = "RESYNC_INTERVAL_SECS", default_value = "0")]
    pub resync_interval_secs: u64,

    /// Server port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,
}
