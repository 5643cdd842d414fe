use clap::{Args, Parser, Subcommand};
use rwsync_core::{DatasetReference, ProviderKind};
use std::path::PathBuf;
use std::sync::LazyLock;

static VERSION_INFO: LazyLock<String> = LazyLock::new(|| {
    let version = env!("CARGO_PKG_VERSION");

    // Use VERGEN_GIT_SHA for the commit hash (with safe slicing)
    let commit = option_env!("VERGEN_GIT_SHA")
        .map(|s| s.chars().take(7).collect::<String>())
        .unwrap_or_else(|| "unknown".to_string());

    let built = option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown"); // YYYY-MM-DD
    let target = option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown");
    let rustc = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown");

    format!("{version}\ncommit: {commit}\nbuilt: {built}\ntarget: {target}\nrustc: {rustc}")
});

pub fn version_info() -> &'static str {
    &VERSION_INFO
}

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "rwsync")]
#[command(
    author,
    version = version_info(),
    about = "Sync provider dataset metadata into the dataset registry"
)]
#[command(after_help = "Examples:
  rwsync preview 0b9f0100-ce5b-430f-ad8f-3363efa05481 --language en
  rwsync register 0b9f0100-ce5b-430f-ad8f-3363efa05481 --id 6b2f9d5e --user 58333dcf
  rwsync resync --delay-ms 2000
  rwsync --provider worldbank preview SP.POP.TOTL

Providers:
  PROVIDER=resourcewatch (default) - Resource Watch API
  PROVIDER=worldbank               - World Bank indicators API")]
pub struct Config {
    /// Base URL of the dataset registry API
    #[arg(long, env = "REGISTRY_URL", global = true)]
    pub registry_url: Option<String>,

    /// Bearer token sent to the registry
    #[arg(long, env = "REGISTRY_TOKEN", hide_env_values = true, global = true)]
    pub registry_token: Option<String>,

    /// Upstream provider: resourcewatch (default) or worldbank
    #[arg(long, env = "PROVIDER", default_value = "resourcewatch", global = true)]
    pub provider: ProviderKind,

    /// Custom path to connector.toml configuration file
    #[arg(short, long, env = "CONNECTOR_CONFIG", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Provider-side selection of one dataset.
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Table / indicator identifier on the provider
    #[arg(value_name = "TABLE_ID")]
    pub table_id: String,

    /// Only consider metadata entries in this language
    #[arg(short, long)]
    pub language: Option<String>,

    /// Only consider metadata entries whose application contains this value
    #[arg(short, long)]
    pub application: Option<String>,

    /// Name used when the provider metadata has none
    #[arg(short, long)]
    pub name: Option<String>,
}

impl DatasetArgs {
    /// Builds the dataset reference these arguments describe.
    pub fn to_reference(&self) -> DatasetReference {
        let mut reference = DatasetReference::new(self.table_id.clone());
        if let Some(language) = &self.language {
            reference = reference.with_language(language.clone());
        }
        if let Some(application) = &self.application {
            reference = reference.with_application(application.clone());
        }
        if let Some(name) = &self.name {
            reference = reference.with_name(name.clone());
        }
        reference
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch and normalize a dataset's metadata without writing to the registry
    #[command(after_help = "Example: rwsync preview wri-forest-loss --application gfw")]
    Preview {
        #[command(flatten)]
        dataset: DatasetArgs,
    },
    /// Register one dataset and record its lifecycle status
    #[command(after_help = "Examples:
  rwsync register wri-forest-loss --id 6b2f9d5e          # First registration with tagging
  rwsync register wri-forest-loss --id 6b2f9d5e --resync # Overwrite metadata only")]
    Register {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Registry id of the dataset
        #[arg(long, value_name = "DATASET_ID")]
        id: String,

        /// Owning user recorded on the metadata
        #[arg(short, long)]
        user: Option<String>,

        /// Update existing metadata; skips tagging and the status write
        #[arg(long)]
        resync: bool,
    },
    /// Re-fetch and overwrite metadata of every registered dataset
    #[command(after_help = "Example: rwsync resync --delay-ms 500")]
    Resync {
        /// Delay between two datasets in milliseconds (overrides connector.toml)
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
    },
}
