use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use rwsync_client::{ProviderAdapterEnum, RegistryClient};
use rwsync_core::{
    AppError, BatchResyncSummary, ConnectorConfig, DatasetIntake, DatasetReference, HttpConfig,
    IntakeOutcome, RegistrationService, TracingReporter, load_connector_config,
};

mod config;

use config::{Command, Config};

type Service = RegistrationService<ProviderAdapterEnum, RegistryClient>;

/// Registry base URL used by `preview`, which never writes to the registry.
const PREVIEW_REGISTRY_URL: &str = "http://localhost/";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default subscriber")?;

    let config = Config::parse();

    let connector = load_connector_config(config.config.clone())
        .context("Failed to load connector configuration")?
        .unwrap_or_default();

    match &config.command {
        Command::Preview { dataset } => {
            let service = build_service(&config, &connector, None)?;
            let metadata = service
                .preview(&dataset.to_reference())
                .await
                .map_err(friendly)?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Command::Register {
            dataset,
            id,
            user,
            resync,
        } => {
            let service = build_service(&config, &connector, None)?;
            let reference = dataset.to_reference().with_id(id.clone());
            register(service, &reference, user.as_deref(), *resync).await?;
        }
        Command::Resync { delay_ms } => {
            let service = build_service(&config, &connector, *delay_ms)?;
            resync(&service).await?;
        }
    }

    Ok(())
}

fn friendly(err: AppError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

/// Wires the provider adapter and registry client into a registration service.
fn build_service(
    config: &Config,
    connector: &ConnectorConfig,
    delay_ms: Option<u64>,
) -> anyhow::Result<Service> {
    let http_config = HttpConfig::default();

    let registry_url = match (&config.registry_url, &connector.registry.url, &config.command) {
        (Some(url), _, _) | (None, Some(url), _) => url.clone(),
        (None, None, Command::Preview { .. }) => PREVIEW_REGISTRY_URL.to_string(),
        (None, None, _) => anyhow::bail!(
            "Registry URL not configured. Set REGISTRY_URL, pass --registry-url, or add [registry] url to connector.toml"
        ),
    };

    let mut registry = RegistryClient::new(&registry_url, &http_config)?;
    if let Some(token) = &config.registry_token {
        registry = registry.with_token(token);
    }

    let provider_config = connector.provider_config(config.provider)?;
    let provider = ProviderAdapterEnum::from_config(&provider_config, &http_config)?;

    let mut sync_config = connector.sync_config();
    if let Some(ms) = delay_ms {
        sync_config = sync_config.with_item_delay(Duration::from_millis(ms));
    }

    info!(provider = %config.provider, registry = %registry.base_url(), "Using provider");
    Ok(RegistrationService::with_config(
        provider,
        registry,
        provider_config,
        sync_config,
    ))
}

/// Registers one dataset.
///
/// A first registration goes through the intake and records the lifecycle
/// status; `--resync` only overwrites the metadata.
async fn register(
    service: Service,
    reference: &DatasetReference,
    user: Option<&str>,
    resync: bool,
) -> anyhow::Result<()> {
    let reporter = TracingReporter;

    if resync {
        let outcome = service
            .register_with_progress(reference, user, true, &reporter)
            .await
            .map_err(friendly)?;
        info!("Dataset {}: {}", reference.table_name, outcome.as_str());
        return Ok(());
    }

    let intake = DatasetIntake::new(service);
    match intake
        .register_with_progress(reference, user, &reporter)
        .await
        .map_err(friendly)?
    {
        IntakeOutcome::Registered => {
            info!("Dataset {} registered and marked active", reference.table_name);
            Ok(())
        }
        IntakeOutcome::Failed { error_message } => {
            anyhow::bail!("Registration failed (recorded in registry): {}", error_message)
        }
    }
}

/// Runs one batch resync; Ctrl+C stops it between datasets.
async fn resync(service: &Service) -> anyhow::Result<()> {
    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Cancellation requested, finishing current dataset...");
            ctrl_c_token.cancel();
        }
    });

    info!("═══════════════════════════════════════════════════════");
    info!("Starting batch resync");
    info!("═══════════════════════════════════════════════════════");

    let summary = service
        .batch_resync_with_progress_cancellable(&TracingReporter, cancel_token)
        .await
        .map_err(friendly)?;

    print_batch_summary(&summary);
    Ok(())
}

/// Print a summary of batch resync results.
fn print_batch_summary(summary: &BatchResyncSummary) {
    info!("");
    info!("═══════════════════════════════════════════════════════");
    if summary.cancelled {
        info!("BATCH RESYNC CANCELLED");
    } else {
        info!("BATCH RESYNC COMPLETE");
    }
    info!("═══════════════════════════════════════════════════════");
    info!("  Listed:              {}", summary.listed);
    info!("  ↑ Updated:           {}", summary.updated);
    info!("  ✗ Failed:            {}", summary.failed);
    info!("  - Skipped:           {}", summary.skipped);
    if let Some(ms) = summary.duration_ms() {
        info!("  Duration:            {:.1}s", ms as f64 / 1000.0);
    }

    if summary.failed > 0 {
        info!("───────────────────────────────────────────────────────");
        info!("Failed datasets:");
        for result in summary.failures() {
            if let Some(err) = &result.error {
                error!("  - {}: {}", result.table_name, err);
            }
        }
    }
    info!("═══════════════════════════════════════════════════════");

    if summary.is_clean() {
        info!("All datasets resynced successfully!");
    }
}
