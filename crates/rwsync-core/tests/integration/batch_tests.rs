//! Integration tests for batch resync, cancellation and the resync schedule.

use std::time::{Duration, Instant};

use rwsync_core::{
    DatasetReference, ProviderConfig, RegistrationService, SyncConfig, SyncOutcome,
    run_scheduled_resync,
};
use rwsync_core::progress::SilentReporter;
use tokio_util::sync::CancellationToken;

use crate::integration::common::{
    Failure, MockProvider, MockRegistry, RegistryCall, entry, registered, service,
};

/// Five registered datasets, `t1`..`t5` with ids `d1`..`d5`.
fn five_datasets() -> Vec<DatasetReference> {
    (1..=5)
        .map(|i| registered(&format!("t{}", i), &format!("d{}", i)).with_user(format!("u{}", i)))
        .collect()
}

fn provider_for_all(tables: &[&str]) -> MockProvider {
    tables.iter().fold(MockProvider::new(), |provider, table| {
        provider.with_candidates(table, vec![entry(&format!("up-{}", table), "en", "rw", table)])
    })
}

#[tokio::test]
async fn test_failing_item_does_not_abort_batch() {
    // Arrange: dataset #3 has no candidate matching its language filter
    let mut datasets = five_datasets();
    datasets[2] = datasets[2].clone().with_language("fr");
    let provider = provider_for_all(&["t1", "t2", "t3", "t4", "t5"]);
    let registry = MockRegistry::new().with_registered(datasets);
    let service = service(provider, registry.clone());

    // Act
    let summary = service.batch_resync().await.unwrap();

    // Assert
    assert_eq!(summary.listed, 5);
    assert_eq!(summary.updated, 4);
    assert_eq!(summary.failed, 1);
    assert!(!summary.cancelled);
    assert!(summary.finished_at.is_some());

    let outcomes: Vec<_> = summary.results.iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            SyncOutcome::Updated,
            SyncOutcome::Updated,
            SyncOutcome::Failed,
            SyncOutcome::Updated,
            SyncOutcome::Updated,
        ]
    );
    assert!(summary.results[2].error.as_deref().unwrap().contains("metadata"));
    assert!(summary.results.iter().enumerate().all(|(i, r)| (i == 2) == r.error.is_some()));

    let updated: Vec<_> = registry
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            RegistryCall::UpdateMetadata { dataset_id, .. } => Some(dataset_id),
            _ => None,
        })
        .collect();
    assert_eq!(updated, vec!["d1", "d2", "d4", "d5"]);
}

#[tokio::test]
async fn test_transport_failure_mid_batch_is_isolated() {
    let provider = provider_for_all(&["t1", "t2", "t3"]).failing("metadata", "t2", Failure::Transport);
    let registry = MockRegistry::new().with_registered(five_datasets()[..3].to_vec());
    let service = service(provider, registry);

    let summary = service.batch_resync().await.unwrap();

    assert_eq!(summary.updated, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures().next().unwrap().table_name, "t2");
}

#[tokio::test]
async fn test_batch_never_tags_and_uses_owner() {
    let provider = provider_for_all(&["t1", "t2"]).with_vocabulary("t1", &["water"]);
    let registry = MockRegistry::new().with_registered(five_datasets()[..2].to_vec());
    let service = service(provider.clone(), registry.clone());

    service.batch_resync().await.unwrap();

    assert_eq!(registry.ops(), vec!["list", "update_metadata", "update_metadata"]);
    assert!(!provider.calls().iter().any(|c| c.starts_with("vocabulary")));

    let owners: Vec<_> = registry
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            RegistryCall::UpdateMetadata { metadata, .. } => metadata.user_id,
            _ => None,
        })
        .collect();
    assert_eq!(owners, vec!["u1", "u2"]);
}

#[tokio::test]
async fn test_listing_uses_provider_and_page_size() {
    let registry = MockRegistry::new();
    let service = service(MockProvider::new(), registry.clone());

    let summary = service.batch_resync().await.unwrap();

    assert_eq!(summary.total(), 0);
    let calls = registry.calls();
    let RegistryCall::List {
        provider,
        page_size,
    } = &calls[0]
    else {
        panic!("expected listing call");
    };
    assert_eq!(provider, "resourcewatch");
    assert_eq!(*page_size, 99_999);
}

#[tokio::test]
async fn test_listing_failure_is_returned() {
    let registry = MockRegistry::new().failing("list");
    let service = service(MockProvider::new(), registry);

    let err = service.batch_resync().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_unusable_reference_is_skipped() {
    let datasets = vec![
        registered("t1", "d1"),
        DatasetReference::new("t2"),
        registered("", "d3"),
        registered("t4", "d4"),
    ];
    let provider = provider_for_all(&["t1", "t2", "t4"]);
    let registry = MockRegistry::new().with_registered(datasets);
    let service = service(provider.clone(), registry);

    let summary = service.batch_resync().await.unwrap();

    assert_eq!(summary.updated, 2);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.failed, 0);
    assert!(!provider.calls().iter().any(|c| c.ends_with(":t2")));
}

#[tokio::test]
async fn test_invalid_listing_row_does_not_abort_batch() {
    // Row 2 came back from the listing with unparseable attributes
    let datasets = vec![
        registered("t1", "d1"),
        DatasetReference::default().with_id("d2"),
        registered("t3", "d3"),
    ];
    let provider = provider_for_all(&["t1", "t3"]);
    let registry = MockRegistry::new().with_registered(datasets);
    let service = service(provider, registry.clone());

    let summary = service.batch_resync().await.unwrap();

    assert_eq!(summary.listed, 3);
    assert_eq!(summary.updated, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.results[1].outcome, SyncOutcome::Skipped);

    let updated: Vec<_> = registry
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            RegistryCall::UpdateMetadata { dataset_id, .. } => Some(dataset_id),
            _ => None,
        })
        .collect();
    assert_eq!(updated, vec!["d1", "d3"]);
}

#[tokio::test]
async fn test_item_delay_between_datasets() {
    let provider = provider_for_all(&["t1", "t2", "t3"]);
    let registry = MockRegistry::new().with_registered(five_datasets()[..3].to_vec());
    let service = RegistrationService::with_config(
        provider,
        registry,
        ProviderConfig::resource_watch(),
        SyncConfig::default().with_item_delay(Duration::from_millis(40)),
    );

    let start = Instant::now();
    let summary = service.batch_resync().await.unwrap();

    assert_eq!(summary.updated, 3);
    // Two gaps between three items
    assert!(start.elapsed() >= Duration::from_millis(80));
}

#[tokio::test]
async fn test_cancellation_before_start() {
    let provider = provider_for_all(&["t1", "t2"]);
    let registry = MockRegistry::new().with_registered(five_datasets()[..2].to_vec());
    let service = service(provider, registry.clone());

    let token = CancellationToken::new();
    token.cancel();

    let summary = service.batch_resync_cancellable(token).await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.total(), 0);
    assert_eq!(registry.ops(), vec!["list"]);
}

#[tokio::test]
async fn test_cancellation_interrupts_item_delay() {
    let provider = provider_for_all(&["t1", "t2", "t3"]);
    let registry = MockRegistry::new().with_registered(five_datasets()[..3].to_vec());
    let service = RegistrationService::with_config(
        provider,
        registry.clone(),
        ProviderConfig::resource_watch(),
        SyncConfig::default().with_item_delay(Duration::from_secs(30)),
    );

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let summary = service.batch_resync_cancellable(token).await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.updated, 1, "only the first dataset ran");
    assert!(start.elapsed() < Duration::from_secs(5));
    // The completed write is kept
    assert_eq!(registry.ops(), vec!["list", "update_metadata"]);
}

#[tokio::test]
async fn test_scheduled_resync_runs_until_cancelled() {
    let provider = provider_for_all(&["t1"]);
    let registry = MockRegistry::new().with_registered(five_datasets()[..1].to_vec());
    let service = service(provider, registry.clone());

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        canceller.cancel();
    });

    let runs =
        run_scheduled_resync(&service, Duration::from_millis(20), &SilentReporter, token).await;

    assert!(runs >= 1);
    let listings = registry.ops().iter().filter(|op| **op == "list").count() as u64;
    assert_eq!(listings, runs);
}

#[tokio::test]
async fn test_scheduled_resync_survives_listing_failures() {
    let registry = MockRegistry::new().failing("list");
    let service = service(MockProvider::new(), registry.clone());

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        canceller.cancel();
    });

    let runs =
        run_scheduled_resync(&service, Duration::from_millis(20), &SilentReporter, token).await;

    assert!(runs >= 2, "loop continues after a failed run, got {}", runs);
}

#[tokio::test]
async fn test_zero_interval_disables_schedule() {
    let registry = MockRegistry::new();
    let service = service(MockProvider::new(), registry.clone());

    let runs =
        run_scheduled_resync(&service, Duration::ZERO, &SilentReporter, CancellationToken::new())
            .await;

    assert_eq!(runs, 0);
    assert!(registry.calls().is_empty());
}
