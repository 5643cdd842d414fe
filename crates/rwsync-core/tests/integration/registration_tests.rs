//! Integration tests for single-dataset registration.

use rwsync_core::{AppError, DatasetReference, RawMetadataEntry, RegistrationOutcome};
use serde_json::json;

use crate::integration::common::{
    Failure, MockProvider, MockRegistry, RegistryCall, entry, registered, service,
};

const TABLE: &str = "0b9f0100-ce5b-430f-ad8f-3363efa05481";

#[tokio::test]
async fn test_first_registration_creates_metadata_and_vocabulary() {
    // Arrange
    let candidate = RawMetadataEntry {
        dataset: "ds-forest".to_string(),
        language: "en".to_string(),
        application: "gfw".to_string(),
        name: Some("Forest Loss".to_string()),
        description: None,
        license: Some("proprietary".to_string()),
        info: Some(json!({"citation": "Hansen"})),
        tags: Vec::new(),
    };
    let provider = MockProvider::new()
        .with_candidates(TABLE, vec![candidate])
        .with_vocabulary(TABLE, &["forest", "deforestation"]);
    let registry = MockRegistry::new();
    let service = service(provider.clone(), registry.clone());

    // Act
    let outcome = service
        .register(&registered(TABLE, "ds-1"), Some("user-1"), false)
        .await
        .unwrap();

    // Assert
    assert_eq!(outcome, RegistrationOutcome::Registered);
    assert_eq!(registry.ops(), vec!["create_metadata", "create_vocabulary"]);

    let calls = registry.calls();
    let RegistryCall::CreateMetadata {
        dataset_id,
        metadata,
    } = &calls[0]
    else {
        panic!("expected metadata create, got {:?}", calls[0]);
    };
    assert_eq!(dataset_id, "ds-1");
    assert_eq!(metadata.source_organization, "Global Forest Watch");
    assert_eq!(metadata.license, "Other");
    assert_eq!(metadata.name.as_deref(), Some("Forest Loss"));
    assert_eq!(metadata.user_id.as_deref(), Some("user-1"));
    assert_eq!(metadata.status, "published");

    let RegistryCall::CreateVocabulary { payload, .. } = &calls[1] else {
        panic!("expected vocabulary create, got {:?}", calls[1]);
    };
    assert_eq!(
        serde_json::to_value(payload).unwrap(),
        json!({
            "legacy": {"tags": ["Resource Watch API", "Global Forest Watch"]},
            "knowledge_graph": {"tags": ["forest", "deforestation"]}
        })
    );

    assert_eq!(
        provider.calls(),
        vec![
            format!("dataset_info:{}", TABLE),
            format!("metadata:{}", TABLE),
            format!("vocabulary:{}", TABLE),
        ]
    );
}

#[tokio::test]
async fn test_resync_updates_metadata_without_vocabulary() {
    let provider = MockProvider::new()
        .with_candidates(TABLE, vec![entry("ds", "en", "rw", "Water Stress")])
        .with_vocabulary(TABLE, &["water"]);
    let registry = MockRegistry::new();
    let service = service(provider.clone(), registry.clone());

    let outcome = service
        .register(&registered(TABLE, "ds-1"), None, true)
        .await
        .unwrap();

    assert_eq!(outcome, RegistrationOutcome::ResyncUpdated);
    assert_eq!(registry.ops(), vec!["update_metadata"]);
    assert!(
        !provider.calls().iter().any(|c| c.starts_with("vocabulary")),
        "resync must not fetch vocabulary"
    );
}

#[tokio::test]
async fn test_resync_ignores_vocabulary_failures() {
    let provider = MockProvider::new()
        .with_candidates(TABLE, vec![entry("ds", "en", "rw", "Water Stress")])
        .failing("vocabulary", TABLE, Failure::Transport);
    let registry = MockRegistry::new().failing("create_vocabulary");
    let service = service(provider, registry.clone());

    let outcome = service.register(&registered(TABLE, "ds-1"), None, true).await;

    assert!(outcome.is_ok());
    assert_eq!(registry.ops(), vec!["update_metadata"]);
}

#[tokio::test]
async fn test_filters_eliminating_all_candidates_writes_nothing() {
    let provider = MockProvider::new().with_candidates(
        TABLE,
        vec![entry("a", "en", "rw", "A"), entry("b", "es", "gfw", "B")],
    );
    let registry = MockRegistry::new();
    let service = service(provider, registry.clone());

    let reference = registered(TABLE, "ds-1")
        .with_language("fr")
        .with_application("rw");
    let err = service.register(&reference, None, false).await.unwrap_err();

    assert!(matches!(err, AppError::MetadataError(_)));
    assert!(matches!(err.root_cause(), AppError::UpstreamFormat(_)));
    assert!(registry.calls().is_empty(), "no write may reach the registry");
}

#[tokio::test]
async fn test_selection_uses_filters_and_first_match() {
    let provider = MockProvider::new().with_candidates(
        TABLE,
        vec![
            entry("a", "es", "gfw", "Spanish GFW"),
            entry("b", "en", "rw", "English RW"),
            entry("c", "en", "gfw", "English GFW"),
            entry("d", "en", "gfw-climate", "English GFW Climate"),
        ],
    );
    let registry = MockRegistry::new();
    let service = service(provider, registry.clone());

    let reference = registered(TABLE, "ds-1")
        .with_language("en")
        .with_application("gfw");
    service.register(&reference, None, true).await.unwrap();

    let calls = registry.calls();
    let RegistryCall::UpdateMetadata { metadata, .. } = &calls[0] else {
        panic!("expected metadata update");
    };
    assert_eq!(metadata.name.as_deref(), Some("English GFW"));
    assert_eq!(
        metadata.data_download_url,
        "https://api.resourcewatch.org/v1/dataset/c"
    );
}

#[tokio::test]
async fn test_empty_candidate_list_is_metadata_error() {
    let provider = MockProvider::new().with_candidates(TABLE, Vec::new());
    let registry = MockRegistry::new();
    let service = service(provider, registry.clone());

    let err = service
        .register(&registered(TABLE, "ds-1"), None, false)
        .await
        .unwrap_err();

    assert_eq!(err.name(), "MetadataError");
    assert!(err.is_upstream_format());
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_dataset_info_transport_error_is_fatal() {
    let provider = MockProvider::new()
        .with_candidates(TABLE, vec![entry("ds", "en", "rw", "A")])
        .failing("dataset_info", TABLE, Failure::Transport);
    let registry = MockRegistry::new();
    let service = service(provider, registry.clone());

    let err = service
        .register(&registered(TABLE, "ds-1"), None, false)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MetadataError(_)));
    assert!(err.is_transport());
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_metadata_write_failure_skips_tagging() {
    let provider = MockProvider::new()
        .with_candidates(TABLE, vec![entry("ds", "en", "rw", "A")])
        .with_vocabulary(TABLE, &["water"]);
    let registry = MockRegistry::new().failing("create_metadata");
    let service = service(provider.clone(), registry.clone());

    let err = service
        .register(&registered(TABLE, "ds-1"), None, false)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MetadataError(_)));
    assert!(err.is_transport());
    assert_eq!(registry.ops(), vec!["create_metadata"]);
    assert!(!provider.calls().iter().any(|c| c.starts_with("vocabulary")));
}

#[tokio::test]
async fn test_vocabulary_fetch_failure_keeps_metadata() {
    let provider = MockProvider::new()
        .with_candidates(TABLE, vec![entry("ds", "en", "rw", "A")])
        .failing("vocabulary", TABLE, Failure::Format);
    let registry = MockRegistry::new();
    let service = service(provider, registry.clone());

    let err = service
        .register(&registered(TABLE, "ds-1"), None, false)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::VocabularyError(_)));
    assert!(err.to_string().starts_with("Error tagging dataset:"));
    // Metadata written before tagging stays in place
    assert_eq!(registry.ops(), vec!["create_metadata"]);
}

#[tokio::test]
async fn test_vocabulary_write_failure_is_vocabulary_error() {
    let provider = MockProvider::new().with_candidates(TABLE, vec![entry("ds", "en", "rw", "A")]);
    let registry = MockRegistry::new().failing("create_vocabulary");
    let service = service(provider, registry.clone());

    let err = service
        .register(&registered(TABLE, "ds-1"), None, false)
        .await
        .unwrap_err();

    assert_eq!(err.name(), "VocabularyError");
    assert!(err.is_transport());
    assert_eq!(registry.ops(), vec!["create_metadata", "create_vocabulary"]);
}

#[tokio::test]
async fn test_catch_all_organization_and_no_upstream_tags() {
    let provider = MockProvider::new()
        .with_candidates(TABLE, vec![entry("ds", "en", "some-partner-app", "A")]);
    let registry = MockRegistry::new();
    let service = service(provider, registry.clone());

    service
        .register(&registered(TABLE, "ds-1"), None, false)
        .await
        .unwrap();

    let calls = registry.calls();
    let RegistryCall::CreateMetadata { metadata, .. } = &calls[0] else {
        panic!("expected metadata create");
    };
    assert_eq!(metadata.source_organization, "Resource Watch API");

    let RegistryCall::CreateVocabulary { payload, .. } = &calls[1] else {
        panic!("expected vocabulary create");
    };
    assert_eq!(
        serde_json::to_value(payload).unwrap(),
        json!({"legacy": {"tags": ["Resource Watch API"]}})
    );
}

#[tokio::test]
async fn test_landing_page_uses_dataset_slug() {
    let provider = MockProvider::new()
        .with_candidates(TABLE, vec![entry("ds", "en", "prep", "Sea level")])
        .with_slug(TABLE, "sea-level-rise");
    let registry = MockRegistry::new();
    let service = service(provider, registry.clone());

    service
        .register(&registered(TABLE, "ds-1"), None, true)
        .await
        .unwrap();

    let calls = registry.calls();
    let RegistryCall::UpdateMetadata { metadata, .. } = &calls[0] else {
        panic!("expected metadata update");
    };
    assert_eq!(
        metadata.data_source_url,
        "https://www.prepdata.org/dataset/sea-level-rise"
    );
    assert_eq!(
        metadata.data_source_endpoint,
        "https://api.resourcewatch.org/v1/dataset/ds"
    );
}

#[tokio::test]
async fn test_missing_registry_id_is_rejected_before_fetching() {
    let provider = MockProvider::new().with_candidates(TABLE, vec![entry("ds", "en", "rw", "A")]);
    let registry = MockRegistry::new();
    let service = service(provider.clone(), registry.clone());

    let err = service
        .register(&DatasetReference::new(TABLE), None, false)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidDatasetReference(_)));
    assert!(provider.calls().is_empty());
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_preview_writes_nothing() {
    let provider = MockProvider::new()
        .with_candidates(TABLE, vec![entry("ds", "en", "aqueduct", "Water Risk")]);
    let registry = MockRegistry::new();
    let service = service(provider, registry.clone());

    let reference = DatasetReference::new(TABLE).with_user("owner-7");
    let metadata = service.preview(&reference).await.unwrap();

    assert_eq!(metadata.source_organization, "Aqueduct");
    assert_eq!(metadata.license, "CC-BY");
    assert_eq!(metadata.user_id.as_deref(), Some("owner-7"));
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_repeated_registration_is_deterministic() {
    let provider = MockProvider::new().with_candidates(
        TABLE,
        vec![entry("a", "en", "rw", "A"), entry("b", "en", "rw", "B")],
    );
    let registry = MockRegistry::new();
    let service = service(provider, registry.clone());
    let reference = registered(TABLE, "ds-1");

    for _ in 0..3 {
        service.register(&reference, Some("u"), true).await.unwrap();
    }

    let records: Vec<_> = registry
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            RegistryCall::UpdateMetadata { metadata, .. } => Some(metadata),
            _ => None,
        })
        .collect();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r == &records[0]));
    assert_eq!(records[0].name.as_deref(), Some("A"));
}
