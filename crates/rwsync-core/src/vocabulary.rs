//! Vocabulary payload construction for first-time registration.

use crate::config::ProviderConfig;
use crate::models::{TagSet, VocabularyPayload};

/// Builds the vocabulary payload for a newly registered dataset.
///
/// `legacy.tags` always starts with the provider's baseline tag; the
/// organization label is appended unless it is the catch-all label.
/// `knowledge_graph` is present only when `upstream_tags` is non-empty.
///
/// # Examples
///
/// ```
/// use rwsync_core::ProviderConfig;
/// use rwsync_core::vocabulary::build_vocabulary;
///
/// let config = ProviderConfig::resource_watch();
/// let payload = build_vocabulary(&config, "Global Forest Watch", vec!["forest".to_string()]);
/// assert_eq!(payload.legacy.tags, vec!["Resource Watch API", "Global Forest Watch"]);
/// assert_eq!(payload.knowledge_graph.unwrap().tags, vec!["forest"]);
/// ```
pub fn build_vocabulary(
    config: &ProviderConfig,
    organization_label: &str,
    upstream_tags: Vec<String>,
) -> VocabularyPayload {
    let mut legacy = vec![config.baseline_tag.clone()];
    if !organization_label.is_empty() && organization_label != config.catch_all_organization {
        legacy.push(organization_label.to_string());
    }

    let knowledge_graph = if upstream_tags.is_empty() {
        None
    } else {
        Some(TagSet {
            tags: upstream_tags,
        })
    };

    VocabularyPayload {
        legacy: TagSet { tags: legacy },
        knowledge_graph,
    }
}
