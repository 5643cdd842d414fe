//! Metadata candidate selection and normalization.
//!
//! Pure business logic: no I/O. Given the candidate list returned by a
//! provider adapter, selects one candidate and maps it to the registry's
//! canonical metadata record.
//!
//! # Selection Policy
//!
//! An empty filter value counts as unset.
//!
//! 1. If the reference has a source-language filter, keep candidates whose
//!    language equals it.
//! 2. If the reference has a source-application filter, keep candidates whose
//!    application contains it as a substring.
//! 3. If nothing is left, fail with [`AppError::UpstreamFormat`].
//! 4. Take the first remaining candidate, in provider order.

use crate::config::{ProviderConfig, render_template};
use crate::error::AppError;
use crate::license::classify_license;
use crate::models::{
    CanonicalMetadata, DatasetReference, PUBLISHED_STATUS, RawDatasetInfo, RawMetadataEntry,
};
use crate::organization::resolve_organization;

/// Message used when no candidate survives the filters.
pub const NO_MATCHING_CANDIDATE: &str = "no matching metadata candidate";

/// Selects the canonical source candidate for a dataset reference.
///
/// # Examples
///
/// ```
/// use rwsync_core::{DatasetReference, RawMetadataEntry};
/// use rwsync_core::normalize::select_candidate;
///
/// let candidates = vec![
///     RawMetadataEntry { language: "es".into(), application: "rw".into(), ..Default::default() },
///     RawMetadataEntry { language: "en".into(), application: "gfw".into(), ..Default::default() },
/// ];
/// let reference = DatasetReference::new("t-1").with_language("en");
/// let selected = select_candidate(&candidates, &reference).unwrap();
/// assert_eq!(selected.application, "gfw");
/// ```
pub fn select_candidate<'a>(
    candidates: &'a [RawMetadataEntry],
    reference: &DatasetReference,
) -> Result<&'a RawMetadataEntry, AppError> {
    let language = reference.source_language.as_deref().filter(|s| !s.is_empty());
    let application = reference.source_application.as_deref().filter(|s| !s.is_empty());

    candidates
        .iter()
        .filter(|c| language.is_none_or(|lang| c.language == lang))
        .find(|c| application.is_none_or(|app| c.application.contains(app)))
        .ok_or_else(|| AppError::UpstreamFormat(NO_MATCHING_CANDIDATE.to_string()))
}

/// Maps one selected candidate to the canonical metadata record.
pub fn normalize_entry(
    config: &ProviderConfig,
    reference: &DatasetReference,
    entry: &RawMetadataEntry,
    dataset_info: Option<&RawDatasetInfo>,
    user_id: Option<&str>,
) -> CanonicalMetadata {
    let data_download_url = render_template(&config.data_source_endpoint_template, &entry.dataset);
    let organization = resolve_organization(config, &entry.application);
    let data_source_url = organization.landing_page(dataset_info, &data_download_url);

    CanonicalMetadata {
        language: entry.language.clone(),
        name: entry.name.clone().or_else(|| reference.name.clone()),
        description: entry.description.clone(),
        source_organization: organization.label.to_string(),
        data_source_url,
        data_source_endpoint: data_download_url.clone(),
        data_download_url,
        status: PUBLISHED_STATUS.to_string(),
        license: classify_license(entry.license.as_deref(), &config.accepted_licenses),
        user_id: user_id.map(str::to_string),
        info: entry.info.clone(),
    }
}

/// Selects a candidate and normalizes it.
///
/// Deterministic: the same candidates, reference and configuration always
/// produce the same record.
pub fn normalize(
    config: &ProviderConfig,
    reference: &DatasetReference,
    candidates: &[RawMetadataEntry],
    dataset_info: Option<&RawDatasetInfo>,
    user_id: Option<&str>,
) -> Result<CanonicalMetadata, AppError> {
    let entry = select_candidate(candidates, reference)?;
    Ok(normalize_entry(config, reference, entry, dataset_info, user_id))
}
