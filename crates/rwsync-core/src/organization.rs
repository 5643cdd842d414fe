//! Organization resolution for upstream application identifiers.

use crate::config::{OrganizationRule, ProviderConfig, SLUG_PLACEHOLDER};
use crate::models::RawDatasetInfo;

/// Organization resolved for one application identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOrganization<'a> {
    /// Human-readable organization label.
    pub label: &'a str,
    /// Landing page template (`{slug}` placeholder), when the organization
    /// has its own dataset pages.
    pub landing_page_template: Option<&'a str>,
    /// Whether the label is the provider's catch-all label.
    pub is_catch_all: bool,
}

impl ResolvedOrganization<'_> {
    /// Returns the dataset landing page.
    ///
    /// Uses the organization's template when both the template and a slug
    /// from `dataset_info` are available, otherwise `fallback_url`.
    pub fn landing_page(&self, dataset_info: Option<&RawDatasetInfo>, fallback_url: &str) -> String {
        let slug = dataset_info.and_then(|info| info.slug.as_deref());
        match (self.landing_page_template, slug) {
            (Some(template), Some(slug)) => template.replace(SLUG_PLACEHOLDER, slug),
            _ => fallback_url.to_string(),
        }
    }
}

/// Resolves an application identifier against a rule table.
///
/// Matching is exact. Unknown identifiers resolve to `catch_all`.
pub fn resolve_with_rules<'a>(
    rules: &'a [OrganizationRule],
    catch_all: &'a str,
    application: &str,
) -> ResolvedOrganization<'a> {
    rules
        .iter()
        .find(|rule| rule.applications.iter().any(|a| a == application))
        .map(|rule| ResolvedOrganization {
            label: &rule.label,
            landing_page_template: rule.landing_page_template.as_deref(),
            is_catch_all: rule.label == catch_all,
        })
        .unwrap_or(ResolvedOrganization {
            label: catch_all,
            landing_page_template: None,
            is_catch_all: true,
        })
}

/// Resolves an application identifier using the provider configuration.
///
/// # Examples
///
/// ```
/// use rwsync_core::ProviderConfig;
/// use rwsync_core::organization::resolve_organization;
///
/// let config = ProviderConfig::resource_watch();
/// assert_eq!(resolve_organization(&config, "gfw").label, "Global Forest Watch");
/// assert_eq!(resolve_organization(&config, "unknown").label, "Resource Watch API");
/// ```
pub fn resolve_organization<'a>(
    config: &'a ProviderConfig,
    application: &str,
) -> ResolvedOrganization<'a> {
    resolve_with_rules(
        &config.organizations,
        &config.catch_all_organization,
        application,
    )
}
