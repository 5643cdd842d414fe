//! Configuration types for rwsync components.
//!
//! Provider configuration is an immutable value built once (from a preset,
//! optionally overridden by `connector.toml`) and injected into the
//! [`RegistrationService`](crate::RegistrationService) at construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::license::default_accepted_licenses;

/// Placeholder substituted with a table or dataset identifier in URL templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Placeholder substituted with the provider dataset slug in landing-page templates.
pub const SLUG_PLACEHOLDER: &str = "{slug}";

// =============================================================================
// Provider Configuration
// =============================================================================

/// Provider type identifier.
///
/// Selects which provider adapter variant is used and which preset the
/// [`ProviderConfig`] starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Resource Watch API: JSON:API lists with explicit dataset, metadata and
    /// vocabulary endpoints.
    #[default]
    ResourceWatch,
    /// World Bank indicators API: two-element array with embedded topics.
    WorldBank,
}

impl ProviderKind {
    /// Provider name as recorded in the registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceWatch => "resourcewatch",
            Self::WorldBank => "worldbank",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resourcewatch" => Ok(Self::ResourceWatch),
            "worldbank" => Ok(Self::WorldBank),
            _ => Err(AppError::ConfigError(format!(
                "Unknown provider: '{}'. Valid options: resourcewatch, worldbank",
                s
            ))),
        }
    }
}

/// Maps one upstream application identifier to an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRule {
    /// Application identifiers matched exactly.
    pub applications: Vec<String>,
    /// Human-readable organization label.
    pub label: String,
    /// Landing page template with a `{slug}` placeholder.
    #[serde(default)]
    pub landing_page_template: Option<String>,
}

impl OrganizationRule {
    fn new(applications: &[&str], label: &str, landing_page_template: Option<&str>) -> Self {
        Self {
            applications: applications.iter().map(|a| a.to_string()).collect(),
            label: label.to_string(),
            landing_page_template: landing_page_template.map(str::to_string),
        }
    }
}

/// Static, per-provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Dataset info endpoint, `{id}` = table identifier. `None` when the
    /// provider has no such endpoint.
    pub dataset_url_template: Option<String>,
    /// Metadata endpoint, `{id}` = table identifier.
    pub metadata_url_template: String,
    /// Vocabulary endpoint, `{id}` = table identifier. `None` when tags are
    /// embedded in the metadata entries.
    pub vocabulary_url_template: Option<String>,
    /// Data source endpoint / download URL, `{id}` = candidate dataset id.
    pub data_source_endpoint_template: String,
    /// Language assigned to candidates when the provider has no language tag.
    pub default_language: String,
    /// Tag identifying this integration in the legacy vocabulary.
    pub baseline_tag: String,
    /// Organization label for unknown application identifiers.
    pub catch_all_organization: String,
    pub organizations: Vec<OrganizationRule>,
    pub accepted_licenses: Vec<String>,
}

impl ProviderConfig {
    /// Returns the preset for the given provider kind.
    pub fn for_kind(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::ResourceWatch => Self::resource_watch(),
            ProviderKind::WorldBank => Self::world_bank(),
        }
    }

    /// Resource Watch API preset.
    pub fn resource_watch() -> Self {
        Self {
            kind: ProviderKind::ResourceWatch,
            dataset_url_template: Some("https://api.resourcewatch.org/v1/dataset/{id}".to_string()),
            metadata_url_template: "https://api.resourcewatch.org/v1/dataset/{id}/metadata"
                .to_string(),
            vocabulary_url_template: Some(
                "https://api.resourcewatch.org/v1/dataset/{id}/vocabulary/knowledge_graph"
                    .to_string(),
            ),
            data_source_endpoint_template: "https://api.resourcewatch.org/v1/dataset/{id}"
                .to_string(),
            default_language: "en".to_string(),
            baseline_tag: "Resource Watch API".to_string(),
            catch_all_organization: "Resource Watch API".to_string(),
            organizations: vec![
                OrganizationRule::new(
                    &["prep"],
                    "PREP- Partnership for Resilience & Preparedness",
                    Some("https://www.prepdata.org/dataset/{slug}"),
                ),
                OrganizationRule::new(&["gfw"], "Global Forest Watch", None),
                OrganizationRule::new(&["gfw-climate"], "Global Forest Watch - Climate", None),
                OrganizationRule::new(&["aqueduct"], "Aqueduct", None),
                OrganizationRule::new(
                    &["forest-atlas", "rw"],
                    "Resource Watch",
                    Some("https://resourcewatch.org/data/explore/{slug}"),
                ),
            ],
            accepted_licenses: default_accepted_licenses(),
        }
    }

    /// World Bank indicators API preset.
    pub fn world_bank() -> Self {
        Self {
            kind: ProviderKind::WorldBank,
            dataset_url_template: None,
            metadata_url_template: "https://api.worldbank.org/v2/indicator/{id}?format=json"
                .to_string(),
            vocabulary_url_template: None,
            data_source_endpoint_template:
                "https://api.worldbank.org/v2/country/all/indicator/{id}?format=json".to_string(),
            default_language: "en".to_string(),
            baseline_tag: "World Bank API".to_string(),
            catch_all_organization: "World Bank".to_string(),
            organizations: Vec::new(),
            accepted_licenses: default_accepted_licenses(),
        }
    }

    /// Applies file overrides on top of this configuration.
    pub fn with_overrides(mut self, overrides: ProviderOverrides) -> Self {
        if let Some(v) = overrides.dataset_url_template {
            self.dataset_url_template = Some(v);
        }
        if let Some(v) = overrides.metadata_url_template {
            self.metadata_url_template = v;
        }
        if let Some(v) = overrides.vocabulary_url_template {
            self.vocabulary_url_template = Some(v);
        }
        if let Some(v) = overrides.data_source_endpoint_template {
            self.data_source_endpoint_template = v;
        }
        if let Some(v) = overrides.default_language {
            self.default_language = v;
        }
        if let Some(v) = overrides.baseline_tag {
            self.baseline_tag = v;
        }
        if let Some(v) = overrides.catch_all_organization {
            self.catch_all_organization = v;
        }
        if let Some(v) = overrides.organizations {
            self.organizations = v;
        }
        if let Some(v) = overrides.accepted_licenses {
            self.accepted_licenses = v;
        }
        self
    }

    /// Checks that every required template carries the `{id}` placeholder.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("metadata_url_template", Some(&self.metadata_url_template)),
            (
                "data_source_endpoint_template",
                Some(&self.data_source_endpoint_template),
            ),
            ("dataset_url_template", self.dataset_url_template.as_ref()),
            ("vocabulary_url_template", self.vocabulary_url_template.as_ref()),
        ];
        for (field, template) in required {
            match template {
                Some(template) if !template.contains(ID_PLACEHOLDER) => {
                    return Err(AppError::ConfigError(format!(
                        "{} must contain the {} placeholder: {}",
                        field, ID_PLACEHOLDER, template
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::resource_watch()
    }
}

/// Substitutes a percent-encoded identifier into a URL template.
///
/// # Examples
///
/// ```
/// use rwsync_core::config::render_template;
///
/// let url = render_template("https://api.example.org/v1/dataset/{id}/metadata", "abc");
/// assert_eq!(url, "https://api.example.org/v1/dataset/abc/metadata");
/// ```
pub fn render_template(template: &str, id: &str) -> String {
    template.replace(ID_PLACEHOLDER, &urlencoding::encode(id))
}

/// HTTP client configuration for external API calls.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("rwsync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Batch resync configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Delay between two consecutive datasets in a batch resync.
    ///
    /// Rate limit protecting the provider from bursts, not a retry mechanism.
    pub item_delay: Duration,
    /// Page size used when listing registered datasets. Large enough to be
    /// effectively unbounded.
    pub page_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            item_delay: Duration::from_secs(1),
            page_size: 99_999,
        }
    }
}

impl SyncConfig {
    /// Creates a new SyncConfig with a custom inter-item delay.
    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    /// Creates a new SyncConfig with a custom listing page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }
}

// =============================================================================
// Connector Configuration (connector.toml)
// =============================================================================

/// Optional overrides for the provider preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderOverrides {
    pub dataset_url_template: Option<String>,
    pub metadata_url_template: Option<String>,
    pub vocabulary_url_template: Option<String>,
    pub data_source_endpoint_template: Option<String>,
    pub default_language: Option<String>,
    pub baseline_tag: Option<String>,
    pub catch_all_organization: Option<String>,
    pub organizations: Option<Vec<OrganizationRule>>,
    pub accepted_licenses: Option<Vec<String>>,
}

/// `[provider]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSection {
    #[serde(default)]
    pub kind: ProviderKind,
    #[serde(flatten)]
    pub overrides: ProviderOverrides,
}

/// `[sync]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncSection {
    pub item_delay_ms: Option<u64>,
    pub page_size: Option<usize>,
}

/// `[registry]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySection {
    pub url: Option<String>,
}

/// Root configuration structure for connector.toml.
///
/// # Example
///
/// ```toml
/// [provider]
/// kind = "resourcewatch"
/// metadata_url_template = "https://staging-api.resourcewatch.org/v1/dataset/{id}/metadata"
///
/// [sync]
/// item_delay_ms = 2000
///
/// [registry]
/// url = "http://localhost:9000/v1"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default)]
    pub provider: ProviderSection,
    #[serde(default)]
    pub sync: SyncSection,
    #[serde(default)]
    pub registry: RegistrySection,
}

impl ConnectorConfig {
    /// Builds the provider configuration for `kind`.
    ///
    /// File overrides are applied only when the file targets the same
    /// provider kind.
    pub fn provider_config(&self, kind: ProviderKind) -> Result<ProviderConfig, AppError> {
        let config = if self.provider.kind == kind {
            ProviderConfig::for_kind(kind).with_overrides(self.provider.overrides.clone())
        } else {
            ProviderConfig::for_kind(kind)
        };
        config.validate()?;
        Ok(config)
    }

    /// Builds the batch resync configuration.
    pub fn sync_config(&self) -> SyncConfig {
        let mut config = SyncConfig::default();
        if let Some(ms) = self.sync.item_delay_ms {
            config = config.with_item_delay(Duration::from_millis(ms));
        }
        if let Some(size) = self.sync.page_size {
            config = config.with_page_size(size);
        }
        config
    }
}

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "connector.toml";

/// Returns the default configuration file path.
///
/// Path: `~/.config/rwsync/connector.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("rwsync").join(CONFIG_FILE_NAME))
}

/// Load connector configuration from a TOML file.
///
/// # Returns
/// * `Ok(Some(config))` - Configuration loaded successfully
/// * `Ok(None)` - No path given and no file at the default location
/// * `Err(e)` - An explicit path does not exist, or the file is invalid
pub fn load_connector_config(path: Option<PathBuf>) -> Result<Option<ConnectorConfig>, AppError> {
    let using_default_path = path.is_none();
    let config_path = match path.or_else(default_config_path) {
        Some(p) => p,
        None => return Ok(None),
    };

    if !config_path.exists() {
        if using_default_path {
            tracing::debug!(
                path = %config_path.display(),
                "No connector config found, using provider defaults"
            );
            return Ok(None);
        }
        return Err(AppError::ConfigError(format!(
            "Config file not found: {}",
            config_path.display()
        )));
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        AppError::ConfigError(format!(
            "Failed to read config file '{}': {}",
            config_path.display(),
            e
        ))
    })?;

    let config: ConnectorConfig = toml::from_str(&content).map_err(|e| {
        AppError::ConfigError(format!(
            "Invalid TOML in '{}': {}",
            config_path.display(),
            e
        ))
    })?;

    Ok(Some(config))
}
