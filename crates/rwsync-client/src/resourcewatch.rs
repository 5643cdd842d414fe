//! Resource Watch API client.
//!
//! The rich provider shape: JSON:API style envelopes with a list of metadata
//! entries per dataset (one per language and application), and separate
//! endpoints for dataset info and knowledge-graph vocabulary.
//!
//! ```json
//! {
//!   "data": [
//!     {
//!       "id": "5b1d...",
//!       "type": "metadata",
//!       "attributes": {
//!         "dataset": "0b9f0100-ce5b-430f-ad8f-3363efa05481",
//!         "application": "rw",
//!         "language": "en",
//!         "name": "Water Stress",
//!         "license": "CC-BY",
//!         "info": {}
//!       }
//!     }
//!   ]
//! }
//! ```

use rwsync_core::config::render_template;
use rwsync_core::error::AppError;
use rwsync_core::traits::ProviderAdapter;
use rwsync_core::{HttpConfig, ProviderConfig, RawDatasetInfo, RawMetadataEntry};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::http::{HttpTransport, parse_url};

/// `{"data": T}` envelope.
#[derive(Deserialize, Debug)]
struct Envelope<T> {
    data: Option<T>,
}

/// One JSON:API resource.
#[derive(Deserialize, Debug)]
struct Resource<A> {
    attributes: A,
}

#[derive(Deserialize, Debug)]
struct MetadataAttributes {
    dataset: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    application: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    info: Option<Value>,
}

#[derive(Deserialize, Debug)]
struct VocabularyAttributes {
    #[serde(default)]
    tags: Vec<String>,
}

/// Extracts `data.attributes` from a dataset response.
///
/// Returns `None` when the shape is absent or unexpected.
pub fn parse_dataset_info(body: Value) -> Option<RawDatasetInfo> {
    serde_json::from_value::<Envelope<Resource<RawDatasetInfo>>>(body)
        .ok()
        .and_then(|envelope| envelope.data)
        .map(|resource| resource.attributes)
}

/// Extracts the metadata candidates from a metadata response, in order.
///
/// # Errors
///
/// Returns `AppError::UpstreamFormat` if `data` is missing, empty, or holds
/// an entry without `dataset`, `language` or `application`.
///
/// # Examples
///
/// ```
/// use rwsync_client::resourcewatch::parse_metadata_candidates;
/// use serde_json::json;
///
/// let body = json!({"data": [{"attributes": {
///     "dataset": "abc", "language": "en", "application": "gfw", "license": "CC-BY"
/// }}]});
/// let candidates = parse_metadata_candidates(body).unwrap();
/// assert_eq!(candidates[0].application, "gfw");
///
/// assert!(parse_metadata_candidates(json!({"data": []})).is_err());
/// ```
pub fn parse_metadata_candidates(body: Value) -> Result<Vec<RawMetadataEntry>, AppError> {
    let envelope: Envelope<Vec<Resource<MetadataAttributes>>> = serde_json::from_value(body)
        .map_err(|e| {
            AppError::UpstreamFormat(format!("Dataset metadata response format not valid: {}", e))
        })?;

    let entries = envelope.data.unwrap_or_default();
    if entries.is_empty() {
        return Err(AppError::UpstreamFormat(
            "Dataset metadata response format not valid: empty metadata list".to_string(),
        ));
    }

    Ok(entries
        .into_iter()
        .map(|resource| {
            let a = resource.attributes;
            RawMetadataEntry {
                dataset: a.dataset,
                language: a.language.unwrap_or_default(),
                application: a.application.unwrap_or_default(),
                name: a.name,
                description: a.description,
                license: a.license,
                info: a.info,
                tags: Vec::new(),
            }
        })
        .collect())
}

/// Extracts `data[0].attributes.tags` from a vocabulary response.
///
/// An absent or unexpected structure yields no tags.
pub fn parse_vocabulary(body: Value) -> Vec<String> {
    serde_json::from_value::<Envelope<Vec<Resource<VocabularyAttributes>>>>(body)
        .ok()
        .and_then(|envelope| envelope.data)
        .and_then(|resources| resources.into_iter().next())
        .map(|resource| resource.attributes.tags)
        .unwrap_or_default()
}

/// HTTP client for the Resource Watch API.
///
/// # Examples
///
/// ```no_run
/// use rwsync_client::ResourceWatchClient;
/// use rwsync_core::traits::ProviderAdapter;
/// use rwsync_core::{HttpConfig, ProviderConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ResourceWatchClient::new(ProviderConfig::resource_watch(), &HttpConfig::default())?;
/// let candidates = client
///     .fetch_metadata_candidates("0b9f0100-ce5b-430f-ad8f-3363efa05481")
///     .await?;
/// println!("Found {} metadata candidates", candidates.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ResourceWatchClient {
    http: HttpTransport,
    config: ProviderConfig,
}

impl ResourceWatchClient {
    /// Provider key used in registry listings.
    pub const PROVIDER_NAME: &'static str = "resourcewatch";

    /// Creates a client for the given provider configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if a URL template lacks the `{id}`
    /// placeholder, `AppError::ClientError` if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig, http_config: &HttpConfig) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self {
            http: HttpTransport::new(http_config)?,
            config,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

impl ProviderAdapter for ResourceWatchClient {
    fn provider_name(&self) -> &str {
        Self::PROVIDER_NAME
    }

    async fn fetch_dataset_info(&self, table_id: &str) -> Result<Option<RawDatasetInfo>, AppError> {
        let Some(template) = self.config.dataset_url_template.as_deref() else {
            return Ok(None);
        };
        let url = parse_url(&render_template(template, table_id))?;
        debug!(table_id, %url, "Fetching dataset info");
        let body = self.http.get_json(&url).await?;
        Ok(parse_dataset_info(body))
    }

    async fn fetch_metadata_candidates(
        &self,
        table_id: &str,
    ) -> Result<Vec<RawMetadataEntry>, AppError> {
        let url = parse_url(&render_template(
            &self.config.metadata_url_template,
            table_id,
        ))?;
        debug!(table_id, %url, "Fetching metadata");
        let body = self.http.get_json(&url).await?;
        parse_metadata_candidates(body)
    }

    async fn fetch_vocabulary(&self, table_id: &str) -> Result<Vec<String>, AppError> {
        let Some(template) = self.config.vocabulary_url_template.as_deref() else {
            return Ok(Vec::new());
        };
        let url = parse_url(&render_template(template, table_id))?;
        debug!(table_id, %url, "Fetching vocabulary");
        let body = self.http.get_json(&url).await?;
        Ok(parse_vocabulary(body))
    }
}
