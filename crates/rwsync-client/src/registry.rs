//! Registry API client.
//!
//! The registry is the internal dataset catalogue that receives normalized
//! metadata, vocabulary tags and lifecycle status. Requests go to paths under
//! a configurable base URL, optionally authenticated with a bearer token.
//!
//! | Operation | Request |
//! |---|---|
//! | list registered datasets | `GET /dataset?provider=<p>&page[size]=<n>&status=saved` |
//! | create metadata | `POST /dataset/<id>/metadata` |
//! | update metadata | `PATCH /dataset/<id>/metadata` |
//! | create vocabulary | `POST /dataset/<id>/vocabulary` |
//! | update lifecycle status | `PATCH /dataset/<id>` |

use reqwest::{Method, Url};
use rwsync_core::error::AppError;
use rwsync_core::traits::RegistryGateway;
use rwsync_core::{
    CanonicalMetadata, DatasetReference, HttpConfig, LifecycleUpdate, VocabularyPayload,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::http::{HttpTransport, parse_url};

/// Dataset listing response.
///
/// ```json
/// {"data": [{"id": "ds-1", "type": "dataset", "attributes": {"tableName": "abc", "userId": "u1"}}]}
/// ```
#[derive(Deserialize, Debug)]
struct DatasetList {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

#[derive(Deserialize, Debug)]
struct DatasetResource {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    attributes: DatasetReference,
}

/// Parses a dataset listing into references carrying their registry id.
///
/// A listing without `data` is treated as empty. Each row is parsed on its
/// own: a row whose attributes do not parse becomes a reference with only its
/// registry id, which batch resync records as skipped.
///
/// # Errors
///
/// Returns `AppError::UpstreamFormat` if the body or `data` is not the
/// expected shape.
pub fn parse_registered(body: Value) -> Result<Vec<DatasetReference>, AppError> {
    let list: DatasetList = serde_json::from_value(body)
        .map_err(|e| AppError::UpstreamFormat(format!("dataset listing not valid: {}", e)))?;

    Ok(list
        .data
        .unwrap_or_default()
        .into_iter()
        .map(parse_registered_row)
        .collect())
}

fn parse_registered_row(row: Value) -> DatasetReference {
    let id = row.get("id").and_then(Value::as_str).map(str::to_string);

    match serde_json::from_value::<DatasetResource>(row) {
        Ok(resource) => {
            let mut reference = resource.attributes;
            if resource.id.is_some() {
                reference.id = resource.id;
            }
            reference
        }
        Err(e) => {
            warn!(dataset_id = ?id, error = %e, "Listed dataset not valid");
            DatasetReference {
                id,
                ..Default::default()
            }
        }
    }
}

/// HTTP client for the registry API.
///
/// # Examples
///
/// ```no_run
/// use rwsync_client::RegistryClient;
/// use rwsync_core::HttpConfig;
/// use rwsync_core::traits::RegistryGateway;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = RegistryClient::new("http://localhost:9000/v1", &HttpConfig::default())?
///     .with_token("service-token");
/// let datasets = registry.list_registered("resourcewatch", 99_999).await?;
/// println!("{} datasets registered", datasets.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RegistryClient {
    http: HttpTransport,
    base_url: Url,
}

impl RegistryClient {
    /// Creates a registry client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` if the base URL cannot be parsed or
    /// cannot carry a path.
    pub fn new(base_url: &str, http_config: &HttpConfig) -> Result<Self, AppError> {
        let base_url = parse_url(base_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::InvalidUrl(format!(
                "registry URL cannot carry a path: {}",
                base_url
            )));
        }
        Ok(Self {
            http: HttpTransport::new(http_config)?,
            base_url,
        })
    }

    /// Authenticates every request with a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.http = self.http.with_bearer_token(token);
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Builds `<base>/dataset[/<id>[/<suffix>...]]`.
    pub(crate) fn dataset_url(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("dataset")
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn listing_url(&self, provider: &str, page_size: usize) -> Result<Url, AppError> {
        let mut url = self.dataset_url(&[])?;
        url.set_query(Some(&format!(
            "provider={}&page[size]={}&status=saved",
            provider, page_size
        )));
        Ok(url)
    }
}

impl RegistryGateway for RegistryClient {
    async fn list_registered(
        &self,
        provider: &str,
        page_size: usize,
    ) -> Result<Vec<DatasetReference>, AppError> {
        let url = self.listing_url(provider, page_size)?;
        debug!(%url, "Listing registered datasets");
        let body = self.http.get_json(&url).await?;
        parse_registered(body)
    }

    async fn create_metadata(
        &self,
        dataset_id: &str,
        metadata: &CanonicalMetadata,
    ) -> Result<(), AppError> {
        let url = self.dataset_url(&[dataset_id, "metadata"])?;
        self.http.send_json(Method::POST, &url, metadata).await
    }

    async fn update_metadata(
        &self,
        dataset_id: &str,
        metadata: &CanonicalMetadata,
    ) -> Result<(), AppError> {
        let url = self.dataset_url(&[dataset_id, "metadata"])?;
        self.http.send_json(Method::PATCH, &url, metadata).await
    }

    async fn create_vocabulary(
        &self,
        dataset_id: &str,
        vocabulary: &VocabularyPayload,
    ) -> Result<(), AppError> {
        let url = self.dataset_url(&[dataset_id, "vocabulary"])?;
        self.http.send_json(Method::POST, &url, vocabulary).await
    }

    async fn update_status(&self, dataset_id: &str, update: &LifecycleUpdate) -> Result<(), AppError> {
        let url = self.dataset_url(&[dataset_id])?;
        debug!(dataset_id, status = update.status.code(), "Updating dataset status");
        self.http.send_json(Method::PATCH, &url, update).await
    }
}
