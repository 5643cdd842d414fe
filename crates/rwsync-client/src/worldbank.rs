//! World Bank indicators API client.
//!
//! The compact provider shape: the response is a two-element array of page
//! info followed by the indicator list. Topics are embedded in each indicator
//! and double as the upstream tag list.
//!
//! ```json
//! [
//!   {"page": 1, "pages": 1, "per_page": 50, "total": 1},
//!   [
//!     {
//!       "id": "SP.POP.TOTL",
//!       "name": "Population, total",
//!       "unit": "",
//!       "source": {"id": "2", "value": "World Development Indicators"},
//!       "sourceNote": "Total population is based on ...",
//!       "sourceOrganization": "United Nations Population Division",
//!       "topics": [{"id": "8", "value": "Health "}]
//!     }
//!   ]
//! ]
//! ```

use rwsync_core::config::render_template;
use rwsync_core::error::AppError;
use rwsync_core::traits::ProviderAdapter;
use rwsync_core::{HttpConfig, ProviderConfig, RawDatasetInfo, RawMetadataEntry};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::http::{HttpTransport, parse_url};

/// `{"id": ..., "value": ...}` pair used for sources and topics.
#[derive(Deserialize, Debug, Default)]
struct IdValue {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Indicator {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    source: Option<IdValue>,
    #[serde(default)]
    source_note: Option<String>,
    #[serde(default)]
    source_organization: Option<String>,
    #[serde(default)]
    topics: Vec<IdValue>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Indicator {
    fn into_entry(self, language: &str) -> RawMetadataEntry {
        let source = non_empty(self.source.and_then(|s| s.value));
        let tags = self
            .topics
            .into_iter()
            .filter_map(|t| non_empty(t.value))
            .collect();

        let mut info = Map::new();
        if let Some(org) = non_empty(self.source_organization) {
            info.insert("sourceOrganization".to_string(), Value::String(org));
        }
        if let Some(source) = &source {
            info.insert("source".to_string(), Value::String(source.clone()));
        }
        if let Some(unit) = non_empty(self.unit) {
            info.insert("unit".to_string(), Value::String(unit));
        }

        RawMetadataEntry {
            dataset: self.id,
            language: language.to_string(),
            application: source.unwrap_or_default(),
            name: non_empty(self.name),
            description: non_empty(self.source_note),
            license: None,
            info: (!info.is_empty()).then_some(Value::Object(info)),
            tags,
        }
    }
}

/// Parses an indicator response into metadata candidates.
///
/// Every candidate gets `language` as its language tag and the indicator's
/// source name as its application tag.
///
/// # Errors
///
/// Returns `AppError::UpstreamFormat` if the body is not a two-element array,
/// the indicator list is empty, or an indicator has no `id`. The API answers
/// unknown indicators with a one-element error array, which lands here too.
pub fn parse_indicators(body: Value, language: &str) -> Result<Vec<RawMetadataEntry>, AppError> {
    let Value::Array(mut parts) = body else {
        return Err(AppError::UpstreamFormat(
            "indicator response is not an array".to_string(),
        ));
    };
    if parts.len() < 2 {
        return Err(AppError::UpstreamFormat(format!(
            "indicator response has {} element(s), expected page info and indicator list",
            parts.len()
        )));
    }

    let indicators: Vec<Indicator> = serde_json::from_value(parts.swap_remove(1))
        .map_err(|e| AppError::UpstreamFormat(format!("indicator list not valid: {}", e)))?;
    if indicators.is_empty() {
        return Err(AppError::UpstreamFormat(
            "indicator list is empty".to_string(),
        ));
    }

    Ok(indicators
        .into_iter()
        .map(|indicator| indicator.into_entry(language))
        .collect())
}

/// HTTP client for the World Bank indicators API.
#[derive(Clone)]
pub struct WorldBankClient {
    http: HttpTransport,
    config: ProviderConfig,
}

impl WorldBankClient {
    pub const PROVIDER_NAME: &'static str = "worldbank";

    /// Creates a client for the given provider configuration.
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

impl ProviderAdapter for WorldBankClient {
    fn provider_name(&self) -> &str {
        Self::PROVIDER_NAME
    }

    /// The indicators API has no separate dataset record.
    async fn fetch_dataset_info(
        &self,
        _table_id: &str,
    ) -> Result<Option<RawDatasetInfo>, AppError> {
        Ok(None)
    }

    async fn fetch_metadata_candidates(
        &self,
        table_id: &str,
    ) -> Result<Vec<RawMetadataEntry>, AppError> {
        let url = parse_url(&render_template(
            &self.config.metadata_url_template,
            table_id,
        ))?;
        debug!(table_id, %url, "Fetching indicator");
        let body = self.http.get_json(&url).await?;
        parse_indicators(body, &self.config.default_language)
    }

    /// Tags are the topics of the first indicator.
    async fn fetch_vocabulary(&self, table_id: &str) -> Result<Vec<String>, AppError> {
        let candidates = self.fetch_metadata_candidates(table_id).await?;
        Ok(candidates
            .into_iter()
            .next()
            .map(|entry| entry.tags)
            .unwrap_or_default())
    }
}
