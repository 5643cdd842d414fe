//! Domain models shared by the provider adapters, the registry gateway and
//! the registration workflow.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Fixed publication status written on every canonical metadata record.
pub const PUBLISHED_STATUS: &str = "published";

/// Identifies one dataset to register or resync.
///
/// Deserializes from the registry's dataset attributes (camelCase keys) and
/// from the inbound registration body's `connector` object.
///
/// # Examples
///
/// ```
/// use rwsync_core::DatasetReference;
///
/// let json = r#"{
///     "id": "a1b2",
///     "tableName": "0b9f0100-ce5b-430f-ad8f-3363efa05481",
///     "sourceLanguage": "en",
///     "userId": "u-1"
/// }"#;
/// let reference: DatasetReference = serde_json::from_str(json).unwrap();
/// assert_eq!(reference.table_name, "0b9f0100-ce5b-430f-ad8f-3363efa05481");
/// assert_eq!(reference.source_language.as_deref(), Some("en"));
/// assert!(reference.source_application.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReference {
    /// Registry-internal identifier, assigned once the dataset is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// External table / indicator identifier on the provider.
    #[serde(default)]
    pub table_name: String,
    /// Dataset's own name, used when the upstream name is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Only candidates with exactly this language tag are considered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    /// Only candidates whose application tag contains this value are considered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_application: Option<String>,
    /// Owning user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl DatasetReference {
    /// Creates a reference for the given table identifier with no filters.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    /// Sets the registry identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the source-language filter.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.source_language = Some(language.into());
        self
    }

    /// Sets the source-application filter.
    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.source_application = Some(application.into());
        self
    }

    /// Sets the fallback name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the owning user.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Checks that the table identifier is present.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.table_name.trim().is_empty() {
            return Err(AppError::InvalidDatasetReference(
                "table identifier is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the registry identifier, required for any write.
    pub fn require_id(&self) -> Result<&str, AppError> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                AppError::InvalidDatasetReference(format!(
                    "registry identifier is required for table {}",
                    self.table_name
                ))
            })
    }
}

/// Raw dataset information from the provider.
///
/// Only the slug participates in normalization; everything else is kept for
/// logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDatasetInfo {
    /// URL-friendly slug used by provider landing pages.
    #[serde(default)]
    pub slug: Option<String>,
    /// Provider-side dataset name.
    #[serde(default)]
    pub name: Option<String>,
    /// All other attributes returned by the provider.
    #[serde(flatten)]
    pub extras: serde_json::Map<String, Value>,
}

/// One candidate metadata record as returned by the provider.
///
/// Several candidates may exist per table identifier (one per language and
/// application); the normalizer selects exactly one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetadataEntry {
    /// The candidate's own dataset identifier on the provider.
    pub dataset: String,
    /// Language tag, e.g. `en`.
    pub language: String,
    /// Application / source tag, e.g. `rw` or `gfw`.
    pub application: String,
    pub name: Option<String>,
    /// Description or source note.
    pub description: Option<String>,
    pub license: Option<String>,
    /// Free-form info block, passed through verbatim.
    pub info: Option<Value>,
    /// Topic tags embedded in the metadata entry (compact provider shape).
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The normalized, registry-ready metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMetadata {
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source_organization: String,
    pub data_source_url: String,
    pub data_source_endpoint: String,
    pub data_download_url: String,
    pub status: String,
    pub license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

/// A list of tags under one vocabulary key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    pub tags: Vec<String>,
}

/// Vocabulary payload attached to a dataset on first registration.
///
/// Serializes as `{"legacy": {"tags": [...]}, "knowledge_graph": {"tags": [...]}}`
/// with `knowledge_graph` omitted when there are no upstream tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyPayload {
    pub legacy: TagSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_graph: Option<TagSet>,
}

/// Lifecycle status of a dataset in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStatus {
    /// Registered and usable. Listed by the registry as `saved`.
    Active,
    /// Registration failed.
    Failed,
}

impl LifecycleStatus {
    /// Numeric code used by the registry.
    pub fn code(self) -> u8 {
        match self {
            LifecycleStatus::Active => 1,
            LifecycleStatus::Failed => 2,
        }
    }
}

/// Body of a lifecycle status update.
///
/// # Examples
///
/// ```
/// use rwsync_core::LifecycleUpdate;
///
/// let body = serde_json::to_value(LifecycleUpdate::active()).unwrap();
/// assert_eq!(body, serde_json::json!({"dataset": {"status": 1}}));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleUpdate {
    pub status: LifecycleStatus,
    pub error_message: Option<String>,
}

impl LifecycleUpdate {
    /// Marks the dataset active.
    pub fn active() -> Self {
        Self {
            status: LifecycleStatus::Active,
            error_message: None,
        }
    }

    /// Marks the dataset failed, recording the error's name and message.
    pub fn failed(err: &AppError) -> Self {
        Self {
            status: LifecycleStatus::Failed,
            error_message: Some(err.lifecycle_message()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LifecycleBody<'a> {
    status: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<&'a str>,
}

#[derive(Serialize)]
struct LifecycleEnvelope<'a> {
    dataset: LifecycleBody<'a>,
}

impl Serialize for LifecycleUpdate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        LifecycleEnvelope {
            dataset: LifecycleBody {
                status: self.status.code(),
                error_message: self.error_message.as_deref(),
            },
        }
        .serialize(serializer)
    }
}

/// Result of one successful registration workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// First-time registration: metadata created and dataset tagged.
    Registered,
    /// Resync: metadata updated, vocabulary untouched.
    ResyncUpdated,
}

impl RegistrationOutcome {
    /// Returns the string representation used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationOutcome::Registered => "registered",
            RegistrationOutcome::ResyncUpdated => "resync-updated",
        }
    }
}
