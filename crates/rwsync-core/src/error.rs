use thiserror::Error;

/// Application-wide error types.
///
/// This enum represents all possible errors that can occur while syncing
/// provider metadata into the registry. It uses the `thiserror` crate for
/// ergonomic error handling.
///
/// # Error Families
///
/// - **Upstream format**: the provider answered, but not with something we can
///   use ([`AppError::UpstreamFormat`]).
/// - **Transport**: the provider or registry could not be reached or returned a
///   non-success status ([`AppError::ClientError`], [`AppError::NetworkError`],
///   [`AppError::Timeout`]).
/// - **Workflow context**: [`AppError::MetadataError`] and
///   [`AppError::VocabularyError`] wrap any of the above with the registration
///   step that failed.
///
/// # Examples
///
/// ```
/// use rwsync_core::error::AppError;
///
/// let inner = AppError::UpstreamFormat("no matching metadata candidate".to_string());
/// let err = AppError::MetadataError(Box::new(inner));
/// assert_eq!(err.name(), "MetadataError");
/// assert!(matches!(err.root_cause(), AppError::UpstreamFormat(_)));
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Provider response was missing, empty, or structurally invalid.
    ///
    /// Also raised when the candidate filters leave no metadata entry to
    /// select. Never retried.
    #[error("Upstream format error: {0}")]
    UpstreamFormat(String),

    /// HTTP request failed with a non-success status or an unreadable body.
    #[error("API Client error: {0}")]
    ClientError(String),

    /// Network or connection error.
    ///
    /// DNS resolution failures, refused connections, or resets.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Fetching, normalizing, or persisting the metadata record failed.
    #[error("Error obtaining metadata: {0}")]
    MetadataError(#[source] Box<AppError>),

    /// Building or persisting the vocabulary payload failed.
    ///
    /// The metadata record written before this step is kept.
    #[error("Error tagging dataset: {0}")]
    VocabularyError(#[source] Box<AppError>),

    /// Dataset reference is missing a required field.
    #[error("Invalid dataset reference: {0}")]
    InvalidDatasetReference(String),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing failed, typically after substituting a URL template.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic application error for cases not covered by specific variants.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Returns a stable, human-readable name for the error variant.
    ///
    /// Recorded together with the message in the registry's lifecycle
    /// `errorMessage` field.
    pub fn name(&self) -> &'static str {
        match self {
            AppError::UpstreamFormat(_) => "UpstreamFormatError",
            AppError::ClientError(_) | AppError::NetworkError(_) | AppError::Timeout(_) => {
                "TransportError"
            }
            AppError::MetadataError(_) => "MetadataError",
            AppError::VocabularyError(_) => "VocabularyError",
            AppError::InvalidDatasetReference(_) => "InvalidDatasetReference",
            AppError::SerializationError(_) => "SerializationError",
            AppError::InvalidUrl(_) => "InvalidUrl",
            AppError::ConfigError(_) => "ConfigError",
            AppError::Generic(_) => "Error",
        }
    }

    /// Wraps an error produced while handling the metadata record.
    pub fn metadata(err: AppError) -> Self {
        AppError::MetadataError(Box::new(err))
    }

    /// Wraps an error produced while tagging the dataset.
    pub fn vocabulary(err: AppError) -> Self {
        AppError::VocabularyError(Box::new(err))
    }

    /// Returns the innermost error, skipping workflow context wrappers.
    pub fn root_cause(&self) -> &AppError {
        match self {
            AppError::MetadataError(inner) | AppError::VocabularyError(inner) => {
                inner.root_cause()
            }
            other => other,
        }
    }

    /// Returns true if the root cause is a transport-level failure.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.root_cause(),
            AppError::ClientError(_) | AppError::NetworkError(_) | AppError::Timeout(_)
        )
    }

    /// Returns true if the root cause is an upstream format error.
    pub fn is_upstream_format(&self) -> bool {
        matches!(self.root_cause(), AppError::UpstreamFormat(_))
    }

    /// Formats the error the way it is recorded on a failed dataset.
    pub fn lifecycle_message(&self) -> String {
        format!("{} - {}", self.name(), self)
    }

    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self.root_cause() {
            AppError::UpstreamFormat(msg) => format!(
                "The provider returned unusable metadata: {}\n   Check the table identifier and the language/application filters.",
                msg
            ),
            AppError::NetworkError(msg) => {
                format!("Network error: {}\n   Check your internet connection.", msg)
            }
            AppError::Timeout(secs) => format!(
                "Request timed out after {} seconds.\n   The provider or registry may be overloaded. Try again later.",
                secs
            ),
            AppError::ClientError(msg) => format!("API error: {}", msg),
            AppError::ConfigError(msg) => format!(
                "Configuration error: {}\n   Check your configuration file.",
                msg
            ),
            _ => self.to_string(),
        }
    }
}
