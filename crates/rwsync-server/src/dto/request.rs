//! Request DTOs for API endpoints.

use rwsync_core::DatasetReference;
use serde::Deserialize;
use utoipa::ToSchema;

/// Inbound "register dataset" request sent by the dataset service.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDatasetRequest {
    /// Dataset being registered: `id`, `tableName`, optional `name`,
    /// `sourceLanguage`, `sourceApplication` and `userId`
    #[schema(value_type = Object, example = json!({
        "id": "6b2f9d5e-1f4c-4a43-9d3c-1c9e7b1a0f21",
        "tableName": "0b9f0100-ce5b-430f-ad8f-3363efa05481",
        "sourceLanguage": "en",
        "sourceApplication": "rw"
    }))]
    pub connector: DatasetReference,

    /// Caller registering the dataset; falls back to `connector.userId`
    #[serde(default)]
    pub user_id: Option<String>,
}
