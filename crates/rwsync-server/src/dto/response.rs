//! Response DTOs for API endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Server version
    pub version: String,
    /// Provider this server registers datasets for
    pub provider: String,
}

/// Empty JSON object returned once a registration request was processed.
///
/// Registration failures are recorded in the registry lifecycle status, not
/// in this response.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct RegisterDatasetResponse {}

/// One error object in a data-access rejection.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorObject {
    pub status: u16,
    pub detail: String,
}

/// `{"errors": [{"status": 400, "detail": "..."}]}`
#[derive(Debug, Serialize, ToSchema)]
pub struct DataAccessErrorResponse {
    pub errors: Vec<ErrorObject>,
}
