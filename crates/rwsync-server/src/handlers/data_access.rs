//! Data-access endpoints.
//!
//! Rows are never served through this connector: query, download and field
//! listing answer 400 with a fixed detail for any dataset identifier.

use axum::extract::Path;

use crate::dto::DataAccessErrorResponse;
use crate::error::ApiError;

/// Query a dataset's rows (not supported).
#[utoipa::path(
    post,
    path = "/api/v1/resourcewatch/query/{dataset}",
    params(("dataset" = String, Path, description = "Registry dataset id")),
    responses(
        (status = 400, description = "Data access not supported", body = DataAccessErrorResponse),
    ),
    tag = "data-access"
)]
pub async fn query_dataset(Path(_dataset): Path<String>) -> ApiError {
    ApiError::DataAccessNotSupported
}

/// Download a dataset (not supported).
#[utoipa::path(
    post,
    path = "/api/v1/resourcewatch/download/{dataset}",
    params(("dataset" = String, Path, description = "Registry dataset id")),
    responses(
        (status = 400, description = "Data access not supported", body = DataAccessErrorResponse),
    ),
    tag = "data-access"
)]
pub async fn download_dataset(Path(_dataset): Path<String>) -> ApiError {
    ApiError::DataAccessNotSupported
}

/// List a dataset's fields (not supported).
#[utoipa::path(
    post,
    path = "/api/v1/resourcewatch/fields/{dataset}",
    params(("dataset" = String, Path, description = "Registry dataset id")),
    responses(
        (status = 400, description = "Data access not supported", body = DataAccessErrorResponse),
    ),
    tag = "data-access"
)]
pub async fn dataset_fields(Path(_dataset): Path<String>) -> ApiError {
    ApiError::DataAccessNotSupported
}
