//! Inbound dataset registration.

use axum::{Json, extract::State};
use rwsync_core::TracingReporter;
use tracing::info;

use crate::dto::{RegisterDatasetRequest, RegisterDatasetResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Register a dataset with the registry.
///
/// Fetches and normalizes the provider metadata, writes it and the vocabulary
/// to the registry, then marks the dataset active. A failed registration
/// still answers `200 {}`: the failure is recorded as the dataset's
/// lifecycle status (`status: 2` plus `errorMessage`).
#[utoipa::path(
    post,
    path = "/api/v1/resourcewatch/rest-datasets/resourcewatch",
    request_body = RegisterDatasetRequest,
    responses(
        (status = 200, description = "Request processed", body = RegisterDatasetResponse),
        (status = 400, description = "Dataset reference without registry id"),
        (status = 503, description = "Lifecycle status could not be written"),
    ),
    tag = "registration"
)]
pub async fn register_dataset(
    State(state): State<AppState>,
    Json(request): Json<RegisterDatasetRequest>,
) -> Result<Json<RegisterDatasetResponse>, ApiError> {
    info!(
        table_name = %request.connector.table_name,
        dataset_id = request.connector.id.as_deref(),
        "Registering dataset"
    );

    state
        .intake
        .register_with_progress(
            &request.connector,
            request.user_id.as_deref(),
            &TracingReporter,
        )
        .await?;

    Ok(Json(RegisterDatasetResponse::default()))
}
