//! Router configuration and route composition.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{data_access, health, register};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// Provider routes live under `/api/v1/<provider>`, with the registration
/// route at `/rest-datasets/<provider>`.
pub fn create_router(state: AppState) -> Router {
    let provider = state.provider.as_str();

    let provider_routes = Router::new()
        .route(
            &format!("/rest-datasets/{}", provider),
            post(register::register_dataset),
        )
        .route("/query/:dataset", post(data_access::query_dataset))
        .route("/download/:dataset", post(data_access::download_dataset))
        .route("/fields/:dataset", post(data_access::dataset_fields));

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .nest(&format!("/{}", provider), provider_routes);

    Router::new()
        .nest("/api/v1", api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
