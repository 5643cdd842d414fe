//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::dto::{
    DataAccessErrorResponse, ErrorObject, HealthResponse, RegisterDatasetRequest,
    RegisterDatasetResponse,
};
use crate::handlers::{data_access, health, register};

/// OpenAPI documentation for the rwsync connector API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "rwsync API",
        version = "1.0.0",
        description = "Registration connector between upstream data providers and the dataset registry.

The connector fetches provider metadata, normalizes it into the registry's
canonical schema and records the outcome as the dataset's lifecycle status.

Routes are nested under `/api/v1/<provider>`; the paths below show the default
`resourcewatch` provider.

## Quick Start

1. Check server health: `GET /api/v1/health`
2. Register a dataset: `POST /api/v1/resourcewatch/rest-datasets/resourcewatch`
",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        health::health_check,
        register::register_dataset,
        data_access::query_dataset,
        data_access::download_dataset,
        data_access::dataset_fields,
    ),
    components(
        schemas(
            // Request types
            RegisterDatasetRequest,
            // Response types
            HealthResponse,
            RegisterDatasetResponse,
            DataAccessErrorResponse,
            ErrorObject,
        )
    ),
    tags(
        (name = "system", description = "System health"),
        (name = "registration", description = "Inbound dataset registration"),
        (name = "data-access", description = "Unsupported data-access operations"),
    )
)]
pub struct ApiDoc;
