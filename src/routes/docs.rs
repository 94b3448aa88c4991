use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Route of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Swagger UI for the score API under `/api/docs`.
pub fn router() -> Router<SharedState> {
    SwaggerUi::new("/api/docs")
        .url(OPENAPI_PATH, ApiDoc::openapi())
        .into()
}
