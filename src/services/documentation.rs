use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the score tracker.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::scores::list_users,
        crate::routes::scores::submit_score,
        crate::routes::scores::init_sheet,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::scores::UsersResponse,
            crate::dto::scores::SubmitScoreRequest,
            crate::dto::scores::SubmitScoreResponse,
            crate::dto::scores::SubmissionData,
            crate::dto::scores::InitResponse,
            crate::dto::scores::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "scores", description = "Roster and game result submission"),
    )
)]
pub struct ApiDoc;
