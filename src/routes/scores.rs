use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::scores::{
        ErrorResponse, InitResponse, SubmitScoreRequest, SubmitScoreResponse, UsersResponse,
    },
    error::AppError,
    services::{public_service, submission_service},
    state::SharedState,
};

const SUBMIT_FAILURE: &str = "Internal server error while saving scores";

/// Endpoints used by the score submission web form.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/submit-score", post(submit_score))
        .route("/api/init", get(init_sheet))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "scores",
    responses((status = 200, description = "Configured roster", body = UsersResponse))
)]
/// Return the roster in spreadsheet column order.
pub async fn list_users(State(state): State<SharedState>) -> Json<UsersResponse> {
    Json(public_service::list_users(&state))
}

#[utoipa::path(
    post,
    path = "/api/submit-score",
    tag = "scores",
    request_body = SubmitScoreRequest,
    responses(
        (status = 200, description = "Game validated; per-sink outcome included", body = SubmitScoreResponse),
        (status = 400, description = "Malformed or unbalanced scores", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
/// Validate a game result, save it to the spreadsheet and notify the group chat.
pub async fn submit_score(
    State(state): State<SharedState>,
    payload: Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> Result<Json<SubmitScoreResponse>, AppError> {
    let Json(request) = payload.map_err(reject_body)?;
    request.validate()?;

    let entry = request.into_entry();
    let outcome = submission_service::submit(&state, entry.clone(), None)
        .await
        .map_err(|err| AppError::from_service(err, SUBMIT_FAILURE))?;

    Ok(Json(SubmitScoreResponse::recorded(entry, outcome)))
}

#[utoipa::path(
    get,
    path = "/api/init",
    tag = "scores",
    responses((status = 200, description = "Initialization result", body = InitResponse))
)]
/// Re-initialize the spreadsheet connection and repair its header row.
pub async fn init_sheet(State(state): State<SharedState>) -> Json<InitResponse> {
    Json(public_service::initialize_sheet(&state).await)
}

fn reject_body(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(_) => AppError::BadRequest("Invalid scores format".into()),
        other => AppError::BadRequest(other.body_text()),
    }
}
