//! `POST /api/notify`: contact form and analysis submissions.

use crate::api::doc::NOTIFY_TAG;
use crate::api::dto::{ActionResponse, ErrorResponse};
use crate::error::AppResult;
use crate::models::SubmissionRequest;
use crate::services::notifications::DispatchError;
use crate::state::AppState;
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn notify_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(notify))
}

/// Dispatch a submission.
///
/// `kind: "contact"` sends an internal notification then a confirmation to the
/// submitter. Without `kind` an analysis-started email goes to the submitter
/// with the team copied. Any failure, including an unreadable body, is a 500.
#[utoipa::path(
    post,
    path = "/notify",
    tag = NOTIFY_TAG,
    request_body = SubmissionRequest,
    responses(
        (status = 200, description = "All emails accepted by the provider", body = ActionResponse),
        (status = 500, description = "Submission invalid or a send failed", body = ErrorResponse)
    )
)]
async fn notify(
    State(state): State<AppState>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> AppResult<Json<ActionResponse>> {
    let Json(request) = payload.map_err(|rejection| DispatchError::Validation {
        field: "body".to_string(),
        reason: rejection.body_text(),
    })?;

    state.services.dispatch.dispatch(request).await?;

    Ok(Json(ActionResponse::ok()))
}
