//! `POST /api/indexnow`: forward URLs to the search-index notification API.

use crate::api::doc::INDEXNOW_TAG;
use crate::api::dto::{ActionResponse, ErrorResponse, IndexNowRequest};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::Value;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn indexnow_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(submit_urls))
}

/// Submit URLs for re-crawling.
#[utoipa::path(
    post,
    path = "/indexnow",
    tag = INDEXNOW_TAG,
    request_body = IndexNowRequest,
    responses(
        (status = 200, description = "URLs accepted", body = ActionResponse),
        (status = 400, description = "`urls` missing, empty or not a list of strings", body = ErrorResponse),
        (status = 500, description = "Forwarding failed", body = ErrorResponse)
    )
)]
async fn submit_urls(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<ActionResponse>> {
    let Json(body) = payload?;
    let urls = parse_urls(&body)?;

    state.services.indexnow.submit(urls).await?;

    Ok(Json(ActionResponse::ok()))
}

fn parse_urls(body: &Value) -> Result<Vec<String>, AppError> {
    let invalid = |reason: &str| AppError::Validation {
        field: "urls".to_string(),
        reason: reason.to_string(),
    };

    let list = match body.get("urls") {
        None | Some(Value::Null) => return Err(invalid("is required")),
        Some(Value::Array(list)) => list,
        Some(_) => return Err(invalid("must be a list of strings")),
    };

    if list.is_empty() {
        return Err(invalid("must not be empty"));
    }

    list.iter()
        .map(|url| {
            url.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid("must contain only strings"))
        })
        .collect()
}
