use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;
use crate::services::IndexNowError;
use crate::services::notifications::DispatchError;

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - Validation, BadRequest → 400
    /// - Dispatch → 500 for every cause, including invalid submissions
    /// - IndexNow → 400 for an empty URL list, 500 otherwise
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let code = error_to_code(&self);

        let body = match &self {
            AppError::Validation { field, reason } => {
                ErrorResponse::new(code, format!("{} {}", field, reason))
                    .with_details(json!({ "field": field }))
            }
            AppError::Dispatch(DispatchError::Validation { field, .. }) => {
                ErrorResponse::new(code, self.to_string()).with_details(json!({ "field": field }))
            }
            AppError::Dispatch(DispatchError::Provider { step, .. })
            | AppError::Dispatch(DispatchError::Template { step, .. }) => {
                ErrorResponse::new(code, self.to_string()).with_details(json!({ "step": step }))
            }
            _ => ErrorResponse::new(code, self.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        }

        (status, Json(body)).into_response()
    }
}

pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::IndexNow(IndexNowError::EmptyUrlList) => StatusCode::BAD_REQUEST,
        AppError::IndexNow(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::Validation { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Dispatch(DispatchError::Validation { .. }) => "INVALID_SUBMISSION",
        AppError::Dispatch(DispatchError::Provider { .. }) => "EMAIL_PROVIDER_ERROR",
        AppError::Dispatch(DispatchError::Template { .. }) => "TEMPLATE_ERROR",
        AppError::IndexNow(IndexNowError::NotConfigured) => "INDEXNOW_NOT_CONFIGURED",
        AppError::IndexNow(IndexNowError::EmptyUrlList) => "VALIDATION_ERROR",
        AppError::IndexNow(IndexNowError::Forward(_)) => "INDEXNOW_FORWARD_FAILED",
    }
}
