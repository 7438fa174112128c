//! Error response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Failure body shared by every endpoint.
///
/// `success` and `error` are what the website reads; `code` and `details`
/// are for operators.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "success": false,
    "error": "Invalid submission: email is required",
    "code": "VALIDATION_ERROR"
}))]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.to_string(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_without_details() {
        let body = serde_json::to_value(ErrorResponse::new("BAD_REQUEST", "nope")).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "error": "nope", "code": "BAD_REQUEST"})
        );
    }

    #[test]
    fn test_with_details() {
        let response = ErrorResponse::new("VALIDATION_ERROR", "bad").with_details(json!({"field": "url"}));
        assert_eq!(response.details, Some(json!({"field": "url"})));
    }
}
