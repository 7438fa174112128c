//! Success body for the notify and indexnow endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"success": true}))]
pub struct ActionResponse {
    pub success: bool,
}

impl ActionResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Body of `POST /api/indexnow`. Documented shape only; the handler checks
/// the raw JSON so malformed lists can be reported precisely.
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({"urls": ["https://www.example.com/pricing"]}))]
pub struct IndexNowRequest {
    pub urls: Vec<String>,
}
