use utoipa::OpenApi;

pub const NOTIFY_TAG: &str = "Notify";
pub const INDEXNOW_TAG: &str = "IndexNow";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "relay-rs",
        description = "Notification dispatch and search-index relay for the marketing site",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::models::SubmissionKind,
        )
    ),
    tags(
        (name = NOTIFY_TAG, description = "Contact form and analysis request emails"),
        (name = INDEXNOW_TAG, description = "Search-index notification proxy"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
