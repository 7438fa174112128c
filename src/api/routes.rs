//! Router assembly: API routes, OpenAPI document, CORS and middleware.

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, StatusCode},
    middleware,
};
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{REQUEST_ID_HEADER, logging_middleware, request_id_middleware};
use crate::state::AppState;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Layers run outermost first: request ID, then logging, then CORS,
/// compression and the request timeout, so every log line and response
/// (including a 408 after `server.request_timeout`) carries the request ID.
///
/// # Routes
/// - `POST /api/notify`, `POST /api/indexnow`
/// - `/health`, `/health/live`, `/health/ready`
/// - `/swagger-ui`, `/api-docs/openapi.json`
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.server.cors_origins);
    let request_timeout = Duration::from_secs(state.settings.server.request_timeout);

    let api_routes = OpenApiRouter::new()
        .merge(handlers::notify::notify_routes())
        .merge(handlers::indexnow::indexnow_routes());

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api_routes)
        .merge(handlers::health::health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, api))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        // Last added runs first, so logging sees the request ID
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Empty origin list means any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin.trim_end_matches('/')).ok())
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmailProviderKind, Settings};
    use crate::services::Services;
    use crate::services::notifications::{
        EmailMessage, EmailProvider, ProviderError, SendReceipt,
    };
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[derive(Default)]
    struct StubProvider {
        sent: Mutex<Vec<EmailMessage>>,
        reject: bool,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl EmailProvider for StubProvider {
        async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, ProviderError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.sent.lock().unwrap().push(message.clone());
            if self.reject {
                return Err(ProviderError::Rejected {
                    status: 401,
                    message: "API key is invalid".to_string(),
                });
            }
            Ok(SendReceipt {
                provider: "stub".to_string(),
                message_id: None,
                duration_ms: 0,
            })
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.email.provider = EmailProviderKind::Log;
        settings.email.from = "hello@relay.dev".to_string();
        settings.email.internal_recipients = vec!["team@relay.dev".to_string()];
        settings.server.cors_origins = vec!["https://www.example.com".to_string()];
        settings
    }

    fn app(provider: Arc<StubProvider>) -> Router {
        app_with(provider, settings())
    }

    fn app_with(provider: Arc<StubProvider>, settings: Settings) -> Router {
        let services = Services::with_provider(provider, &settings).unwrap();
        create_router(AppState::new(services, settings))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_contact_submission_succeeds() {
        let provider = Arc::new(StubProvider::default());
        let body = json!({
            "kind": "contact",
            "name": "Ada",
            "email": "ada@example.com",
            "subject": "Billing",
            "message": "Question about invoice"
        });

        let response = app(provider.clone())
            .oneshot(post_json("/api/notify", &body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(body_json(response).await, json!({"success": true}));

        let sent = provider.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].subject, "Contact Form: Billing");
        assert_eq!(sent[1].subject, "We received your message");
    }

    #[tokio::test]
    async fn test_analysis_submission_succeeds() {
        let provider = Arc::new(StubProvider::default());
        let body = r#"{"email":"bob@example.com","url":"https://example.com"}"#;

        let response = app(provider.clone())
            .oneshot(post_json("/api/notify", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let sent = provider.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["bob@example.com", "team@relay.dev"]);
    }

    #[tokio::test]
    async fn test_invalid_submission_is_500_without_sends() {
        let provider = Arc::new(StubProvider::default());

        let response = app(provider.clone())
            .oneshot(post_json("/api/notify", r#"{"kind":"contact","name":"Ada"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("email"));
        assert!(provider.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_500() {
        let response = app(Arc::new(StubProvider::default()))
            .oneshot(post_json("/api/notify", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_provider_rejection_is_500() {
        let provider = Arc::new(StubProvider {
            reject: true,
            ..StubProvider::default()
        });

        let response = app(provider.clone())
            .oneshot(post_json(
                "/api/notify",
                r#"{"email":"bob@example.com","url":"https://example.com"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("API key is invalid"));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out_with_408() {
        let provider = Arc::new(StubProvider {
            delay: Some(Duration::from_secs(3)),
            ..StubProvider::default()
        });
        let mut settings = settings();
        settings.server.request_timeout = 1;

        let response = app_with(provider.clone(), settings)
            .oneshot(post_json(
                "/api/notify",
                r#"{"email":"bob@example.com","url":"https://example.com"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert!(provider.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_indexnow_rejects_empty_list() {
        let response = app(Arc::new(StubProvider::default()))
            .oneshot(post_json("/api/indexnow", r#"{"urls":[]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_indexnow_unconfigured_is_500() {
        let response = app(Arc::new(StubProvider::default()))
            .oneshot(post_json("/api/indexnow", r#"{"urls":["https://x.io"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_live_and_ready() {
        let app = app(Arc::new(StubProvider::default()));

        for uri in ["/health/live", "/health/ready", "/health"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        let response = app(Arc::new(StubProvider::default()))
            .oneshot(Request::builder().uri(OPENAPI_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"]["/api/notify"]["post"].is_object());
        assert!(doc["paths"]["/api/indexnow"]["post"].is_object());
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let response = app(Arc::new(StubProvider::default()))
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/notify")
                    .header(header::ORIGIN, "https://www.example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://www.example.com"
        );
    }
}
