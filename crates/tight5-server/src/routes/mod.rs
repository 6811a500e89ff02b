//! Tight 5 API Routes
//!
//! - /api/jokes - Joke library, versions and performances
//! - /api/routines - Routines and running-order edits
//! - /api/structures - Structure template catalog
//! - /api/joke/*, /api/routine/*, /api/performance/* - Writing assistant (rate limited)
//! - /api/migrate - Legacy import

pub mod assistant;
pub mod jokes;
pub mod migrate;
pub mod routines;
pub mod structures;
pub mod swagger;

use axum::{http::StatusCode, middleware, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tight5::domain::services::guardrail::{
    API_ERROR_MESSAGE, OFF_TOPIC_MESSAGE, RATE_LIMIT_MESSAGE,
};
use tight5::DomainError;

use crate::auth;
use crate::services::rate_limit_middleware;
use crate::AppState;

/// Error half of every handler result
pub type ApiError = (StatusCode, String);

/// Map a domain error to a status and a message safe to show the client.
/// Details of upstream and storage failures only go to the log.
pub fn error_response(err: DomainError) -> ApiError {
    match err {
        DomainError::Validation(message) => (StatusCode::BAD_REQUEST, message),
        DomainError::OffTopic => (StatusCode::BAD_REQUEST, OFF_TOPIC_MESSAGE.to_string()),
        DomainError::NotFound { entity_type, id } => {
            tracing::debug!("{} {} not found", entity_type, id);
            (StatusCode::NOT_FOUND, format!("{} not found", entity_type))
        }
        DomainError::Forbidden(detail) => {
            tracing::warn!("{}", detail);
            (StatusCode::FORBIDDEN, "Forbidden".to_string())
        }
        DomainError::Conflict(message) => (StatusCode::CONFLICT, message),
        DomainError::Decode(e) => {
            tracing::warn!("Unusable model reply: {}", e);
            (StatusCode::BAD_GATEWAY, API_ERROR_MESSAGE.to_string())
        }
        DomainError::ExternalService(detail) => {
            tracing::error!("Model call failed: {}", detail);
            (StatusCode::BAD_GATEWAY, API_ERROR_MESSAGE.to_string())
        }
        DomainError::RateLimited(_) => (
            StatusCode::TOO_MANY_REQUESTS,
            RATE_LIMIT_MESSAGE.to_string(),
        ),
        DomainError::Repository(detail) => {
            tracing::error!("Repository error: {}", detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
    assistant_enabled: bool,
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Tight 5 API is running - go get your five minutes".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        assistant_enabled: state.assistant_service.is_enabled(),
    })
}

/// Full application router
pub fn build_router(state: AppState) -> Router {
    let assistant_routes = assistant::router().layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit_middleware,
    ));

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(jokes::router())
        .merge(routines::router())
        .merge(structures::router())
        .merge(migrate::router())
        .merge(assistant_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // OpenAPI documentation
    let openapi = swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use tight5::LlmProvider;

    use crate::adapters::memory::{InMemoryStore, Reply, ScriptedProvider};
    use crate::config::{AppConfig, RateLimitConfig};

    struct TestApp {
        router: Router,
    }

    impl TestApp {
        fn new(provider: Option<ScriptedProvider>) -> Self {
            Self::with_config(provider, AppConfig::default())
        }

        fn with_config(provider: Option<ScriptedProvider>, config: AppConfig) -> Self {
            let store = Arc::new(InMemoryStore::new());
            let provider = provider.map(|p| Arc::new(p) as Arc<dyn LlmProvider>);
            let state = AppState::new(store.clone(), store, provider, &config);
            Self {
                router: build_router(state),
            }
        }

        async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            self.send_as(None, method, uri, body).await
        }

        async fn send_as(
            &self,
            token: Option<&str>,
            method: Method,
            uri: &str,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let request = match body {
                Some(body) => request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => request.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            (status, value)
        }

        async fn create_joke(&self, title: &str, estimated_time: u32) -> String {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/jokes",
                    Some(json!({
                        "title": title,
                        "setup": format!("{} setup", title),
                        "punchline": format!("{} punchline", title),
                        "estimatedTime": estimated_time,
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
            body["id"].as_str().unwrap().to_string()
        }
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let mut config = AppConfig::default();
        config
            .api_keys
            .insert("secret".to_string(), "alice".to_string());
        let app = TestApp::with_config(None, config);

        let (status, body) = app.send(Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["assistantEnabled"], false);
    }

    #[tokio::test]
    async fn test_joke_lifecycle() {
        let app = TestApp::new(None);
        let id = app.create_joke("Airports", 45).await;

        let (status, body) = app
            .send(
                Method::PATCH,
                &format!("/api/jokes/{}", id),
                Some(json!({"punchline": "Every gate is a goodbye.", "status": "working"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "working");
        assert_eq!(body["versions"][0]["punchline"], "Airports punchline");
        let version_id = body["versions"][0]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/api/jokes/{}/versions/{}/restore", id, version_id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["punchline"], "Airports punchline");
        assert_eq!(body["versions"].as_array().unwrap().len(), 2);

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/api/jokes/{}/performances", id),
                Some(json!({"actualTime": 50, "outcome": "killed"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let performance_id = body["id"].as_str().unwrap().to_string();

        let (_, body) = app.send(Method::GET, &format!("/api/jokes/{}", id), None).await;
        assert_eq!(body["performanceRating"], 100.0);

        let (status, _) = app
            .send(
                Method::DELETE,
                &format!("/api/performances/{}", performance_id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app
            .send(Method::DELETE, &format!("/api/jokes/{}", id), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = app.send(Method::GET, &format!("/api/jokes/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!("Joke not found"));
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let app = TestApp::new(None);
        app.create_joke("Bravo", 60).await;
        app.create_joke("alpha", 20).await;
        app.create_joke("Charlie", 40).await;

        let (status, body) = app
            .send(Method::GET, "/api/jokes?sort=title&direction=asc", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["alpha", "Bravo", "Charlie"]);

        let (_, body) = app
            .send(Method::GET, "/api/jokes?search=charlie%20punch", None)
            .await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = app
            .send(Method::GET, "/api/jokes?status=legendary", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_joke_is_rejected() {
        let app = TestApp::new(None);

        let (status, body) = app
            .send(
                Method::POST,
                "/api/jokes",
                Some(json!({"title": "", "setup": "s", "punchline": "p", "estimatedTime": 601})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body.as_str().unwrap();
        assert!(message.contains("Title"));
        assert!(message.contains("600"));
    }

    #[tokio::test]
    async fn test_auth_scopes_data_to_owner() {
        let mut config = AppConfig::default();
        config.api_keys = HashMap::from([
            ("alice-token".to_string(), "alice".to_string()),
            ("bob-token".to_string(), "bob".to_string()),
        ]);
        let app = TestApp::with_config(None, config);

        let (status, _) = app.send(Method::GET, "/api/jokes", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = app
            .send_as(
                Some("alice-token"),
                Method::POST,
                "/api/jokes",
                Some(json!({"title": "Mine", "setup": "s", "punchline": "p"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .send_as(Some("bob-token"), Method::GET, "/api/jokes", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());

        let (status, _) = app
            .send_as(
                Some("bob-token"),
                Method::GET,
                &format!("/api/jokes/{}", id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_routine_editing_and_joke_delete_cascade() {
        let app = TestApp::new(None);
        let a = app.create_joke("A", 60).await;
        let b = app.create_joke("B", 90).await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/routines",
                Some(json!({"name": "Club set", "targetTime": 120, "jokeIds": [a, b]})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["currentTime"], 150);
        assert_eq!(body["formattedTime"], "2:30");
        assert_eq!(body["timeStatus"]["overTime"], true);
        let routine = body["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/api/routines/{}/move", routine),
                Some(json!({"from": 1, "to": 0})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jokeIds"], json!([b, a]));

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/api/routines/{}/jokes", routine),
                Some(json!({"jokeId": a, "position": 0})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jokeIds"], json!([a, b, a]));

        let (status, _) = app
            .send(
                Method::POST,
                &format!("/api/routines/{}/move", routine),
                Some(json!({"from": 7, "to": 0})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(Method::DELETE, &format!("/api/jokes/{}", a), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = app
            .send(Method::GET, &format!("/api/routines/{}", routine), None)
            .await;
        assert_eq!(body["jokeIds"], json!([b]));
        assert_eq!(body["currentTime"], 90);
    }

    #[tokio::test]
    async fn test_structure_catalog_and_build() {
        let app = TestApp::new(None);

        let (status, body) = app.send(Method::GET, "/api/structures", None).await;
        assert_eq!(status, StatusCode::OK);
        let template = body["structures"][0].clone();
        let id = template["id"].as_str().unwrap().to_string();
        assert!(!body["categories"].as_array().unwrap().is_empty());

        let (status, _) = app
            .send(Method::GET, "/api/structures?category=no-such-category", None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let selections: Vec<Value> = template["parts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|part| json!({"partId": part["id"], "selected": [format!("{} pick", part["label"].as_str().unwrap())]}))
            .collect();
        let (status, body) = app
            .send(
                Method::POST,
                &format!("/api/structures/{}/build", id),
                Some(json!({"title": "Built", "selections": selections})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], "Built");
        assert_eq!(body["structure"]["structureId"], id);
        assert!(body["notes"].as_str().unwrap().contains("Structure Parts:"));
    }

    #[tokio::test]
    async fn test_generate_uses_model_then_fallback() {
        let app = TestApp::new(Some(ScriptedProvider::new([
            Reply::Text(r#"["One", "Two", "Three"]"#.to_string()),
            Reply::Fail,
        ])));
        let body = json!({"type": "setup", "content": "dating apps"});

        let (status, reply) = app
            .send(Method::POST, "/api/joke/generate", Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["suggestions"], json!(["One", "Two", "Three"]));
        assert_eq!(reply["source"], "model");

        let (status, reply) = app
            .send(Method::POST, "/api/joke/generate", Some(body))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["source"], "fallback");
        assert_eq!(reply["suggestions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_generate_rejects_off_topic_and_empty_input() {
        let app = TestApp::new(Some(ScriptedProvider::text("[]")));

        let (status, body) = app
            .send(
                Method::POST,
                "/api/joke/generate",
                Some(json!({"type": "setup", "content": "what's the weather tomorrow"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!(OFF_TOPIC_MESSAGE));

        let (status, _) = app
            .send(
                Method::POST,
                "/api/joke/generate",
                Some(json!({"type": "punchline"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_assistant_is_rate_limited() {
        let mut config = AppConfig::default();
        config.rate_limit = RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        };
        let app = TestApp::with_config(None, config);
        let body = json!({"type": "setup", "content": "dating apps"});

        let (status, _) = app
            .send(Method::POST, "/api/joke/generate", Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, reply) = app
            .send(Method::POST, "/api/joke/generate", Some(body))
            .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(reply, json!(RATE_LIMIT_MESSAGE));

        // CRUD routes are not counted
        let (status, _) = app.send(Method::GET, "/api/jokes", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_optimize_rejects_non_permutation() {
        let app = TestApp::new(Some(ScriptedProvider::text(
            r#"{"optimizedOrder": ["a", "a"], "reasoning": "twice is nice"}"#,
        )));
        let jokes = json!([
            {"id": "a", "title": "A", "energy": "low", "type": "story"},
            {"id": "b", "title": "B", "energy": "high", "type": "one-liner"}
        ]);

        let (status, body) = app
            .send(
                Method::POST,
                "/api/routine/optimize",
                Some(json!({"jokes": jokes})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, json!(API_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_stored_routine_flow_is_persisted() {
        let app = TestApp::new(Some(ScriptedProvider::text(
            "```json\n{\"flowScore\": 140, \"energyProgression\": [40, 80], \"topicDiversity\": 55, \"suggestions\": [], \"issues\": []}\n```",
        )));
        let a = app.create_joke("A", 60).await;
        let b = app.create_joke("B", 60).await;
        let (_, body) = app
            .send(
                Method::POST,
                "/api/routines",
                Some(json!({"name": "Set", "jokeIds": [a, b]})),
            )
            .await;
        let routine = body["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .send(Method::POST, &format!("/api/routines/{}/flow", routine), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["flowScore"], 100);
        assert_eq!(body["routine"]["flowScore"], 100);

        let (_, body) = app
            .send(Method::GET, &format!("/api/routines/{}", routine), None)
            .await;
        assert_eq!(body["flowScore"], 100);
    }

    #[tokio::test]
    async fn test_migrate_reports_counts() {
        let app = TestApp::new(None);

        let (status, body) = app
            .send(
                Method::POST,
                "/api/migrate",
                Some(json!({
                    "jokes": [{"id": "old", "title": "Old", "setup": "s", "punchline": "p"}],
                    "routines": [{"name": "Set", "jokeIds": ["old", "missing"]}]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["jokesCreated"], 1);
        assert_eq!(body["routinesCreated"], 1);
        assert_eq!(body["message"], "Successfully migrated 1 jokes and 1 routines");

        let (_, routines) = app.send(Method::GET, "/api/routines", None).await;
        assert_eq!(routines[0]["jokeIds"].as_array().unwrap().len(), 1);
    }
}
