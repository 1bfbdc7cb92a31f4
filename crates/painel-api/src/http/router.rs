//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Leads
        .route("/leads", post(handlers::lead::create_lead))
        .route("/leads", get(handlers::lead::list_leads))
        .route("/leads/{id}", get(handlers::lead::get_lead))
        .route("/leads/{id}", put(handlers::lead::update_lead))
        .route("/leads/{id}", delete(handlers::lead::delete_lead))
        // Vendors
        .route("/vendors", post(handlers::vendor::create_vendor))
        .route("/vendors", get(handlers::vendor::list_vendors))
        .route("/vendors/{id}", get(handlers::vendor::get_vendor))
        .route("/vendors/{id}", put(handlers::vendor::update_vendor))
        .route("/vendors/{id}", delete(handlers::vendor::delete_vendor))
        // Products
        .route("/products", post(handlers::product::create_product))
        .route("/products", get(handlers::product::list_products))
        .route(
            "/products/categories",
            get(handlers::product::list_categories),
        )
        .route("/products/{id}", get(handlers::product::get_product))
        .route("/products/{id}", put(handlers::product::update_product))
        .route("/products/{id}", delete(handlers::product::delete_product))
        // Campaigns
        .route("/campaigns", post(handlers::campaign::create_campaign))
        .route("/campaigns", get(handlers::campaign::list_campaigns))
        .route(
            "/campaigns/template",
            post(handlers::campaign::create_template_campaign),
        )
        .route("/campaigns/{id}", get(handlers::campaign::get_campaign))
        .route("/campaigns/{id}", delete(handlers::campaign::delete_campaign))
        .route(
            "/campaigns/{id}/sends",
            get(handlers::campaign::list_sends),
        )
        .route(
            "/campaigns/{id}/dispatch",
            post(handlers::campaign::dispatch_campaign),
        )
        .route(
            "/campaigns/{id}/release",
            post(handlers::campaign::release_campaign),
        )
        // Message templates
        .route(
            "/templates",
            get(handlers::template::list_templates).post(handlers::template::submit_template),
        )
        // Conversation history
        .route(
            "/conversations",
            get(handlers::conversation::list_sessions),
        )
        .route(
            "/conversations/{session_id}",
            get(handlers::conversation::get_session),
        )
        // Dashboard stats
        .route("/stats", get(handlers::stats::get_stats));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use painel_infra::sqlite::pool::DatabasePool;
    use painel_infra::whatsapp::MetaCredentials;
    use painel_types::config::GlobalConfig;
    use secrecy::SecretString;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::http::extractors::auth::create_api_key;

    async fn test_app() -> (Router, String) {
        test_app_with(GlobalConfig::default(), MetaCredentials::default()).await
    }

    async fn test_app_with(config: GlobalConfig, credentials: MetaCredentials) -> (Router, String) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let data_dir = dir.path().to_path_buf();
        std::mem::forget(dir);

        let pool = DatabasePool::new(&url).await.unwrap();
        let key = create_api_key(&pool, "test").await.unwrap();
        let state = AppState::build(pool, config, data_dir, credentials);
        (build_router(state), key)
    }

    fn request(method: &str, uri: &str, key: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {key}"));
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_needs_no_key() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_api_rejects_missing_and_wrong_keys() {
        let (app, _) = test_app().await;
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/v1/leads").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(request("GET", "/api/v1/leads", "painel_wrong", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["errors"][0]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_lead_lifecycle() {
        let (app, key) = test_app().await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/leads",
                &key,
                Some(serde_json::json!({"name": "Maria", "contact": "87 99205-2920"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["status"], "novo");

        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/leads?search=mar", &key, None))
            .await
            .unwrap();
        let listed = json_body(response).await;
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(request("DELETE", &format!("/api/v1/leads/{id}"), &key, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request("GET", &format!("/api/v1/leads/{id}"), &key, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["errors"][0]["code"], "LEAD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_blank_lead_fields_are_rejected() {
        let (app, key) = test_app().await;
        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/leads",
                &key,
                Some(serde_json::json!({"name": "  ", "contact": ""})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_id_is_a_validation_error() {
        let (app, key) = test_app().await;
        let response = app
            .oneshot(request("GET", "/api/v1/campaigns/not-a-uuid", &key, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dispatch_without_credentials_is_refused() {
        let (app, key) = test_app().await;
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/campaigns",
                &key,
                Some(serde_json::json!({
                    "name": "Promoção",
                    "message": "Olá!",
                    "audience": "leads"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let campaign = json_body(response).await;
        assert_eq!(campaign["data"]["status"], "rascunho");
        let id = campaign["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(request("POST", &format!("/api/v1/campaigns/{id}/dispatch"), &key, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            json_body(response).await["errors"][0]["code"],
            "MESSAGING_NOT_CONFIGURED"
        );

        let response = app
            .oneshot(request("GET", "/api/v1/campaigns?status=bogus", &key, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dispatch_is_accepted_once_then_released() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/phone-1/messages"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"messages": [{"id": "wamid.1"}]})),
            )
            .mount(&server)
            .await;

        let mut config = GlobalConfig::default();
        config.messaging.api_base_url = server.uri();
        // Keeps the background loop parked after its first send.
        config.messaging.send_delay_ms = 60_000;
        let credentials = MetaCredentials {
            token: Some(SecretString::from("test-token".to_string())),
            waba_id: None,
            phone_id: Some("phone-1".to_string()),
        };
        let (app, key) = test_app_with(config, credentials).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/leads",
                &key,
                Some(serde_json::json!({"name": "Maria", "contact": "87 99205-2920"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/campaigns",
                &key,
                Some(serde_json::json!({
                    "name": "Promoção",
                    "message": "Olá!",
                    "audience": "leads"
                })),
            ))
            .await
            .unwrap();
        let campaign = json_body(response).await;
        let id = campaign["data"]["id"].as_str().unwrap().to_string();
        let dispatch = format!("/api/v1/campaigns/{id}/dispatch");
        let release = format!("/api/v1/campaigns/{id}/release");

        let response = app
            .clone()
            .oneshot(request("POST", &dispatch, &key, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let accepted = json_body(response).await;
        assert_eq!(accepted["data"]["id"], id.as_str());
        assert_eq!(accepted["data"]["status"], "processando");
        assert_eq!(accepted["data"]["audience"], "leads");
        assert_eq!(accepted["data"]["total_targets"], 1);

        let response = app
            .clone()
            .oneshot(request("POST", &dispatch, &key, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            json_body(response).await["errors"][0]["code"],
            "CAMPAIGN_PROCESSING"
        );

        let response = app
            .clone()
            .oneshot(request("POST", &release, &key, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"]["status"], "pausada");

        let response = app
            .oneshot(request("POST", &release, &key, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            json_body(response).await["errors"][0]["code"],
            "CAMPAIGN_NOT_PROCESSING"
        );
    }

    #[tokio::test]
    async fn test_templates_need_credentials() {
        let (app, key) = test_app().await;
        let response = app
            .oneshot(request("GET", "/api/v1/templates", &key, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_stats_on_empty_database() {
        let (app, key) = test_app().await;
        let response = app
            .clone()
            .oneshot(request("GET", "/api/v1/stats", &key, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let stats = json_body(response).await;
        assert_eq!(stats["data"]["total_conversations"], 0);
        assert_eq!(stats["data"]["conversations_by_hour"].as_array().unwrap().len(), 24);

        let response = app
            .oneshot(request(
                "GET",
                "/api/v1/stats?start=2026-02-01T00:00:00Z&end=2026-01-01T00:00:00Z",
                &key,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let (app, key) = test_app().await;
        let response = app
            .oneshot(request(
                "GET",
                "/api/v1/conversations/558799999999@s.whatsapp.net",
                &key,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
