use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use serde_json::Value;
use tower::ServiceExt;

use fleetdesk_api::config::AppConfig;
use fleetdesk_api::db::{establish_connection_with_config, run_migrations, DbConfig};
use fleetdesk_api::errors::ServiceError;
use fleetdesk_api::handlers::AppServices;
use fleetdesk_api::render::pdf::PdfEngine;
use fleetdesk_api::AppState;

pub const TEST_JWT_SECRET: &str =
    "this_is_a_development_secret_key_that_is_at_least_64_characters_long_for_testing";
pub const TEST_BASE_URL: &str = "http://localhost:8080";

/// Stub engine: prefixes the HTML with a fake PDF header so tests can assert
/// on substituted content without a browser.
pub struct StubPdfEngine;

#[async_trait]
impl PdfEngine for StubPdfEngine {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, ServiceError> {
        let mut bytes = b"%PDF-STUB\n".to_vec();
        bytes.extend_from_slice(html.as_bytes());
        Ok(bytes)
    }
}

/// Engine that always fails, for exercising the 500 path.
pub struct FailingPdfEngine;

#[async_trait]
impl PdfEngine for FailingPdfEngine {
    async fn render_pdf(&self, _html: &str) -> Result<Vec<u8>, ServiceError> {
        Err(ServiceError::RenderError("browser went away".to_string()))
    }
}

pub struct TestApp {
    pub state: AppState,
    router: axum::Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_engine(Arc::new(StubPdfEngine)).await
    }

    pub async fn with_engine(engine: Arc<dyn PdfEngine>) -> Self {
        // A single pooled connection keeps the in-memory database alive and
        // shared for the whole test.
        let db_config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let db = establish_connection_with_config(&db_config)
            .await
            .expect("connect to in-memory sqlite");
        run_migrations(&db).await.expect("run migrations");

        let db = Arc::new(db);
        let services = AppServices::new(db.clone(), engine, TEST_BASE_URL.to_string());
        let state = AppState {
            db,
            config: test_config(),
            services,
        };
        let router = fleetdesk_api::api::routes().with_state(state.clone());

        Self { state, router }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response<Body> {
        self.send(method, uri, body, None).await
    }

    pub async fn request_with_bearer(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: &str,
    ) -> Response<Body> {
        self.send(method, uri, body, Some(token)).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("dispatch request")
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        host: "0.0.0.0".to_string(),
        port: 8080,
        environment: "test".to_string(),
        log_level: "info".to_string(),
        log_json: false,
        auto_migrate: true,
        public_base_url: TEST_BASE_URL.to_string(),
        chrome_binary: None,
        cors_allowed_origins: None,
        cors_allow_any_origin: false,
        db_max_connections: 1,
        db_min_connections: 1,
        db_connect_timeout_secs: 30,
        db_idle_timeout_secs: 600,
        db_acquire_timeout_secs: 8,
    }
}

/// Mint a bearer token accepted by the test config.
pub fn make_bearer_token(sub: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[derive(serde::Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        exp: usize,
    }

    let claims = Claims {
        sub,
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("encode test token")
}

/// Read a decimal JSON field without depending on its serialized scale
/// ("530" and "530.00" compare equal as decimals).
pub fn decimal_field(value: &Value, key: &str) -> rust_decimal::Decimal {
    value[key]
        .as_str()
        .unwrap_or_else(|| panic!("field {} is not a string", key))
        .parse()
        .unwrap_or_else(|e| panic!("field {} is not a decimal: {}", key, e))
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}

pub async fn response_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body")
        .to_vec()
}
