use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use bidtrack_api::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    db,
    handlers::AppServices,
    services::bids::CreateBidRequest,
    AppState,
};

/// Helper harness for spinning up an application backed by an in-memory
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
    token: String,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_testing_purposes_only".to_string(),
            "127.0.0.1".to_string(),
            0,
        );
        // A single connection keeps the in-memory database alive and shared.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool).await.expect("migrations");

        let db = Arc::new(pool);
        let auth = Arc::new(AuthService::new(
            AuthConfig::from_app_config(&cfg),
            db.clone(),
        ));
        let services = AppServices::new(db.clone());

        let state = Arc::new(AppState {
            db,
            config: cfg,
            services,
            auth: auth.clone(),
        });
        let router = bidtrack_api::app_router(state.clone());

        auth.register("tester@example.com", "sup3r-secret-pw")
            .await
            .expect("register test account");
        let pair = auth
            .authenticate("tester@example.com", "sup3r-secret-pw")
            .await
            .expect("login test account");

        Self {
            router,
            state,
            token: pair.access_token,
        }
    }

    /// Issue a request without credentials.
    #[allow(dead_code)]
    pub async fn request(&self, method: Method, uri: &str, json: Option<Value>) -> Response {
        self.send(method, uri, json, None).await
    }

    /// Issue a request with the harness account's bearer token.
    #[allow(dead_code)]
    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        json: Option<Value>,
    ) -> Response {
        self.send(method, uri, json, Some(&self.token)).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        json: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match json {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    /// Create a bid directly through the service layer.
    #[allow(dead_code)]
    pub async fn create_bid(
        &self,
        client_org: &str,
        solicitation_number: &str,
        opening_date: NaiveDate,
        proposed_value: Option<Decimal>,
    ) -> Uuid {
        self.state
            .services
            .bids
            .create_bid(CreateBidRequest {
                client_org: client_org.to_string(),
                solicitation_number: solicitation_number.to_string(),
                subject: "Supply of goods".to_string(),
                opening_date,
                proposed_value,
            })
            .await
            .expect("create bid")
            .id
    }
}

#[allow(dead_code)]
pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Read a decimal field regardless of whether it was serialized as a JSON
/// string or number.
#[allow(dead_code)]
pub fn decimal_field(value: &Value, key: &str) -> Decimal {
    let field = value.get(key).unwrap_or_else(|| panic!("field {}", key));
    match field {
        Value::String(s) => s.parse().unwrap_or_else(|_| panic!("decimal {}", key)),
        Value::Number(n) => n
            .to_string()
            .parse()
            .unwrap_or_else(|_| panic!("decimal {}", key)),
        other => panic!("unexpected value for {}: {:?}", key, other),
    }
}

#[allow(dead_code)]
pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
