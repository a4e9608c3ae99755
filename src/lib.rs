//! Bidtrack API Library
//!
//! Backend service for tracking public procurement bids: per-bid costs and
//! margins, a signed cash ledger reconciled with bid outcomes, and KPI
//! reporting over a date window.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{routing::get, Extension, Json, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;

use auth::AuthRouterExt;

/// Shared application state threaded through every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
    pub auth: Arc<auth::AuthService>,
}

/// Composes the full application router. Everything under `/api/v1` requires
/// an authenticated bearer token; registration, login, health, and the
/// OpenAPI document are public.
pub fn app_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .nest("/bids", handlers::bids::router())
        .nest("/ledger", handlers::ledger::router())
        .nest("/reports", handlers::reports::router())
        .with_auth()
        .layer(Extension(state.auth.clone()));

    Router::new()
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi::serve_openapi))
        .nest("/auth", handlers::auth::router())
        .nest("/api/v1", protected)
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
