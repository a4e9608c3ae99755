use super::common::{created_response, map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState, services::ledger::RecordEntryRequest};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_entries).post(record_entry))
}

/// List all ledger entries, newest first, with the current balance
async fn list_entries(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let ledger = state
        .services
        .ledger
        .list_entries()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ledger))
}

/// Record a manual debit or credit with no bid reference
async fn record_entry(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RecordEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .services
        .ledger
        .record_entry(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(entry))
}
