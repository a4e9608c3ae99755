use super::common::{
    created_response, map_service_error, no_content_response, success_response,
};
use crate::{
    handlers::AppState,
    services::bids::{AddLineItemRequest, BidResponse, CreateBidRequest},
    services::reconciliation::UpdateBidOutcomeRequest,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct BidListResponse {
    pub bids: Vec<BidResponse>,
    /// Running cash balance shown alongside the bid list
    pub current_balance: Decimal,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_bids).post(create_bid))
        .route("/:id", get(get_bid).delete(delete_bid))
        .route("/:id/items", post(add_line_item))
        .route("/items/:item_id", delete(remove_line_item))
        .route("/:id/post-cost", post(post_bid_cost))
        .route("/:id/outcome", post(update_bid_outcome))
}

/// Create a new bid
async fn create_bid(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBidRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let bid = state
        .services
        .bids
        .create_bid(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(bid))
}

/// List all bids with the current ledger balance
async fn list_bids(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let bids = state
        .services
        .bids
        .list_bids()
        .await
        .map_err(map_service_error)?;
    let current_balance = state
        .services
        .ledger
        .current_balance()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(BidListResponse {
        bids,
        current_balance,
    }))
}

/// Get one bid with line items and computed financials
async fn get_bid(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let bid = state
        .services
        .bids
        .get_bid(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(bid))
}

/// Delete a bid and its line items; ledger history is kept
async fn delete_bid(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .bids
        .delete_bid(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

/// Add a line item to a bid
async fn add_line_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddLineItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .bids
        .add_line_item(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(item))
}

/// Remove a line item
async fn remove_line_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .bids
        .remove_line_item(item_id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

/// Debit the bid's current cost to the ledger and mark it competing
async fn post_bid_cost(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let posting = state
        .services
        .reconciliation
        .post_bid_cost(id)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(posting))
}

/// Update the bid's status and proposed value, reversing the posted cost
/// when the bid is lost or cancelled
async fn update_bid_outcome(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBidOutcomeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .services
        .reconciliation
        .update_bid_outcome(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(outcome))
}
