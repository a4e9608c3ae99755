use crate::{
    db::DbPool,
    entities::bid::{self, ActiveModel as BidActiveModel, BidStatus, Entity as BidEntity},
    entities::bid_item::{self, Entity as BidItemEntity},
    errors::ServiceError,
    services::valuation,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request/Response types for the bid service

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBidRequest {
    #[validate(length(min = 1, message = "Client organization is required"))]
    pub client_org: String,
    #[validate(length(min = 1, message = "Solicitation number is required"))]
    pub solicitation_number: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    pub opening_date: NaiveDate,
    pub proposed_value: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddLineItemRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,
    pub unit_cost: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BidResponse {
    pub id: Uuid,
    pub client_org: String,
    pub solicitation_number: String,
    pub subject: String,
    pub opening_date: NaiveDate,
    pub proposed_value: Option<Decimal>,
    pub status: BidStatus,
    pub total_cost: Decimal,
    pub gross_profit: Decimal,
    pub profit_margin: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LineItemResponse {
    pub id: Uuid,
    pub bid_id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BidDetailResponse {
    #[serde(flatten)]
    pub bid: BidResponse,
    pub items: Vec<LineItemResponse>,
}

/// Service for managing bids and their line items
#[derive(Clone)]
pub struct BidService {
    db_pool: Arc<DbPool>,
}

impl BidService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a new bid in `UnderReview` status
    #[instrument(skip(self, request), fields(solicitation_number = %request.solicitation_number))]
    pub async fn create_bid(&self, request: CreateBidRequest) -> Result<BidResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let bid = BidActiveModel {
            id: Set(Uuid::new_v4()),
            client_org: Set(request.client_org),
            solicitation_number: Set(request.solicitation_number),
            subject: Set(request.subject),
            opening_date: Set(request.opening_date),
            proposed_value: Set(request.proposed_value),
            status: Set(BidStatus::UnderReview),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let model = bid.insert(db).await?;
        info!(bid_id = %model.id, "bid created");
        Ok(Self::to_response(model, &[]))
    }

    /// Lists all bids, most recent opening date first
    #[instrument(skip(self))]
    pub async fn list_bids(&self) -> Result<Vec<BidResponse>, ServiceError> {
        let db = &*self.db_pool;

        let bids_with_items = BidEntity::find()
            .order_by_desc(bid::Column::OpeningDate)
            .find_with_related(BidItemEntity)
            .all(db)
            .await?;

        Ok(bids_with_items
            .into_iter()
            .map(|(bid, items)| Self::to_response(bid, &items))
            .collect())
    }

    /// Retrieves one bid with its line items and computed financials
    #[instrument(skip(self), fields(bid_id = %bid_id))]
    pub async fn get_bid(&self, bid_id: Uuid) -> Result<BidDetailResponse, ServiceError> {
        let db = &*self.db_pool;

        let bid = BidEntity::find_by_id(bid_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bid {} not found", bid_id)))?;

        let items = bid
            .find_related(BidItemEntity)
            .order_by_asc(bid_item::Column::CreatedAt)
            .all(db)
            .await?;

        let item_responses = items.iter().map(Self::item_to_response).collect();
        Ok(BidDetailResponse {
            bid: Self::to_response(bid, &items),
            items: item_responses,
        })
    }

    /// Deletes a bid and its line items in one transaction. Ledger entries
    /// referencing the bid are left in place as orphaned history.
    #[instrument(skip(self), fields(bid_id = %bid_id))]
    pub async fn delete_bid(&self, bid_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "failed to start transaction for bid deletion");
            ServiceError::DatabaseError(e)
        })?;

        let bid = BidEntity::find_by_id(bid_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bid {} not found", bid_id)))?;

        BidItemEntity::delete_many()
            .filter(bid_item::Column::BidId.eq(bid_id))
            .exec(&txn)
            .await?;
        bid.delete(&txn).await?;

        txn.commit().await?;
        info!(bid_id = %bid_id, "bid deleted with its line items");
        Ok(())
    }

    /// Adds a line item to an existing bid
    #[instrument(skip(self, request), fields(bid_id = %bid_id))]
    pub async fn add_line_item(
        &self,
        bid_id: Uuid,
        request: AddLineItemRequest,
    ) -> Result<LineItemResponse, ServiceError> {
        request.validate()?;
        if request.unit_cost < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Unit cost must not be negative".to_string(),
            ));
        }

        let db = &*self.db_pool;

        BidEntity::find_by_id(bid_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bid {} not found", bid_id)))?;

        let item = bid_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            bid_id: Set(bid_id),
            description: Set(request.description),
            quantity: Set(request.quantity),
            unit_cost: Set(request.unit_cost),
            created_at: Set(Utc::now()),
        };

        let model = item.insert(db).await?;
        info!(bid_id = %bid_id, item_id = %model.id, "line item added");
        Ok(Self::item_to_response(&model))
    }

    /// Removes a line item
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_line_item(&self, item_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let item = BidItemEntity::find_by_id(item_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Line item {} not found", item_id)))?;

        item.delete(db).await?;
        Ok(())
    }

    fn to_response(bid: bid::Model, items: &[bid_item::Model]) -> BidResponse {
        let financials = valuation::bid_financials(bid.proposed_value, items);
        BidResponse {
            id: bid.id,
            client_org: bid.client_org,
            solicitation_number: bid.solicitation_number,
            subject: bid.subject,
            opening_date: bid.opening_date,
            proposed_value: bid.proposed_value,
            status: bid.status,
            total_cost: financials.total_cost,
            gross_profit: financials.gross_profit,
            profit_margin: financials.profit_margin,
            created_at: bid.created_at,
            updated_at: bid.updated_at,
        }
    }

    fn item_to_response(item: &bid_item::Model) -> LineItemResponse {
        LineItemResponse {
            id: item.id,
            bid_id: item.bid_id,
            description: item.description.clone(),
            quantity: item.quantity,
            unit_cost: item.unit_cost,
            line_total: item.line_total(),
        }
    }
}
