use crate::{
    db::DbPool,
    entities::ledger_entry::{self, Entity as LedgerEntryEntity},
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Direction of a manually recorded cash movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Debit,
    Credit,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordEntryRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// Unsigned magnitude; the kind determines the sign
    pub amount: Decimal,
    pub kind: EntryKind,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LedgerEntryResponse {
    pub id: Uuid,
    pub entry_date: DateTime<Utc>,
    pub description: String,
    pub amount: Decimal,
    pub bid_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LedgerListResponse {
    pub entries: Vec<LedgerEntryResponse>,
    pub current_balance: Decimal,
}

/// Service for the cash ledger: manual entries, listing, and the running
/// balance. Automatic bid-cost postings live in the reconciliation service.
#[derive(Clone)]
pub struct LedgerService {
    db_pool: Arc<DbPool>,
}

impl LedgerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Records a manual general-ledger entry with no bid reference.
    /// Debits are stored with a negated amount.
    #[instrument(skip(self, request))]
    pub async fn record_entry(
        &self,
        request: RecordEntryRequest,
    ) -> Result<LedgerEntryResponse, ServiceError> {
        request.validate()?;
        if request.amount <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Amount must be positive".to_string(),
            ));
        }

        let signed_amount = match request.kind {
            EntryKind::Debit => -request.amount,
            EntryKind::Credit => request.amount,
        };

        let db = &*self.db_pool;
        let now = Utc::now();
        let entry = ledger_entry::ActiveModel {
            id: Set(Uuid::new_v4()),
            entry_date: Set(now),
            description: Set(request.description),
            amount: Set(signed_amount),
            bid_id: Set(None),
            created_at: Set(now),
        };

        let model = entry.insert(db).await?;
        info!(entry_id = %model.id, amount = %model.amount, "manual ledger entry recorded");
        Ok(Self::to_response(model))
    }

    /// Lists all entries, newest first, together with the current balance
    #[instrument(skip(self))]
    pub async fn list_entries(&self) -> Result<LedgerListResponse, ServiceError> {
        let db = &*self.db_pool;

        let entries = LedgerEntryEntity::find()
            .order_by_desc(ledger_entry::Column::EntryDate)
            .order_by_desc(ledger_entry::Column::CreatedAt)
            .all(db)
            .await?;

        let current_balance = entries.iter().map(|e| e.amount).sum();

        Ok(LedgerListResponse {
            entries: entries.into_iter().map(Self::to_response).collect(),
            current_balance,
        })
    }

    /// Sum of all entry amounts; zero when the ledger is empty
    #[instrument(skip(self))]
    pub async fn current_balance(&self) -> Result<Decimal, ServiceError> {
        let db = &*self.db_pool;
        let entries = LedgerEntryEntity::find().all(db).await?;
        Ok(entries.iter().map(|e| e.amount).sum())
    }

    fn to_response(entry: ledger_entry::Model) -> LedgerEntryResponse {
        LedgerEntryResponse {
            id: entry.id,
            entry_date: entry.entry_date,
            description: entry.description,
            amount: entry.amount,
            bid_id: entry.bid_id,
        }
    }
}
