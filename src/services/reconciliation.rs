//! Keeps the cash ledger consistent with each bid's competitive status:
//! entering competition debits the bid's current cost, and losing or
//! cancelling the bid credits it back. Entries are append-only; a reversal
//! offsets the original debit rather than touching it.

use crate::{
    db::DbPool,
    entities::bid::{self, BidStatus, Entity as BidEntity},
    entities::bid_item::{self, Entity as BidItemEntity},
    entities::ledger_entry::{self, Entity as LedgerEntryEntity},
    errors::ServiceError,
    services::ledger::LedgerEntryResponse,
    services::valuation,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateBidOutcomeRequest {
    pub status: BidStatus,
    /// New proposed value; absent means zero, matching the form default
    #[serde(default)]
    pub proposed_value: Option<Decimal>,
}

/// Result of posting a bid's cost to the ledger
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CostPostingResponse {
    pub bid_id: Uuid,
    pub status: BidStatus,
    pub entry: LedgerEntryResponse,
}

/// Result of an outcome update, with the reversal entry when one fired
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OutcomeResponse {
    pub bid_id: Uuid,
    pub status: BidStatus,
    pub proposed_value: Option<Decimal>,
    pub reversal: Option<LedgerEntryResponse>,
}

/// Binds bid status transitions to ledger postings. Every operation runs in
/// a single transaction: the status change and the ledger entry land
/// together or not at all. Concurrent posts for the same bid are serialized
/// by the store; the loser trips the idempotence guard.
#[derive(Clone)]
pub struct ReconciliationService {
    db_pool: Arc<DbPool>,
}

impl ReconciliationService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Debits the bid's current total cost to the ledger and moves the bid
    /// to `Competing`.
    ///
    /// The idempotence guard matches on the exact amount: an entry for this
    /// bid equal to minus the current cost means the cost is already posted.
    /// A cost that changed since a prior posting does not match and posts
    /// again additively, mirroring the pre-existing ledger behavior this
    /// service replaces.
    #[instrument(skip(self), fields(bid_id = %bid_id))]
    pub async fn post_bid_cost(&self, bid_id: Uuid) -> Result<CostPostingResponse, ServiceError> {
        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "failed to start transaction for cost posting");
            ServiceError::DatabaseError(e)
        })?;

        let bid = BidEntity::find_by_id(bid_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bid {} not found", bid_id)))?;

        let items = BidItemEntity::find()
            .filter(bid_item::Column::BidId.eq(bid_id))
            .all(&txn)
            .await?;
        let total_cost = valuation::bid_financials(bid.proposed_value, &items).total_cost;

        if total_cost <= Decimal::ZERO {
            return Err(ServiceError::NothingToPost(format!(
                "Bid {} has no cost to post; add line items first",
                bid.solicitation_number
            )));
        }

        let existing = Self::entries_for_bid(&txn, bid_id).await?;
        if existing.iter().any(|e| e.amount == -total_cost) {
            return Err(ServiceError::AlreadyPosted(format!(
                "Cost for bid {} was already posted to the ledger",
                bid.solicitation_number
            )));
        }

        let now = Utc::now();
        let entry = ledger_entry::ActiveModel {
            id: Set(Uuid::new_v4()),
            entry_date: Set(now),
            description: Set(format!(
                "Proposal cost debit - solicitation {}",
                bid.solicitation_number
            )),
            amount: Set(-total_cost),
            bid_id: Set(Some(bid_id)),
            created_at: Set(now),
        };
        let entry = entry.insert(&txn).await?;

        let mut active: bid::ActiveModel = bid.into();
        active.status = Set(BidStatus::Competing);
        active.updated_at = Set(Some(now));
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        info!(bid_id = %bid_id, amount = %entry.amount, "bid cost posted, bid now competing");

        Ok(CostPostingResponse {
            bid_id,
            status: updated.status,
            entry: LedgerEntryResponse {
                id: entry.id,
                entry_date: entry.entry_date,
                description: entry.description,
                amount: entry.amount,
                bid_id: entry.bid_id,
            },
        })
    }

    /// Sets the bid's proposed value and status unconditionally. When the
    /// status crosses into Lost/Cancelled from outside that pair, the first
    /// debit entry for the bid is offset with a reversing credit; repeated
    /// updates inside the pair never re-reverse.
    #[instrument(skip(self, request), fields(bid_id = %bid_id, new_status = ?request.status))]
    pub async fn update_bid_outcome(
        &self,
        bid_id: Uuid,
        request: UpdateBidOutcomeRequest,
    ) -> Result<OutcomeResponse, ServiceError> {
        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "failed to start transaction for outcome update");
            ServiceError::DatabaseError(e)
        })?;

        let bid = BidEntity::find_by_id(bid_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Bid {} not found", bid_id)))?;

        let previous_status = bid.status;
        let solicitation_number = bid.solicitation_number.clone();
        let now = Utc::now();

        let mut active: bid::ActiveModel = bid.into();
        active.proposed_value = Set(request.proposed_value);
        active.status = Set(request.status);
        active.updated_at = Set(Some(now));
        let updated = active.update(&txn).await?;

        let mut reversal = None;
        if request.status.is_closed_out() && !previous_status.is_closed_out() {
            // First debit in stable insertion order; there is no uniqueness
            // guarantee, and only that one gets offset.
            let debit = Self::entries_for_bid(&txn, bid_id)
                .await?
                .into_iter()
                .find(|e| e.amount < Decimal::ZERO);

            if let Some(debit) = debit {
                let entry = ledger_entry::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    entry_date: Set(now),
                    description: Set(format!(
                        "Cost reversal ({}) - solicitation {}",
                        request.status.as_str(),
                        solicitation_number
                    )),
                    amount: Set(debit.amount.abs()),
                    bid_id: Set(Some(bid_id)),
                    created_at: Set(now),
                };
                let entry = entry.insert(&txn).await?;
                info!(bid_id = %bid_id, amount = %entry.amount, "posted cost reversed to ledger");
                reversal = Some(LedgerEntryResponse {
                    id: entry.id,
                    entry_date: entry.entry_date,
                    description: entry.description,
                    amount: entry.amount,
                    bid_id: entry.bid_id,
                });
            }
        }

        txn.commit().await?;
        info!(bid_id = %bid_id, status = ?updated.status, "bid outcome updated");

        Ok(OutcomeResponse {
            bid_id,
            status: updated.status,
            proposed_value: updated.proposed_value,
            reversal,
        })
    }

    async fn entries_for_bid(
        txn: &DatabaseTransaction,
        bid_id: Uuid,
    ) -> Result<Vec<ledger_entry::Model>, ServiceError> {
        Ok(LedgerEntryEntity::find()
            .filter(ledger_entry::Column::BidId.eq(bid_id))
            .order_by_asc(ledger_entry::Column::CreatedAt)
            .order_by_asc(ledger_entry::Column::Id)
            .all(txn)
            .await?)
    }
}
