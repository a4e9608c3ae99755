use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One signed cash-flow record. Negative amounts are debits (expenses),
/// positive amounts are credits (income). Entries are append-only: a posted
/// cost is never edited or deleted, only offset by a reversing credit.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// When the entry was recorded
    pub entry_date: DateTime<Utc>,

    pub description: String,

    /// Signed amount: negative = debit, positive = credit
    pub amount: Decimal,

    /// Optional reference to a bid. Deliberately not a foreign key: the
    /// referenced bid may have been deleted, leaving this entry as orphaned
    /// history with a dangling id.
    pub bid_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bid::Entity",
        from = "Column::BidId",
        to = "super::bid::Column::Id"
    )]
    Bid,
}

impl Related<super::bid::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bid.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Check if this is a debit entry
    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Check if this is a credit entry
    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}
