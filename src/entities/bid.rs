use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a bid. Any status is reachable from any other by
/// explicit staff action; only the ledger reversal side effect is gated on
/// the Lost/Cancelled edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    #[sea_orm(string_value = "under_review")]
    UnderReview,
    #[sea_orm(string_value = "competing")]
    Competing,
    #[sea_orm(string_value = "won")]
    Won,
    #[sea_orm(string_value = "lost")]
    Lost,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl Default for BidStatus {
    fn default() -> Self {
        Self::UnderReview
    }
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnderReview => "under_review",
            Self::Competing => "competing",
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Cancelled => "cancelled",
        }
    }

    /// Statuses counted as "competed" by the KPI engine
    pub fn is_competed(&self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    /// Statuses that trigger the ledger cost reversal on entry
    pub fn is_closed_out(&self) -> bool {
        matches!(self, Self::Lost | Self::Cancelled)
    }
}

/// A public procurement bid being tracked from entry to win/loss
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Client organization running the solicitation
    pub client_org: String,

    /// Solicitation (edital) number
    pub solicitation_number: String,

    /// Subject / description of the procurement
    pub subject: String,

    /// Opening date of the solicitation
    pub opening_date: Date,

    /// Our proposed value; treated as zero when absent
    pub proposed_value: Option<Decimal>,

    pub status: BidStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bid_item::Entity")]
    BidItem,
    #[sea_orm(has_many = "super::ledger_entry::Entity")]
    LedgerEntry,
}

impl Related<super::bid_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BidItem.def()
    }
}

impl Related<super::ledger_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
