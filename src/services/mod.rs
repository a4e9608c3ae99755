pub mod bids;
pub mod ledger;
pub mod reconciliation;
pub mod reports;
pub mod valuation;
