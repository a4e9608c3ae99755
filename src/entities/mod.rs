pub mod bid;
pub mod bid_item;
pub mod ledger_entry;
