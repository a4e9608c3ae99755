pub mod auth;
pub mod bids;
pub mod common;
pub mod ledger;
pub mod reports;

use crate::db::DbPool;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub bids: Arc<crate::services::bids::BidService>,
    pub ledger: Arc<crate::services::ledger::LedgerService>,
    pub reconciliation: Arc<crate::services::reconciliation::ReconciliationService>,
    pub reports: Arc<crate::services::reports::ReportService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            bids: Arc::new(crate::services::bids::BidService::new(db_pool.clone())),
            ledger: Arc::new(crate::services::ledger::LedgerService::new(db_pool.clone())),
            reconciliation: Arc::new(crate::services::reconciliation::ReconciliationService::new(
                db_pool.clone(),
            )),
            reports: Arc::new(crate::services::reports::ReportService::new(db_pool)),
        }
    }
}
