use axum::Json;
use utoipa::OpenApi;

/// OpenAPI document for the bid-tracking API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bidtrack API",
        description = "Procurement bid tracking: bids, line-item costs, cash ledger, and KPI reporting",
        version = env!("CARGO_PKG_VERSION"),
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::entities::bid::BidStatus,
        crate::services::valuation::BidFinancials,
        crate::services::bids::CreateBidRequest,
        crate::services::bids::AddLineItemRequest,
        crate::services::bids::BidResponse,
        crate::services::bids::LineItemResponse,
        crate::services::bids::BidDetailResponse,
        crate::services::ledger::EntryKind,
        crate::services::ledger::RecordEntryRequest,
        crate::services::ledger::LedgerEntryResponse,
        crate::services::ledger::LedgerListResponse,
        crate::services::reconciliation::UpdateBidOutcomeRequest,
        crate::services::reconciliation::CostPostingResponse,
        crate::services::reconciliation::OutcomeResponse,
        crate::services::reports::DashboardReport,
        crate::services::reports::MonthlyRevenueBucket,
        crate::services::reports::TopClient,
        crate::handlers::auth::RegisterRequest,
        crate::handlers::auth::LoginRequest,
        crate::handlers::auth::RegisteredResponse,
        crate::auth::TokenPair,
    )),
    tags(
        (name = "bids", description = "Bid and line-item management"),
        (name = "ledger", description = "Cash ledger"),
        (name = "reports", description = "KPI reporting"),
        (name = "auth", description = "Authentication"),
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document as JSON
pub async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
