use crate::{
    db::DbPool,
    entities::bid::{self, BidStatus, Entity as BidEntity},
    entities::bid_item::Entity as BidItemEntity,
    errors::ServiceError,
    services::valuation,
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Revenue bucket for one calendar month
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MonthlyRevenueBucket {
    /// Year-month in `YYYY-MM` form
    pub month: String,
    pub revenue: Decimal,
}

/// One client organization ranked by won bids
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopClient {
    pub client_org: String,
    pub wins: i64,
}

/// KPI dataset for the dashboard, computed over one date window
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Bids decided either way (won or lost) in the window
    pub total_competed: i64,
    pub total_won: i64,
    /// Won over competed, as a percentage; zero when nothing competed
    pub success_rate: f64,
    /// Sum of proposed values over won bids
    pub total_revenue: Decimal,
    /// Sum of gross profits over won bids
    pub total_gross_profit: Decimal,
    /// Average proposed value of a won bid; zero when there are no wins
    pub average_win_value: Decimal,
    /// Count of bids per status present in the window
    pub funnel: HashMap<String, i64>,
    /// Won-bid revenue bucketed by opening month, chronologically ascending,
    /// sparse: months without wins produce no bucket
    pub monthly_revenue: Vec<MonthlyRevenueBucket>,
    /// Top 5 client organizations by won-bid count
    pub top_clients: Vec<TopClient>,
}

/// Read-only KPI aggregation over bids whose opening date falls in a window
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Generates the dashboard dataset for `[start_date, end_date]`
    /// inclusive on the opening date. Defaults: January 1 of the current
    /// UTC year through today.
    #[instrument(skip(self))]
    pub async fn generate_dashboard(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<DashboardReport, ServiceError> {
        let today = Utc::now().date_naive();
        let start_date =
            start_date.unwrap_or_else(|| NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today));
        let end_date = end_date.unwrap_or(today);

        let db = &*self.db_pool;
        let bids_with_items = BidEntity::find()
            .filter(bid::Column::OpeningDate.gte(start_date))
            .filter(bid::Column::OpeningDate.lte(end_date))
            .find_with_related(BidItemEntity)
            .all(db)
            .await?;

        let mut total_competed: i64 = 0;
        let mut total_won: i64 = 0;
        let mut total_revenue = Decimal::ZERO;
        let mut total_gross_profit = Decimal::ZERO;
        let mut funnel: HashMap<String, i64> = HashMap::new();
        let mut monthly: BTreeMap<String, Decimal> = BTreeMap::new();
        // client -> (wins, first-seen index) so ties keep storage order
        let mut client_wins: HashMap<String, (i64, usize)> = HashMap::new();

        for (index, (bid, items)) in bids_with_items.iter().enumerate() {
            *funnel.entry(bid.status.as_str().to_string()).or_insert(0) += 1;

            if bid.status.is_competed() {
                total_competed += 1;
            }

            if bid.status == BidStatus::Won {
                total_won += 1;

                let proposed = bid.proposed_value.unwrap_or(Decimal::ZERO);
                total_revenue += proposed;
                total_gross_profit +=
                    valuation::bid_financials(bid.proposed_value, items).gross_profit;

                let month = format!(
                    "{:04}-{:02}",
                    bid.opening_date.year(),
                    bid.opening_date.month()
                );
                *monthly.entry(month).or_insert(Decimal::ZERO) += proposed;

                let entry = client_wins
                    .entry(bid.client_org.clone())
                    .or_insert((0, index));
                entry.0 += 1;
            }
        }

        let success_rate = if total_competed > 0 {
            total_won as f64 / total_competed as f64 * 100.0
        } else {
            0.0
        };

        let average_win_value = if total_won > 0 {
            total_revenue / Decimal::from(total_won)
        } else {
            Decimal::ZERO
        };

        // BTreeMap keys are YYYY-MM, so iteration is already chronological
        let monthly_revenue = monthly
            .into_iter()
            .map(|(month, revenue)| MonthlyRevenueBucket { month, revenue })
            .collect();

        let mut ranked: Vec<(String, i64, usize)> = client_wins
            .into_iter()
            .map(|(client, (wins, first_seen))| (client, wins, first_seen))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(5);
        let top_clients = ranked
            .into_iter()
            .map(|(client_org, wins, _)| TopClient { client_org, wins })
            .collect();

        info!(
            %start_date,
            %end_date,
            total_competed,
            total_won,
            "dashboard report generated"
        );

        Ok(DashboardReport {
            start_date,
            end_date,
            total_competed,
            total_won,
            success_rate,
            total_revenue,
            total_gross_profit,
            average_win_value,
            funnel,
            monthly_revenue,
            top_clients,
        })
    }
}
