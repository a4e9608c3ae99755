//! Derived financial values for a bid. Pure functions over the bid's
//! proposed value and its line items; nothing here touches the database.

use crate::entities::bid_item;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Computed financials for a bid. Never stored; recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BidFinancials {
    /// Sum of line totals over all items, zero when there are none
    pub total_cost: Decimal,
    /// Proposed value (zero when absent) minus total cost
    pub gross_profit: Decimal,
    /// Gross profit as a percentage of the proposed value; zero when the
    /// proposed value is zero or absent
    pub profit_margin: f64,
}

/// Computes total cost, gross profit, and margin for a bid.
///
/// An empty item set yields zero cost. A zero or absent proposed value
/// yields a zero margin rather than a division error.
pub fn bid_financials(proposed_value: Option<Decimal>, items: &[bid_item::Model]) -> BidFinancials {
    let total_cost: Decimal = items.iter().map(bid_item::Model::line_total).sum();
    let value = proposed_value.unwrap_or(Decimal::ZERO);
    let gross_profit = value - total_cost;

    let profit_margin = if value > Decimal::ZERO {
        (gross_profit / value * Decimal::from(100))
            .to_f64()
            .unwrap_or(0.0)
    } else {
        0.0
    };

    BidFinancials {
        total_cost,
        gross_profit,
        profit_margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn item(quantity: i32, unit_cost: Decimal) -> bid_item::Model {
        bid_item::Model {
            id: Uuid::new_v4(),
            bid_id: Uuid::new_v4(),
            description: "widget".to_string(),
            quantity,
            unit_cost,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn no_items_means_zero_cost() {
        let fin = bid_financials(Some(dec!(1000)), &[]);
        assert_eq!(fin.total_cost, Decimal::ZERO);
        assert_eq!(fin.gross_profit, dec!(1000));
        assert_eq!(fin.profit_margin, 100.0);
    }

    #[test]
    fn absent_proposed_value_is_treated_as_zero() {
        let fin = bid_financials(None, &[item(2, dec!(10))]);
        assert_eq!(fin.total_cost, dec!(20));
        assert_eq!(fin.gross_profit, dec!(-20));
        assert_eq!(fin.profit_margin, 0.0);
    }

    #[test]
    fn zero_proposed_value_never_divides_by_zero() {
        let fin = bid_financials(Some(Decimal::ZERO), &[item(1, dec!(50))]);
        assert_eq!(fin.gross_profit, dec!(-50));
        assert_eq!(fin.profit_margin, 0.0);
    }

    #[test]
    fn margin_matches_worked_scenario() {
        // value 10000, items 2 x 1000 and 1 x 500
        let items = vec![item(2, dec!(1000)), item(1, dec!(500))];
        let fin = bid_financials(Some(dec!(10000)), &items);
        assert_eq!(fin.total_cost, dec!(2500));
        assert_eq!(fin.gross_profit, dec!(7500));
        assert_eq!(fin.profit_margin, 75.0);
    }
}
