mod common;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

use bidtrack_api::{
    entities::bid::BidStatus,
    services::bids::AddLineItemRequest,
    services::reconciliation::UpdateBidOutcomeRequest,
};
use common::{date, decimal_field, response_json, TestApp};

async fn set_status(app: &TestApp, bid_id: Uuid, status: BidStatus, value: Decimal) {
    app.state
        .services
        .reconciliation
        .update_bid_outcome(
            bid_id,
            UpdateBidOutcomeRequest {
                status,
                proposed_value: Some(value),
            },
        )
        .await
        .expect("set status");
}

#[tokio::test]
async fn empty_window_produces_a_zeroed_report() {
    let app = TestApp::new().await;

    let report = app
        .state
        .services
        .reports
        .generate_dashboard(Some(date(2024, 1, 1)), Some(date(2024, 12, 31)))
        .await
        .expect("report");

    assert_eq!(report.total_competed, 0);
    assert_eq!(report.total_won, 0);
    assert_eq!(report.success_rate, 0.0);
    assert_eq!(report.total_revenue, Decimal::ZERO);
    assert_eq!(report.average_win_value, Decimal::ZERO);
    assert!(report.funnel.is_empty());
    assert!(report.monthly_revenue.is_empty());
    assert!(report.top_clients.is_empty());
}

#[tokio::test]
async fn one_win_one_loss_yields_fifty_percent() {
    let app = TestApp::new().await;

    let won = app
        .create_bid("City Library", "020/2024", date(2024, 3, 10), Some(dec!(5000)))
        .await;
    app.state
        .services
        .bids
        .add_line_item(
            won,
            AddLineItemRequest {
                description: "Shelving".to_string(),
                quantity: 1,
                unit_cost: dec!(2000),
            },
        )
        .await
        .expect("add item");
    set_status(&app, won, BidStatus::Won, dec!(5000)).await;

    let lost = app
        .create_bid("Water Board", "021/2024", date(2024, 3, 15), Some(dec!(7000)))
        .await;
    set_status(&app, lost, BidStatus::Lost, dec!(7000)).await;

    let report = app
        .state
        .services
        .reports
        .generate_dashboard(Some(date(2024, 1, 1)), Some(date(2024, 12, 31)))
        .await
        .expect("report");

    assert_eq!(report.total_competed, 2);
    assert_eq!(report.total_won, 1);
    assert_eq!(report.success_rate, 50.0);
    assert_eq!(report.total_revenue, dec!(5000));
    assert_eq!(report.total_gross_profit, dec!(3000));
    assert_eq!(report.average_win_value, dec!(5000));
    assert_eq!(report.funnel.get("won"), Some(&1));
    assert_eq!(report.funnel.get("lost"), Some(&1));

    assert_eq!(report.monthly_revenue.len(), 1);
    assert_eq!(report.monthly_revenue[0].month, "2024-03");
    assert_eq!(report.monthly_revenue[0].revenue, dec!(5000));

    assert_eq!(report.top_clients.len(), 1);
    assert_eq!(report.top_clients[0].client_org, "City Library");
    assert_eq!(report.top_clients[0].wins, 1);
}

#[tokio::test]
async fn monthly_buckets_are_sparse_and_chronological() {
    let app = TestApp::new().await;

    // Wins in January, April, and April again; nothing in between
    for (solicitation, opening, value) in [
        ("030/2024", date(2024, 4, 5), dec!(2000)),
        ("031/2024", date(2024, 1, 20), dec!(1000)),
        ("032/2024", date(2024, 4, 28), dec!(500)),
    ] {
        let id = app
            .create_bid("Parks Department", solicitation, opening, Some(value))
            .await;
        set_status(&app, id, BidStatus::Won, value).await;
    }

    let report = app
        .state
        .services
        .reports
        .generate_dashboard(Some(date(2024, 1, 1)), Some(date(2024, 12, 31)))
        .await
        .expect("report");

    let months: Vec<(&str, Decimal)> = report
        .monthly_revenue
        .iter()
        .map(|b| (b.month.as_str(), b.revenue))
        .collect();
    assert_eq!(months, vec![("2024-01", dec!(1000)), ("2024-04", dec!(2500))]);
}

#[tokio::test]
async fn window_filters_on_opening_date() {
    let app = TestApp::new().await;

    let inside = app
        .create_bid("County Clerk", "040/2024", date(2024, 6, 15), Some(dec!(3000)))
        .await;
    set_status(&app, inside, BidStatus::Won, dec!(3000)).await;

    let outside = app
        .create_bid("County Clerk", "041/2024", date(2024, 9, 1), Some(dec!(9000)))
        .await;
    set_status(&app, outside, BidStatus::Won, dec!(9000)).await;

    let report = app
        .state
        .services
        .reports
        .generate_dashboard(Some(date(2024, 6, 1)), Some(date(2024, 6, 30)))
        .await
        .expect("report");

    assert_eq!(report.total_won, 1);
    assert_eq!(report.total_revenue, dec!(3000));

    // Window endpoints are inclusive
    let edge = app
        .state
        .services
        .reports
        .generate_dashboard(Some(date(2024, 6, 15)), Some(date(2024, 9, 1)))
        .await
        .expect("report");
    assert_eq!(edge.total_won, 2);
}

#[tokio::test]
async fn top_clients_rank_by_wins_and_cap_at_five() {
    let app = TestApp::new().await;

    // Six clients; "Client B" wins twice, everyone else once
    for (client, solicitation) in [
        ("Client A", "050/2024"),
        ("Client B", "051/2024"),
        ("Client B", "052/2024"),
        ("Client C", "053/2024"),
        ("Client D", "054/2024"),
        ("Client E", "055/2024"),
        ("Client F", "056/2024"),
    ] {
        let id = app
            .create_bid(client, solicitation, date(2024, 5, 1), Some(dec!(1000)))
            .await;
        set_status(&app, id, BidStatus::Won, dec!(1000)).await;
    }

    let report = app
        .state
        .services
        .reports
        .generate_dashboard(Some(date(2024, 1, 1)), Some(date(2024, 12, 31)))
        .await
        .expect("report");

    assert_eq!(report.top_clients.len(), 5);
    assert_eq!(report.top_clients[0].client_org, "Client B");
    assert_eq!(report.top_clients[0].wins, 2);
    // Ties keep first-seen order, so the last client falls off the list
    assert!(report
        .top_clients
        .iter()
        .all(|c| c.client_org != "Client F"));
}

#[tokio::test]
async fn dashboard_endpoint_accepts_a_date_window() {
    let app = TestApp::new().await;

    let id = app
        .create_bid("Transit Agency", "060/2024", date(2024, 2, 10), Some(dec!(4000)))
        .await;
    set_status(&app, id, BidStatus::Won, dec!(4000)).await;

    let response = app
        .request_authenticated(
            Method::GET,
            "/api/v1/reports/dashboard?start_date=2024-01-01&end_date=2024-12-31",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["total_won"], json!(1));
    assert_eq!(decimal_field(&body, "total_revenue"), dec!(4000));

    let bad = app
        .request_authenticated(
            Method::GET,
            "/api/v1/reports/dashboard?start_date=02-10-2024",
            None,
        )
        .await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}
