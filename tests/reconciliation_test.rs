mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use bidtrack_api::{
    entities::bid::BidStatus,
    errors::ServiceError,
    services::bids::AddLineItemRequest,
    services::reconciliation::UpdateBidOutcomeRequest,
};
use common::{date, TestApp};

async fn add_item(app: &TestApp, bid_id: Uuid, quantity: i32, unit_cost: Decimal) {
    app.state
        .services
        .bids
        .add_line_item(
            bid_id,
            AddLineItemRequest {
                description: "Materials".to_string(),
                quantity,
                unit_cost,
            },
        )
        .await
        .expect("add line item");
}

async fn ledger_balance(app: &TestApp) -> Decimal {
    app.state
        .services
        .ledger
        .current_balance()
        .await
        .expect("ledger balance")
}

#[tokio::test]
async fn posting_without_line_items_is_rejected() {
    let app = TestApp::new().await;
    let bid_id = app
        .create_bid("Harbor Authority", "004/2025", date(2025, 2, 1), Some(dec!(5000)))
        .await;

    let result = app.state.services.reconciliation.post_bid_cost(bid_id).await;
    assert!(matches!(result, Err(ServiceError::NothingToPost(_))));
    assert_eq!(ledger_balance(&app).await, Decimal::ZERO);
}

#[tokio::test]
async fn posting_an_unknown_bid_is_not_found() {
    let app = TestApp::new().await;
    let result = app
        .state
        .services
        .reconciliation
        .post_bid_cost(Uuid::new_v4())
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn double_posting_the_same_cost_trips_the_guard() {
    let app = TestApp::new().await;
    let bid_id = app
        .create_bid("Harbor Authority", "005/2025", date(2025, 2, 1), Some(dec!(5000)))
        .await;
    add_item(&app, bid_id, 2, dec!(600)).await;

    let first = app
        .state
        .services
        .reconciliation
        .post_bid_cost(bid_id)
        .await
        .expect("first post");
    assert_eq!(first.status, BidStatus::Competing);
    assert_eq!(first.entry.amount, dec!(-1200));

    let second = app.state.services.reconciliation.post_bid_cost(bid_id).await;
    assert!(matches!(second, Err(ServiceError::AlreadyPosted(_))));

    // Exactly one debit on the books
    assert_eq!(ledger_balance(&app).await, dec!(-1200));
}

#[tokio::test]
async fn changed_cost_posts_again_additively() {
    let app = TestApp::new().await;
    let bid_id = app
        .create_bid("Harbor Authority", "006/2025", date(2025, 2, 1), Some(dec!(5000)))
        .await;
    add_item(&app, bid_id, 1, dec!(1000)).await;

    app.state
        .services
        .reconciliation
        .post_bid_cost(bid_id)
        .await
        .expect("first post");

    // Cost grows after the first posting; the amount no longer matches the
    // existing entry, so a second debit lands on top of the first.
    add_item(&app, bid_id, 1, dec!(500)).await;
    let second = app
        .state
        .services
        .reconciliation
        .post_bid_cost(bid_id)
        .await
        .expect("second post");
    assert_eq!(second.entry.amount, dec!(-1500));

    assert_eq!(ledger_balance(&app).await, dec!(-2500));
}

#[tokio::test]
async fn losing_a_bid_reverses_the_first_debit_once() {
    let app = TestApp::new().await;
    let bid_id = app
        .create_bid("Harbor Authority", "007/2025", date(2025, 2, 1), Some(dec!(8000)))
        .await;
    add_item(&app, bid_id, 3, dec!(400)).await;
    app.state
        .services
        .reconciliation
        .post_bid_cost(bid_id)
        .await
        .expect("post cost");

    let lost = app
        .state
        .services
        .reconciliation
        .update_bid_outcome(
            bid_id,
            UpdateBidOutcomeRequest {
                status: BidStatus::Lost,
                proposed_value: Some(dec!(8000)),
            },
        )
        .await
        .expect("mark lost");
    assert_eq!(lost.status, BidStatus::Lost);
    let reversal = lost.reversal.expect("reversal entry");
    assert_eq!(reversal.amount, dec!(1200));
    assert_eq!(ledger_balance(&app).await, Decimal::ZERO);

    // Repeating the loss stays inside the closed-out pair; no second credit
    let again = app
        .state
        .services
        .reconciliation
        .update_bid_outcome(
            bid_id,
            UpdateBidOutcomeRequest {
                status: BidStatus::Lost,
                proposed_value: Some(dec!(8000)),
            },
        )
        .await
        .expect("repeat lost");
    assert!(again.reversal.is_none());

    // Moving between lost and cancelled never re-reverses either
    let cancelled = app
        .state
        .services
        .reconciliation
        .update_bid_outcome(
            bid_id,
            UpdateBidOutcomeRequest {
                status: BidStatus::Cancelled,
                proposed_value: Some(dec!(8000)),
            },
        )
        .await
        .expect("cancel");
    assert!(cancelled.reversal.is_none());
    assert_eq!(ledger_balance(&app).await, Decimal::ZERO);
}

#[tokio::test]
async fn losing_without_a_posted_debit_skips_the_reversal() {
    let app = TestApp::new().await;
    let bid_id = app
        .create_bid("Harbor Authority", "008/2025", date(2025, 2, 1), Some(dec!(8000)))
        .await;

    let lost = app
        .state
        .services
        .reconciliation
        .update_bid_outcome(
            bid_id,
            UpdateBidOutcomeRequest {
                status: BidStatus::Lost,
                proposed_value: Some(dec!(8000)),
            },
        )
        .await
        .expect("mark lost");
    assert_eq!(lost.status, BidStatus::Lost);
    assert!(lost.reversal.is_none());
    assert_eq!(ledger_balance(&app).await, Decimal::ZERO);
}

#[tokio::test]
async fn winning_never_touches_the_ledger() {
    let app = TestApp::new().await;
    let bid_id = app
        .create_bid("Harbor Authority", "009/2025", date(2025, 2, 1), Some(dec!(8000)))
        .await;
    add_item(&app, bid_id, 1, dec!(2000)).await;
    app.state
        .services
        .reconciliation
        .post_bid_cost(bid_id)
        .await
        .expect("post cost");

    let won = app
        .state
        .services
        .reconciliation
        .update_bid_outcome(
            bid_id,
            UpdateBidOutcomeRequest {
                status: BidStatus::Won,
                proposed_value: Some(dec!(8000)),
            },
        )
        .await
        .expect("mark won");
    assert_eq!(won.status, BidStatus::Won);
    assert!(won.reversal.is_none());

    // The debit stays on the books as a real cost of the won bid
    assert_eq!(ledger_balance(&app).await, dec!(-2000));
}

#[tokio::test]
async fn outcome_update_without_value_clears_the_proposed_value() {
    let app = TestApp::new().await;
    let bid_id = app
        .create_bid("Harbor Authority", "010/2025", date(2025, 2, 1), Some(dec!(8000)))
        .await;

    let updated = app
        .state
        .services
        .reconciliation
        .update_bid_outcome(
            bid_id,
            UpdateBidOutcomeRequest {
                status: BidStatus::UnderReview,
                proposed_value: None,
            },
        )
        .await
        .expect("update outcome");
    assert_eq!(updated.proposed_value, None);
}
