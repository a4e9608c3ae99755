use super::common::{map_service_error, success_response, DateRangeParams};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", get(generate_dashboard))
}

/// Generate the KPI dashboard for a date window. Both bounds are optional;
/// the default window is January 1 of the current year through today.
async fn generate_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateRangeParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (start_date, end_date) = params.to_date_range()?;

    let report = state
        .services
        .reports
        .generate_dashboard(start_date, end_date)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}
