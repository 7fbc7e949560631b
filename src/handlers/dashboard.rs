use axum::{extract::State, http::StatusCode, Json};

use crate::handlers::catalog::map_catalog_error;
use crate::models::common::ErrorResponse;
use crate::models::dashboard::DashboardSummary;
use crate::AppState;

/// GET /dashboard/summary
pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, (StatusCode, Json<ErrorResponse>)> {
    let summary = state.dashboard.summary().await.map_err(map_catalog_error)?;
    Ok(Json(summary))
}
