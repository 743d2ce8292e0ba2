use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::services::dashboard::DashboardBoard;
use crate::{errors::ServiceError, ApiResponse, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct DashboardQuery {
    /// Reference date for the board window; defaults to today.
    pub date: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    summary = "Production board",
    description = "Four weeks of weekday columns with unfulfilled orders bucketed by delivery date",
    params(
        ("date" = Option<NaiveDate>, Query, description = "Reference date (default: today)"),
    ),
    responses(
        (status = 200, description = "Board built successfully", body = ApiResponse<DashboardBoard>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<DashboardBoard>>, ServiceError> {
    let board = match query.date {
        Some(date) => state.services.dashboard.board_for(date).await?,
        None => state.services.dashboard.board().await?,
    };
    Ok(Json(ApiResponse::success(board)))
}
