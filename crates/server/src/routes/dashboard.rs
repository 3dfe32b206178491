use crate::{
    auth::CurrentUser,
    dtos::{common::ErrorResponse, dashboard::DashboardResponse},
    error::ApiError,
    state::AppState,
};
use axum::{Json, extract::State};
use database::services::dashboard::DashboardService;

/// Resource counts and the most recently created classes
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Dashboard"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let stats = DashboardService::stats(&state.db).await?;

    Ok(Json(stats.into()))
}
