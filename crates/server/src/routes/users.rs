use crate::{
    auth::CurrentUser,
    dtos::{common::ErrorResponse, user::UserResponse},
    error::ApiError,
    extract::Payload,
    state::AppState,
};
use axum::{Json, extract::State};
use database::services::user::UserService;
use models::forms::RoleChange;

/// List users, newest first
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    user.require_admin()?;
    let users = UserService::list(&state.db).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Change another user's role
#[utoipa::path(
    patch,
    path = "/admin/users",
    request_body = RoleChange,
    responses(
        (status = 200, description = "Role changed", body = UserResponse),
        (status = 400, description = "Administrators cannot change their own role", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn change_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(change): Payload<RoleChange>,
) -> Result<Json<UserResponse>, ApiError> {
    user.require_admin()?;
    let updated = UserService::change_role(&state.db, &user.0, change).await?;

    Ok(Json(updated.into()))
}
