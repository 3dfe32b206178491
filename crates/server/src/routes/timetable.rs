use crate::{
    auth::CurrentUser,
    dtos::{
        common::{ErrorResponse, MessageResponse},
        timetable::{EntryResponse, TimetableQueryParams, entry_responses},
    },
    error::ApiError,
    extract::{Id, Params, Payload},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::{entities::timetable_entries, services::timetable::{EntryFilter, TimetableService}};
use models::forms::{EntryChanges, NewEntry};
use uuid::Uuid;

/// List timetable entries in weekly order
#[utoipa::path(
    get,
    path = "/timetable",
    params(TimetableQueryParams),
    responses(
        (status = 200, description = "Matching entries", body = [EntryResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Timetable"
)]
pub async fn list_entries(
    State(state): State<AppState>,
    _user: CurrentUser,
    Params(params): Params<TimetableQueryParams>,
) -> Result<Json<Vec<EntryResponse>>, ApiError> {
    let entries = TimetableService::list(&state.db, &EntryFilter::from(params)).await?;

    Ok(Json(entry_responses(entries)))
}

/// Get a timetable entry
#[utoipa::path(
    get,
    path = "/timetable/{id}",
    params(("id" = Uuid, Path, description = "Timetable entry ID")),
    responses(
        (status = 200, description = "Entry found", body = EntryResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Timetable"
)]
pub async fn get_entry(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id, _): Id<timetable_entries::Entity>,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = TimetableService::get(&state.db, id).await?;

    Ok(Json(entry.into()))
}

/// Schedule a lesson
#[utoipa::path(
    post,
    path = "/timetable",
    request_body = NewEntry,
    responses(
        (status = 201, description = "Entry created", body = EntryResponse),
        (status = 400, description = "Missing field, unknown reference or unavailable teacher or room", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 409, description = "Class, teacher or room is already booked in this time slot", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Timetable"
)]
pub async fn create_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(entry): Payload<NewEntry>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    user.require_admin()?;
    let entry = TimetableService::create(&state.db, entry).await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// Move or reassign a scheduled lesson
#[utoipa::path(
    patch,
    path = "/timetable/{id}",
    params(("id" = Uuid, Path, description = "Timetable entry ID")),
    request_body = EntryChanges,
    responses(
        (status = 200, description = "Entry updated", body = EntryResponse),
        (status = 400, description = "Unknown reference or unavailable teacher or room", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 409, description = "Class, teacher or room is already booked in this time slot", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Timetable"
)]
pub async fn update_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<timetable_entries::Entity>,
    Payload(changes): Payload<EntryChanges>,
) -> Result<Json<EntryResponse>, ApiError> {
    user.require_admin()?;
    let entry = TimetableService::update(&state.db, id, changes).await?;

    Ok(Json(entry.into()))
}

/// Remove a lesson from the timetable
#[utoipa::path(
    delete,
    path = "/timetable/{id}",
    params(("id" = Uuid, Path, description = "Timetable entry ID")),
    responses(
        (status = 200, description = "Entry deleted", body = MessageResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Timetable"
)]
pub async fn delete_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<timetable_entries::Entity>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require_admin()?;
    TimetableService::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Timetable entry deleted successfully")))
}
