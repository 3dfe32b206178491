use crate::{
    auth::CurrentUser,
    dtos::{
        common::{ErrorResponse, MessageResponse},
        time_slot::{TimeSlotDetail, TimeSlotListItem, TimeSlotQueryParams, TimeSlotResponse},
        timetable::entry_responses,
    },
    error::ApiError,
    extract::{Id, Params, Payload},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::{entities::time_slots, services::time_slot::TimeSlotService};
use models::forms::{NewTimeSlot, TimeSlotChanges};
use uuid::Uuid;

/// List time slots in weekly order
#[utoipa::path(
    get,
    path = "/timeslots",
    params(TimeSlotQueryParams),
    responses(
        (status = 200, description = "Time slots with their timetable entry counts", body = [TimeSlotListItem]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Time slots"
)]
pub async fn list_time_slots(
    State(state): State<AppState>,
    _user: CurrentUser,
    Params(params): Params<TimeSlotQueryParams>,
) -> Result<Json<Vec<TimeSlotListItem>>, ApiError> {
    let slots = TimeSlotService::list(&state.db, params.day).await?;

    Ok(Json(
        slots
            .into_iter()
            .map(|(slot, entries)| TimeSlotListItem {
                time_slot: slot.into(),
                timetable_entry_count: entries,
            })
            .collect(),
    ))
}

/// Get a time slot with the entries scheduled in it
#[utoipa::path(
    get,
    path = "/timeslots/{id}",
    params(("id" = Uuid, Path, description = "Time slot ID")),
    responses(
        (status = 200, description = "Time slot found", body = TimeSlotDetail),
        (status = 404, description = "Time slot not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Time slots"
)]
pub async fn get_time_slot(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id, _): Id<time_slots::Entity>,
) -> Result<Json<TimeSlotDetail>, ApiError> {
    let (slot, entries) = TimeSlotService::get(&state.db, id).await?;

    Ok(Json(TimeSlotDetail {
        time_slot: slot.into(),
        timetable_entries: entry_responses(entries),
    }))
}

/// Create a time slot
#[utoipa::path(
    post,
    path = "/timeslots",
    request_body = NewTimeSlot,
    responses(
        (status = 201, description = "Time slot created", body = TimeSlotResponse),
        (status = 400, description = "Invalid or overlapping time slot", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Time slots"
)]
pub async fn create_time_slot(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(slot): Payload<NewTimeSlot>,
) -> Result<(StatusCode, Json<TimeSlotResponse>), ApiError> {
    user.require_admin()?;
    let slot = TimeSlotService::create(&state.db, slot).await?;

    Ok((StatusCode::CREATED, Json(slot.into())))
}

/// Update a time slot
#[utoipa::path(
    patch,
    path = "/timeslots/{id}",
    params(("id" = Uuid, Path, description = "Time slot ID")),
    request_body = TimeSlotChanges,
    responses(
        (status = 200, description = "Time slot updated", body = TimeSlotResponse),
        (status = 400, description = "Invalid or overlapping time slot", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Time slot not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Time slots"
)]
pub async fn update_time_slot(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<time_slots::Entity>,
    Payload(changes): Payload<TimeSlotChanges>,
) -> Result<Json<TimeSlotResponse>, ApiError> {
    user.require_admin()?;
    let slot = TimeSlotService::update(&state.db, id, changes).await?;

    Ok(Json(slot.into()))
}

/// Delete a time slot with no timetable entries
#[utoipa::path(
    delete,
    path = "/timeslots/{id}",
    params(("id" = Uuid, Path, description = "Time slot ID")),
    responses(
        (status = 200, description = "Time slot deleted", body = MessageResponse),
        (status = 400, description = "Time slot is still in use", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Time slot not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Time slots"
)]
pub async fn delete_time_slot(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<time_slots::Entity>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require_admin()?;
    TimeSlotService::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Time slot deleted successfully")))
}
