use crate::{
    auth::CurrentUser,
    dtos::{
        common::{ErrorResponse, MessageResponse},
        room::{RoomDetail, RoomListItem, RoomQueryParams, RoomResponse},
        timetable::entry_responses,
    },
    error::ApiError,
    extract::{Id, Params, Payload},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::{entities::rooms, services::room::{RoomFilter, RoomService}};
use models::forms::{NewRoom, RoomChanges};
use uuid::Uuid;

/// List rooms ordered by name
#[utoipa::path(
    get,
    path = "/rooms",
    params(RoomQueryParams),
    responses(
        (status = 200, description = "Rooms with their timetable entry counts", body = [RoomListItem]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Rooms"
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    _user: CurrentUser,
    Params(params): Params<RoomQueryParams>,
) -> Result<Json<Vec<RoomListItem>>, ApiError> {
    let rooms = RoomService::list(&state.db, &RoomFilter::from(params)).await?;

    Ok(Json(
        rooms
            .into_iter()
            .map(|(room, entries)| RoomListItem {
                room: room.into(),
                timetable_entry_count: entries,
            })
            .collect(),
    ))
}

/// Get a room with its timetable entries
#[utoipa::path(
    get,
    path = "/rooms/{id}",
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room found", body = RoomDetail),
        (status = 404, description = "Room not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Rooms"
)]
pub async fn get_room(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id, _): Id<rooms::Entity>,
) -> Result<Json<RoomDetail>, ApiError> {
    let (room, entries) = RoomService::get(&state.db, id).await?;

    Ok(Json(RoomDetail {
        room: room.into(),
        timetable_entries: entry_responses(entries),
    }))
}

/// Create a room
#[utoipa::path(
    post,
    path = "/rooms",
    request_body = NewRoom,
    responses(
        (status = 201, description = "Room created", body = RoomResponse),
        (status = 400, description = "Invalid or duplicate room", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Rooms"
)]
pub async fn create_room(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(room): Payload<NewRoom>,
) -> Result<(StatusCode, Json<RoomResponse>), ApiError> {
    user.require_admin()?;
    let room = RoomService::create(&state.db, room).await?;

    Ok((StatusCode::CREATED, Json(room.into())))
}

/// Update a room
#[utoipa::path(
    patch,
    path = "/rooms/{id}",
    params(("id" = Uuid, Path, description = "Room ID")),
    request_body = RoomChanges,
    responses(
        (status = 200, description = "Room updated", body = RoomResponse),
        (status = 400, description = "Invalid or duplicate room", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Rooms"
)]
pub async fn update_room(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<rooms::Entity>,
    Payload(changes): Payload<RoomChanges>,
) -> Result<Json<RoomResponse>, ApiError> {
    user.require_admin()?;
    let room = RoomService::update(&state.db, id, changes).await?;

    Ok(Json(room.into()))
}

/// Delete a room that has no timetable entries
#[utoipa::path(
    delete,
    path = "/rooms/{id}",
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room deleted", body = MessageResponse),
        (status = 400, description = "Room is still scheduled", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Rooms"
)]
pub async fn delete_room(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<rooms::Entity>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require_admin()?;
    RoomService::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Room deleted successfully")))
}
