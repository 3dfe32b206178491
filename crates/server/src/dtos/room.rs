use chrono::NaiveDateTime;
use database::{entities::rooms, services::room::RoomFilter};
use models::enums::RoomType;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::timetable::EntryResponse;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub capacity: i32,
    pub room_type: RoomType,
    pub building: Option<String>,
    pub floor: Option<i32>,
    pub is_available: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<rooms::Model> for RoomResponse {
    fn from(room: rooms::Model) -> Self {
        Self {
            id: room.id.to_string(),
            name: room.name,
            capacity: room.capacity,
            room_type: room.room_type,
            building: room.building,
            floor: room.floor,
            is_available: room.is_available,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomListItem {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub timetable_entry_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetail {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub timetable_entries: Vec<EntryResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct RoomQueryParams {
    pub room_type: Option<RoomType>,
    pub is_available: Option<bool>,
    pub building: Option<String>,
}

impl From<RoomQueryParams> for RoomFilter {
    fn from(params: RoomQueryParams) -> Self {
        Self {
            room_type: params.room_type,
            is_available: params.is_available,
            building: params.building,
        }
    }
}
