use chrono::NaiveDateTime;
use database::entities::time_slots;
use models::{clock::format_hour_minute, enums::Day};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::timetable::EntryResponse;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotResponse {
    pub id: String,
    pub day: Day,
    pub period: i32,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<time_slots::Model> for TimeSlotResponse {
    fn from(slot: time_slots::Model) -> Self {
        Self {
            id: slot.id.to_string(),
            day: slot.day,
            period: slot.period,
            start_time: format_hour_minute(slot.start_time),
            end_time: format_hour_minute(slot.end_time),
            created_at: slot.created_at,
            updated_at: slot.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotListItem {
    #[serde(flatten)]
    pub time_slot: TimeSlotResponse,
    pub timetable_entry_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotDetail {
    #[serde(flatten)]
    pub time_slot: TimeSlotResponse,
    pub timetable_entries: Vec<EntryResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TimeSlotQueryParams {
    pub day: Option<Day>,
}
