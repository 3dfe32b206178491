use chrono::NaiveDateTime;
use database::{
    entities::{classes, rooms, subjects, teachers},
    services::timetable::{EntryDetails, EntryFilter},
};
use models::enums::{Day, RoomType, SubjectType};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::time_slot::TimeSlotResponse;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassRef {
    pub id: String,
    pub name: String,
}

impl From<classes::Model> for ClassRef {
    fn from(class: classes::Model) -> Self {
        Self {
            id: class.id.to_string(),
            name: class.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRef {
    pub id: String,
    pub code: String,
    pub name: String,
    pub subject_type: SubjectType,
}

impl From<subjects::Model> for SubjectRef {
    fn from(subject: subjects::Model) -> Self {
        Self {
            id: subject.id.to_string(),
            code: subject.code,
            name: subject.name,
            subject_type: subject.subject_type,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherRef {
    pub id: String,
    pub employee_id: String,
    pub name: String,
}

impl From<teachers::Model> for TeacherRef {
    fn from(teacher: teachers::Model) -> Self {
        Self {
            id: teacher.id.to_string(),
            employee_id: teacher.employee_id,
            name: teacher.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomRef {
    pub id: String,
    pub name: String,
    pub room_type: RoomType,
}

impl From<rooms::Model> for RoomRef {
    fn from(room: rooms::Model) -> Self {
        Self {
            id: room.id.to_string(),
            name: room.name,
            room_type: room.room_type,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: String,
    pub class_id: String,
    pub subject_id: String,
    pub teacher_id: String,
    pub room_id: String,
    pub time_slot_id: String,
    pub class: ClassRef,
    pub subject: SubjectRef,
    pub teacher: TeacherRef,
    pub room: RoomRef,
    pub time_slot: TimeSlotResponse,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<EntryDetails> for EntryResponse {
    fn from(details: EntryDetails) -> Self {
        let entry = details.entry;
        Self {
            id: entry.id.to_string(),
            class_id: entry.class_id.to_string(),
            subject_id: entry.subject_id.to_string(),
            teacher_id: entry.teacher_id.to_string(),
            room_id: entry.room_id.to_string(),
            time_slot_id: entry.time_slot_id.to_string(),
            class: details.class.into(),
            subject: details.subject.into(),
            teacher: details.teacher.into(),
            room: details.room.into(),
            time_slot: details.time_slot.into(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Converts entries in order
pub fn entry_responses(entries: Vec<EntryDetails>) -> Vec<EntryResponse> {
    entries.into_iter().map(EntryResponse::from).collect()
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct TimetableQueryParams {
    pub class_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    pub day: Option<Day>,
}

impl From<TimetableQueryParams> for EntryFilter {
    fn from(params: TimetableQueryParams) -> Self {
        Self {
            class_id: params.class_id,
            teacher_id: params.teacher_id,
            room_id: params.room_id,
            day: params.day,
        }
    }
}
