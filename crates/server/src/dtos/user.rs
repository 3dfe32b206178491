use chrono::NaiveDateTime;
use database::entities::users;
use models::enums::UserRole;
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    class::ClassResponse, student::StudentResponse, teacher::TeacherResponse,
    time_slot::TimeSlotResponse, timetable::EntryResponse,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: UserRole,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A teacher's week. Everything is empty when the caller has no teacher record.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyScheduleResponse {
    pub teacher: Option<TeacherResponse>,
    pub timetable_entries: Vec<EntryResponse>,
    pub time_slots: Vec<TimeSlotResponse>,
}

/// A student's class timetable. Everything is empty when the caller has no
/// student record.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyTimetableResponse {
    pub student: Option<StudentResponse>,
    pub class: Option<ClassResponse>,
    pub timetable_entries: Vec<EntryResponse>,
    pub time_slots: Vec<TimeSlotResponse>,
}
