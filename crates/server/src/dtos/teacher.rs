use chrono::NaiveDateTime;
use database::{entities::teachers, services::teacher::TeacherFilter};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{subject::SubjectResponse, timetable::EntryResponse};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherResponse {
    pub id: String,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub is_available: bool,
    pub user_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<teachers::Model> for TeacherResponse {
    fn from(teacher: teachers::Model) -> Self {
        Self {
            id: teacher.id.to_string(),
            employee_id: teacher.employee_id,
            name: teacher.name,
            email: teacher.email,
            phone: teacher.phone,
            department: teacher.department,
            designation: teacher.designation,
            is_available: teacher.is_available,
            user_id: teacher.user_id.map(|id| id.to_string()),
            created_at: teacher.created_at,
            updated_at: teacher.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherListItem {
    #[serde(flatten)]
    pub teacher: TeacherResponse,
    pub timetable_entry_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDetail {
    #[serde(flatten)]
    pub teacher: TeacherResponse,
    pub subjects: Vec<SubjectResponse>,
    pub timetable_entries: Vec<EntryResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct TeacherQueryParams {
    pub department: Option<String>,
    pub is_available: Option<bool>,
}

impl From<TeacherQueryParams> for TeacherFilter {
    fn from(params: TeacherQueryParams) -> Self {
        Self {
            department: params.department,
            is_available: params.is_available,
        }
    }
}
