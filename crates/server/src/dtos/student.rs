use chrono::NaiveDateTime;
use database::{entities::students, services::student::StudentFilter};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{class::ClassResponse, timetable::EntryResponse};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: String,
    pub roll_number: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub class_id: String,
    pub user_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<students::Model> for StudentResponse {
    fn from(student: students::Model) -> Self {
        Self {
            id: student.id.to_string(),
            roll_number: student.roll_number,
            name: student.name,
            email: student.email,
            phone: student.phone,
            class_id: student.class_id.to_string(),
            user_id: student.user_id.map(|id| id.to_string()),
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentListItem {
    #[serde(flatten)]
    pub student: StudentResponse,
    pub class: Option<ClassResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetail {
    #[serde(flatten)]
    pub student: StudentResponse,
    pub class: Option<ClassResponse>,
    pub timetable_entries: Vec<EntryResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct StudentQueryParams {
    pub class_id: Option<Uuid>,
    /// Matches anywhere in the roll number, name or email
    pub search: Option<String>,
}

impl From<StudentQueryParams> for StudentFilter {
    fn from(params: StudentQueryParams) -> Self {
        Self {
            class_id: params.class_id,
            search: params.search,
        }
    }
}
