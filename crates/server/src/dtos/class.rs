use chrono::NaiveDateTime;
use database::{
    entities::classes,
    services::class::{ClassFilter, ClassSummary},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{student::StudentResponse, timetable::EntryResponse};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponse {
    pub id: String,
    pub name: String,
    pub program: String,
    pub year: i32,
    pub division: Option<String>,
    pub semester: i32,
    pub strength: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<classes::Model> for ClassResponse {
    fn from(class: classes::Model) -> Self {
        Self {
            id: class.id.to_string(),
            name: class.name,
            program: class.program,
            year: class.year,
            division: class.division,
            semester: class.semester,
            strength: class.strength,
            created_at: class.created_at,
            updated_at: class.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassListItem {
    #[serde(flatten)]
    pub class: ClassResponse,
    pub student_count: u64,
    pub timetable_entry_count: u64,
}

impl From<ClassSummary> for ClassListItem {
    fn from(summary: ClassSummary) -> Self {
        Self {
            class: summary.class.into(),
            student_count: summary.students,
            timetable_entry_count: summary.entries,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassDetail {
    #[serde(flatten)]
    pub class: ClassResponse,
    pub students: Vec<StudentResponse>,
    pub timetable_entries: Vec<EntryResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ClassQueryParams {
    pub program: Option<String>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
}

impl From<ClassQueryParams> for ClassFilter {
    fn from(params: ClassQueryParams) -> Self {
        Self {
            program: params.program,
            year: params.year,
            semester: params.semester,
        }
    }
}
