use chrono::NaiveDateTime;
use database::{entities::subjects, services::subject::SubjectFilter};
use models::enums::SubjectType;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{teacher::TeacherResponse, timetable::EntryResponse};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResponse {
    pub id: String,
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub subject_type: SubjectType,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<subjects::Model> for SubjectResponse {
    fn from(subject: subjects::Model) -> Self {
        Self {
            id: subject.id.to_string(),
            code: subject.code,
            name: subject.name,
            credits: subject.credits,
            subject_type: subject.subject_type,
            created_at: subject.created_at,
            updated_at: subject.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectListItem {
    #[serde(flatten)]
    pub subject: SubjectResponse,
    pub timetable_entry_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDetail {
    #[serde(flatten)]
    pub subject: SubjectResponse,
    pub teachers: Vec<TeacherResponse>,
    pub timetable_entries: Vec<EntryResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct SubjectQueryParams {
    pub subject_type: Option<SubjectType>,
    /// Matches anywhere in the code or name
    pub search: Option<String>,
}

impl From<SubjectQueryParams> for SubjectFilter {
    fn from(params: SubjectQueryParams) -> Self {
        Self {
            subject_type: params.subject_type,
            search: params.search,
        }
    }
}
