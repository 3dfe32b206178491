use database::services::dashboard::DashboardStats;
use serde::Serialize;
use utoipa::ToSchema;

use super::class::ClassListItem;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub rooms: u64,
    pub teachers: u64,
    pub subjects: u64,
    pub classes: u64,
    pub students: u64,
    pub recent_classes: Vec<ClassListItem>,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            rooms: stats.rooms,
            teachers: stats.teachers,
            subjects: stats.subjects,
            classes: stats.classes,
            students: stats.students,
            recent_classes: stats
                .recent_classes
                .into_iter()
                .map(ClassListItem::from)
                .collect(),
        }
    }
}
