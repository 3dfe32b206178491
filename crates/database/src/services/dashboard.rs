use crate::{
    entities::{classes, rooms, students, subjects, teachers},
    services::class::{ClassService, ClassSummary},
};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait};

/// Number of recently created classes shown on the dashboard
const RECENT_CLASSES: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub rooms: u64,
    pub teachers: u64,
    pub subjects: u64,
    pub classes: u64,
    pub students: u64,
    pub recent_classes: Vec<ClassSummary>,
}

pub struct DashboardService;

impl DashboardService {
    pub async fn stats<C: ConnectionTrait>(db: &C) -> Result<DashboardStats, DbErr> {
        let (rooms, teachers, subjects, classes, students) = futures::try_join!(
            rooms::Entity::find().count(db),
            teachers::Entity::find().count(db),
            subjects::Entity::find().count(db),
            classes::Entity::find().count(db),
            students::Entity::find().count(db),
        )?;
        let recent_classes = ClassService::recent(db, RECENT_CLASSES).await?;

        Ok(DashboardStats {
            rooms,
            teachers,
            subjects,
            classes,
            students,
            recent_classes,
        })
    }
}
