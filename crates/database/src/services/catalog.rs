use crate::entities::{rooms, subjects, teacher_subjects, teachers, time_slots};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Names of the resources an assistant conversation may refer to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceNames {
    pub subjects: Vec<String>,
    pub teachers: Vec<String>,
    pub rooms: Vec<String>,
}

/// The rows a timetable draft is built from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulingData {
    pub subjects: Vec<subjects::Model>,
    /// Each teacher with the codes of the subjects they teach
    pub teachers: Vec<(teachers::Model, Vec<String>)>,
    /// Rooms open for scheduling
    pub rooms: Vec<rooms::Model>,
    pub time_slots: Vec<time_slots::Model>,
}

pub struct CatalogService;

impl CatalogService {
    pub async fn names<C: ConnectionTrait>(db: &C) -> Result<ResourceNames, DbErr> {
        let subjects = subjects::Entity::find()
            .select_only()
            .column(subjects::Column::Name)
            .order_by_asc(subjects::Column::Name)
            .into_tuple::<String>()
            .all(db)
            .await?;
        let teachers = teachers::Entity::find()
            .select_only()
            .column(teachers::Column::Name)
            .order_by_asc(teachers::Column::Name)
            .into_tuple::<String>()
            .all(db)
            .await?;
        let rooms = rooms::Entity::find()
            .select_only()
            .column(rooms::Column::Name)
            .order_by_asc(rooms::Column::Name)
            .into_tuple::<String>()
            .all(db)
            .await?;

        Ok(ResourceNames {
            subjects,
            teachers,
            rooms,
        })
    }

    pub async fn scheduling_data<C: ConnectionTrait>(db: &C) -> Result<SchedulingData, DbErr> {
        let subjects = subjects::Entity::find()
            .order_by_asc(subjects::Column::Code)
            .all(db)
            .await?;
        let teachers = teachers::Entity::find()
            .order_by_asc(teachers::Column::Name)
            .all(db)
            .await?;
        let rooms = rooms::Entity::find()
            .filter(rooms::Column::IsAvailable.eq(true))
            .order_by_asc(rooms::Column::Name)
            .all(db)
            .await?;
        let time_slots = time_slots::Entity::find()
            .order_by_asc(time_slots::Column::Day)
            .order_by_asc(time_slots::Column::Period)
            .all(db)
            .await?;

        let codes: HashMap<Uuid, String> = subjects
            .iter()
            .map(|subject| (subject.id, subject.code.clone()))
            .collect();
        let mut taught: HashMap<Uuid, Vec<String>> = HashMap::new();
        for link in teacher_subjects::Entity::find().all(db).await? {
            if let Some(code) = codes.get(&link.subject_id) {
                taught.entry(link.teacher_id).or_default().push(code.clone());
            }
        }

        let teachers = teachers
            .into_iter()
            .map(|teacher| {
                let mut codes = taught.remove(&teacher.id).unwrap_or_default();
                codes.sort();
                (teacher, codes)
            })
            .collect();

        Ok(SchedulingData {
            subjects,
            teachers,
            rooms,
            time_slots,
        })
    }
}
