use crate::{
    entities::{subjects, teacher_subjects, teachers, timetable_entries},
    error::{ServiceError, duplicate_or_db, in_use_or_db},
    services::{
        count_by, exists, now,
        timetable::{EntryDetails, TimetableService},
    },
};
use log::info;
use models::{
    enums::SubjectType,
    forms::{NewSubject, SubjectChanges, Validate},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use std::collections::HashSet;
use uuid::Uuid;

const IN_USE: &str = "Cannot delete subject with existing timetable entries";
const DUPLICATE_CODE: &str = "A subject with this code already exists";

#[derive(Debug, Clone, Default)]
pub struct SubjectFilter {
    pub subject_type: Option<SubjectType>,
    /// Matches anywhere in the code or name
    pub search: Option<String>,
}

pub struct SubjectService;

impl SubjectService {
    /// Lists subjects ordered by code, each with its number of timetable entries
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        filter: &SubjectFilter,
    ) -> Result<Vec<(subjects::Model, u64)>, DbErr> {
        let mut condition = Condition::all();
        if let Some(subject_type) = filter.subject_type {
            condition = condition.add(subjects::Column::SubjectType.eq(subject_type));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(subjects::Column::Code.like(format!("%{search}%")))
                    .add(subjects::Column::Name.like(format!("%{search}%"))),
            );
        }

        let subjects = subjects::Entity::find()
            .filter(condition)
            .order_by_asc(subjects::Column::Code)
            .all(db)
            .await?;

        let ids: Vec<Uuid> = subjects.iter().map(|subject| subject.id).collect();
        let counts = count_by::<_, timetable_entries::Entity>(
            db,
            timetable_entries::Column::SubjectId,
            &ids,
        )
        .await?;

        Ok(subjects
            .into_iter()
            .map(|subject| {
                let entries = counts.get(&subject.id).copied().unwrap_or(0);
                (subject, entries)
            })
            .collect())
    }

    /// Gets a subject with the teachers able to teach it and its entries
    pub async fn get<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<(subjects::Model, Vec<teachers::Model>, Vec<EntryDetails>), ServiceError> {
        let subject = Self::find(db, id).await?;
        let teachers = subject
            .find_related(teachers::Entity)
            .order_by_asc(teachers::Column::Name)
            .all(db)
            .await?;
        let entries = TimetableService::list_where(
            db,
            Condition::all().add(timetable_entries::Column::SubjectId.eq(id)),
        )
        .await?;

        Ok((subject, teachers, entries))
    }

    pub async fn create(
        db: &DatabaseConnection,
        subject: NewSubject,
    ) -> Result<subjects::Model, ServiceError> {
        subject.validate()?;
        Self::ensure_unique_code(db, &subject.code, None).await?;

        let timestamp = now();
        let created = subjects::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(subject.code),
            name: Set(subject.name),
            credits: Set(subject.credits),
            subject_type: Set(subject.subject_type),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await
        .map_err(|err| duplicate_or_db(err, &[("code", DUPLICATE_CODE)]))?;

        info!("Created subject {} ({})", created.code, created.id);
        Ok(created)
    }

    /// Updates a subject, replacing its teachers when `teacherIds` is given
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: SubjectChanges,
    ) -> Result<subjects::Model, ServiceError> {
        changes.validate()?;

        let txn = db.begin().await?;
        let current = Self::find(&txn, id).await?;

        if let Some(code) = &changes.code
            && *code != current.code
        {
            Self::ensure_unique_code(&txn, code, Some(id)).await?;
        }

        let mut subject: subjects::ActiveModel = current.into();
        if let Some(code) = changes.code {
            subject.code = Set(code);
        }
        if let Some(name) = changes.name {
            subject.name = Set(name);
        }
        if let Some(credits) = changes.credits {
            subject.credits = Set(credits);
        }
        if let Some(subject_type) = changes.subject_type {
            subject.subject_type = Set(subject_type);
        }
        subject.updated_at = Set(now());

        let updated = subject
            .update(&txn)
            .await
            .map_err(|err| duplicate_or_db(err, &[("code", DUPLICATE_CODE)]))?;

        if let Some(teacher_ids) = changes.teacher_ids {
            Self::replace_teachers(&txn, id, teacher_ids).await?;
        }

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a subject that has no timetable entries
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let subject = Self::find(db, id).await?;

        if exists::<_, timetable_entries::Entity>(
            db,
            Condition::all().add(timetable_entries::Column::SubjectId.eq(id)),
            timetable_entries::Column::Id,
            None,
        )
        .await?
        {
            return Err(ServiceError::InUse(IN_USE));
        }

        // Teacher links cascade
        subject
            .delete(db)
            .await
            .map_err(|err| in_use_or_db(err, IN_USE))?;
        info!("Deleted subject {id}");

        Ok(())
    }

    async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<subjects::Model, ServiceError> {
        subjects::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Subject"))
    }

    async fn ensure_unique_code<C: ConnectionTrait>(
        db: &C,
        code: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        if exists::<_, subjects::Entity>(
            db,
            Condition::all().add(subjects::Column::Code.eq(code)),
            subjects::Column::Id,
            exclude,
        )
        .await?
        {
            return Err(ServiceError::Duplicate(DUPLICATE_CODE));
        }

        Ok(())
    }

    async fn replace_teachers<C: ConnectionTrait>(
        db: &C,
        subject_id: Uuid,
        teacher_ids: Vec<Uuid>,
    ) -> Result<(), ServiceError> {
        let teacher_ids: Vec<Uuid> = teacher_ids
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let found = teachers::Entity::find()
            .filter(teachers::Column::Id.is_in(teacher_ids.clone()))
            .count(db)
            .await?;
        if found != teacher_ids.len() as u64 {
            return Err(ServiceError::MissingReference("Teacher"));
        }

        teacher_subjects::Entity::delete_many()
            .filter(teacher_subjects::Column::SubjectId.eq(subject_id))
            .exec(db)
            .await?;

        if teacher_ids.is_empty() {
            return Ok(());
        }

        let timestamp = now();
        let links = teacher_ids
            .into_iter()
            .map(|teacher_id| teacher_subjects::ActiveModel {
                id: Set(Uuid::new_v4()),
                teacher_id: Set(teacher_id),
                subject_id: Set(subject_id),
                created_at: Set(timestamp),
            });
        teacher_subjects::Entity::insert_many(links).exec(db).await?;

        Ok(())
    }
}
