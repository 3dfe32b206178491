use crate::{
    entities::{subjects, teacher_subjects, teachers, timetable_entries, users},
    error::{ServiceError, duplicate_or_db, in_use_or_db},
    services::{
        count_by, exists, now,
        timetable::{EntryDetails, EntryFilter, TimetableService},
    },
};
use log::info;
use models::forms::{NewTeacher, TeacherChanges, Validate};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use std::collections::HashSet;
use uuid::Uuid;

const IN_USE: &str = "Cannot delete teacher with existing timetable entries";
const DUPLICATE_EMPLOYEE_ID: &str = "A teacher with this employee ID already exists";
const DUPLICATE_EMAIL: &str = "A teacher with this email already exists";
const UNIQUE_COLUMNS: [(&str, &str); 2] = [
    ("employee_id", DUPLICATE_EMPLOYEE_ID),
    ("email", DUPLICATE_EMAIL),
];

#[derive(Debug, Clone, Default)]
pub struct TeacherFilter {
    pub department: Option<String>,
    pub is_available: Option<bool>,
}

pub struct TeacherService;

impl TeacherService {
    /// Lists teachers ordered by name, each with its number of timetable entries
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        filter: &TeacherFilter,
    ) -> Result<Vec<(teachers::Model, u64)>, DbErr> {
        let mut condition = Condition::all();
        if let Some(department) = &filter.department {
            condition = condition.add(teachers::Column::Department.eq(department.as_str()));
        }
        if let Some(is_available) = filter.is_available {
            condition = condition.add(teachers::Column::IsAvailable.eq(is_available));
        }

        let teachers = teachers::Entity::find()
            .filter(condition)
            .order_by_asc(teachers::Column::Name)
            .all(db)
            .await?;

        let ids: Vec<Uuid> = teachers.iter().map(|teacher| teacher.id).collect();
        let counts = count_by::<_, timetable_entries::Entity>(
            db,
            timetable_entries::Column::TeacherId,
            &ids,
        )
        .await?;

        Ok(teachers
            .into_iter()
            .map(|teacher| {
                let entries = counts.get(&teacher.id).copied().unwrap_or(0);
                (teacher, entries)
            })
            .collect())
    }

    /// Gets a teacher with the subjects they teach and their entries
    pub async fn get<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<(teachers::Model, Vec<subjects::Model>, Vec<EntryDetails>), ServiceError> {
        let teacher = Self::find(db, id).await?;
        let subjects = teacher
            .find_related(subjects::Entity)
            .order_by_asc(subjects::Column::Code)
            .all(db)
            .await?;
        let filter = EntryFilter {
            teacher_id: Some(id),
            ..Default::default()
        };
        let entries = TimetableService::list(db, &filter).await?;

        Ok((teacher, subjects, entries))
    }

    /// The teacher profile linked to a user account
    pub async fn find_by_user<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
    ) -> Result<Option<teachers::Model>, DbErr> {
        teachers::Entity::find()
            .filter(teachers::Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    pub async fn create(
        db: &DatabaseConnection,
        teacher: NewTeacher,
    ) -> Result<teachers::Model, ServiceError> {
        teacher.validate()?;
        Self::ensure_unique(db, Some(&teacher.employee_id), Some(&teacher.email), None).await?;
        if let Some(user_id) = teacher.user_id {
            ensure_user(db, user_id).await?;
        }

        let timestamp = now();
        let created = teachers::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(teacher.employee_id),
            name: Set(teacher.name),
            email: Set(teacher.email),
            phone: Set(teacher.phone),
            department: Set(teacher.department),
            designation: Set(teacher.designation),
            is_available: Set(teacher.is_available),
            user_id: Set(teacher.user_id),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await
        .map_err(|err| duplicate_or_db(err, &UNIQUE_COLUMNS))?;

        info!("Created teacher {} ({})", created.employee_id, created.id);
        Ok(created)
    }

    /// Updates a teacher, replacing their subjects when `subjectIds` is given
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: TeacherChanges,
    ) -> Result<teachers::Model, ServiceError> {
        changes.validate()?;

        let txn = db.begin().await?;
        let current = Self::find(&txn, id).await?;

        let employee_id = changes
            .employee_id
            .as_deref()
            .filter(|employee_id| *employee_id != current.employee_id);
        let email = changes
            .email
            .as_deref()
            .filter(|email| *email != current.email);
        Self::ensure_unique(&txn, employee_id, email, Some(id)).await?;
        if let Some(Some(user_id)) = changes.user_id {
            ensure_user(&txn, user_id).await?;
        }

        let mut teacher: teachers::ActiveModel = current.into();
        if let Some(employee_id) = changes.employee_id {
            teacher.employee_id = Set(employee_id);
        }
        if let Some(name) = changes.name {
            teacher.name = Set(name);
        }
        if let Some(email) = changes.email {
            teacher.email = Set(email);
        }
        if let Some(phone) = changes.phone {
            teacher.phone = Set(phone);
        }
        if let Some(department) = changes.department {
            teacher.department = Set(department);
        }
        if let Some(designation) = changes.designation {
            teacher.designation = Set(designation);
        }
        if let Some(is_available) = changes.is_available {
            teacher.is_available = Set(is_available);
        }
        if let Some(user_id) = changes.user_id {
            teacher.user_id = Set(user_id);
        }
        teacher.updated_at = Set(now());

        let updated = teacher
            .update(&txn)
            .await
            .map_err(|err| duplicate_or_db(err, &UNIQUE_COLUMNS))?;

        if let Some(subject_ids) = changes.subject_ids {
            Self::replace_subjects(&txn, id, subject_ids).await?;
        }

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a teacher who has no timetable entries
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let teacher = Self::find(db, id).await?;

        if exists::<_, timetable_entries::Entity>(
            db,
            Condition::all().add(timetable_entries::Column::TeacherId.eq(id)),
            timetable_entries::Column::Id,
            None,
        )
        .await?
        {
            return Err(ServiceError::InUse(IN_USE));
        }

        teacher
            .delete(db)
            .await
            .map_err(|err| in_use_or_db(err, IN_USE))?;
        info!("Deleted teacher {id}");

        Ok(())
    }

    async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<teachers::Model, ServiceError> {
        teachers::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Teacher"))
    }

    async fn ensure_unique<C: ConnectionTrait>(
        db: &C,
        employee_id: Option<&str>,
        email: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        if let Some(employee_id) = employee_id
            && exists::<_, teachers::Entity>(
                db,
                Condition::all().add(teachers::Column::EmployeeId.eq(employee_id)),
                teachers::Column::Id,
                exclude,
            )
            .await?
        {
            return Err(ServiceError::Duplicate(DUPLICATE_EMPLOYEE_ID));
        }

        if let Some(email) = email
            && exists::<_, teachers::Entity>(
                db,
                Condition::all().add(teachers::Column::Email.eq(email)),
                teachers::Column::Id,
                exclude,
            )
            .await?
        {
            return Err(ServiceError::Duplicate(DUPLICATE_EMAIL));
        }

        Ok(())
    }

    async fn replace_subjects<C: ConnectionTrait>(
        db: &C,
        teacher_id: Uuid,
        subject_ids: Vec<Uuid>,
    ) -> Result<(), ServiceError> {
        let subject_ids: Vec<Uuid> = subject_ids
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let found = subjects::Entity::find()
            .filter(subjects::Column::Id.is_in(subject_ids.clone()))
            .count(db)
            .await?;
        if found != subject_ids.len() as u64 {
            return Err(ServiceError::MissingReference("Subject"));
        }

        teacher_subjects::Entity::delete_many()
            .filter(teacher_subjects::Column::TeacherId.eq(teacher_id))
            .exec(db)
            .await?;

        if subject_ids.is_empty() {
            return Ok(());
        }

        let timestamp = now();
        let links = subject_ids
            .into_iter()
            .map(|subject_id| teacher_subjects::ActiveModel {
                id: Set(Uuid::new_v4()),
                teacher_id: Set(teacher_id),
                subject_id: Set(subject_id),
                created_at: Set(timestamp),
            });
        teacher_subjects::Entity::insert_many(links).exec(db).await?;

        Ok(())
    }
}

/// Checks that a user account referenced by a profile exists
pub(crate) async fn ensure_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<(), ServiceError> {
    users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or(ServiceError::MissingReference("User"))
}
