use crate::{
    entities::{classes, students},
    error::{ServiceError, duplicate_or_db},
    services::{
        exists, now,
        teacher::ensure_user,
        timetable::{EntryDetails, EntryFilter, TimetableService},
    },
};
use log::info;
use models::forms::{NewStudent, StudentChanges, Validate};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;
use uuid::Uuid;

const DUPLICATE_ROLL_NUMBER: &str = "A student with this roll number already exists";
const DUPLICATE_EMAIL: &str = "A student with this email already exists";
const UNIQUE_COLUMNS: [(&str, &str); 2] = [
    ("roll_number", DUPLICATE_ROLL_NUMBER),
    ("email", DUPLICATE_EMAIL),
];

#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub class_id: Option<Uuid>,
    /// Matches anywhere in the roll number, name or email
    pub search: Option<String>,
}

pub struct StudentService;

impl StudentService {
    /// Lists students ordered by class then roll number, each with its class
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        filter: &StudentFilter,
    ) -> Result<Vec<(students::Model, Option<classes::Model>)>, DbErr> {
        let mut condition = Condition::all();
        if let Some(class_id) = filter.class_id {
            condition = condition.add(students::Column::ClassId.eq(class_id));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(students::Column::RollNumber.like(format!("%{search}%")))
                    .add(students::Column::Name.like(format!("%{search}%")))
                    .add(students::Column::Email.like(format!("%{search}%"))),
            );
        }

        let students = students::Entity::find()
            .filter(condition)
            .order_by_asc(students::Column::ClassId)
            .order_by_asc(students::Column::RollNumber)
            .all(db)
            .await?;

        let class_ids: Vec<Uuid> = students.iter().map(|student| student.class_id).collect();
        let classes: HashMap<Uuid, classes::Model> = classes::Entity::find()
            .filter(classes::Column::Id.is_in(class_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|class| (class.id, class))
            .collect();

        Ok(students
            .into_iter()
            .map(|student| {
                let class = classes.get(&student.class_id).cloned();
                (student, class)
            })
            .collect())
    }

    /// Gets a student with their class and its timetable
    pub async fn get<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<(students::Model, Option<classes::Model>, Vec<EntryDetails>), ServiceError> {
        let student = Self::find(db, id).await?;
        let class = student.find_related(classes::Entity).one(db).await?;
        let filter = EntryFilter {
            class_id: Some(student.class_id),
            ..Default::default()
        };
        let entries = TimetableService::list(db, &filter).await?;

        Ok((student, class, entries))
    }

    /// The student profile linked to a user account
    pub async fn find_by_user<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
    ) -> Result<Option<students::Model>, DbErr> {
        students::Entity::find()
            .filter(students::Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    pub async fn create(
        db: &DatabaseConnection,
        student: NewStudent,
    ) -> Result<students::Model, ServiceError> {
        student.validate()?;
        Self::ensure_unique(db, Some(&student.roll_number), Some(&student.email), None).await?;
        ensure_class(db, student.class_id).await?;
        if let Some(user_id) = student.user_id {
            ensure_user(db, user_id).await?;
        }

        let timestamp = now();
        let created = students::ActiveModel {
            id: Set(Uuid::new_v4()),
            roll_number: Set(student.roll_number),
            name: Set(student.name),
            email: Set(student.email),
            phone: Set(student.phone),
            class_id: Set(student.class_id),
            user_id: Set(student.user_id),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await
        .map_err(|err| duplicate_or_db(err, &UNIQUE_COLUMNS))?;

        info!("Created student {} ({})", created.roll_number, created.id);
        Ok(created)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: StudentChanges,
    ) -> Result<students::Model, ServiceError> {
        changes.validate()?;
        let current = Self::find(db, id).await?;

        let roll_number = changes
            .roll_number
            .as_deref()
            .filter(|roll_number| *roll_number != current.roll_number);
        let email = changes
            .email
            .as_deref()
            .filter(|email| *email != current.email);
        Self::ensure_unique(db, roll_number, email, Some(id)).await?;
        if let Some(class_id) = changes.class_id
            && class_id != current.class_id
        {
            ensure_class(db, class_id).await?;
        }
        if let Some(Some(user_id)) = changes.user_id {
            ensure_user(db, user_id).await?;
        }

        let mut student: students::ActiveModel = current.into();
        if let Some(roll_number) = changes.roll_number {
            student.roll_number = Set(roll_number);
        }
        if let Some(name) = changes.name {
            student.name = Set(name);
        }
        if let Some(email) = changes.email {
            student.email = Set(email);
        }
        if let Some(phone) = changes.phone {
            student.phone = Set(phone);
        }
        if let Some(class_id) = changes.class_id {
            student.class_id = Set(class_id);
        }
        if let Some(user_id) = changes.user_id {
            student.user_id = Set(user_id);
        }
        student.updated_at = Set(now());

        student
            .update(db)
            .await
            .map_err(|err| duplicate_or_db(err, &UNIQUE_COLUMNS))
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let student = Self::find(db, id).await?;

        student.delete(db).await?;
        info!("Deleted student {id}");

        Ok(())
    }

    async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<students::Model, ServiceError> {
        students::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Student"))
    }

    async fn ensure_unique<C: ConnectionTrait>(
        db: &C,
        roll_number: Option<&str>,
        email: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        if let Some(roll_number) = roll_number
            && exists::<_, students::Entity>(
                db,
                Condition::all().add(students::Column::RollNumber.eq(roll_number)),
                students::Column::Id,
                exclude,
            )
            .await?
        {
            return Err(ServiceError::Duplicate(DUPLICATE_ROLL_NUMBER));
        }

        if let Some(email) = email
            && exists::<_, students::Entity>(
                db,
                Condition::all().add(students::Column::Email.eq(email)),
                students::Column::Id,
                exclude,
            )
            .await?
        {
            return Err(ServiceError::Duplicate(DUPLICATE_EMAIL));
        }

        Ok(())
    }
}

async fn ensure_class<C: ConnectionTrait>(db: &C, class_id: Uuid) -> Result<(), ServiceError> {
    classes::Entity::find_by_id(class_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or(ServiceError::MissingReference("Class"))
}
