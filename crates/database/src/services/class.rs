use crate::{
    entities::{classes, students, timetable_entries},
    error::{ServiceError, duplicate_or_db, in_use_or_db},
    services::{
        count_by, exists, now,
        timetable::{EntryDetails, EntryFilter, TimetableService},
    },
};
use log::info;
use models::forms::{ClassChanges, NewClass, Validate};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

const IN_USE_STUDENTS: &str = "Cannot delete class with enrolled students";
const IN_USE_ENTRIES: &str = "Cannot delete class with existing timetable entries";
const DUPLICATE_NAME: &str = "A class with this name already exists";

#[derive(Debug, Clone, Default)]
pub struct ClassFilter {
    pub program: Option<String>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
}

/// A class with the number of students enrolled and entries scheduled
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSummary {
    pub class: classes::Model,
    pub students: u64,
    pub entries: u64,
}

pub struct ClassService;

impl ClassService {
    /// Lists classes ordered by program, year and division
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        filter: &ClassFilter,
    ) -> Result<Vec<ClassSummary>, DbErr> {
        let mut condition = Condition::all();
        if let Some(program) = &filter.program {
            condition = condition.add(classes::Column::Program.eq(program.as_str()));
        }
        if let Some(year) = filter.year {
            condition = condition.add(classes::Column::Year.eq(year));
        }
        if let Some(semester) = filter.semester {
            condition = condition.add(classes::Column::Semester.eq(semester));
        }

        let classes = classes::Entity::find()
            .filter(condition)
            .order_by_asc(classes::Column::Program)
            .order_by_asc(classes::Column::Year)
            .order_by_asc(classes::Column::Division)
            .all(db)
            .await?;

        Self::summarize(db, classes).await
    }

    /// The most recently created classes, newest first
    pub async fn recent<C: ConnectionTrait>(db: &C, limit: u64) -> Result<Vec<ClassSummary>, DbErr> {
        let classes = classes::Entity::find()
            .order_by_desc(classes::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await?;

        Self::summarize(db, classes).await
    }

    async fn summarize<C: ConnectionTrait>(
        db: &C,
        classes: Vec<classes::Model>,
    ) -> Result<Vec<ClassSummary>, DbErr> {
        let ids: Vec<Uuid> = classes.iter().map(|class| class.id).collect();
        let students =
            count_by::<_, students::Entity>(db, students::Column::ClassId, &ids).await?;
        let entries =
            count_by::<_, timetable_entries::Entity>(db, timetable_entries::Column::ClassId, &ids)
                .await?;

        Ok(classes
            .into_iter()
            .map(|class| ClassSummary {
                students: students.get(&class.id).copied().unwrap_or(0),
                entries: entries.get(&class.id).copied().unwrap_or(0),
                class,
            })
            .collect())
    }

    /// Gets a class with its students and timetable
    pub async fn get<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<(classes::Model, Vec<students::Model>, Vec<EntryDetails>), ServiceError> {
        let class = Self::find(db, id).await?;
        let students = class
            .find_related(students::Entity)
            .order_by_asc(students::Column::RollNumber)
            .all(db)
            .await?;
        let filter = EntryFilter {
            class_id: Some(id),
            ..Default::default()
        };
        let entries = TimetableService::list(db, &filter).await?;

        Ok((class, students, entries))
    }

    pub async fn create(
        db: &DatabaseConnection,
        class: NewClass,
    ) -> Result<classes::Model, ServiceError> {
        class.validate()?;
        Self::ensure_unique_name(db, &class.name, None).await?;

        let timestamp = now();
        let created = classes::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(class.name),
            program: Set(class.program),
            year: Set(class.year),
            division: Set(class.division),
            semester: Set(class.semester),
            strength: Set(class.strength),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await
        .map_err(|err| duplicate_or_db(err, &[("name", DUPLICATE_NAME)]))?;

        info!("Created class {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: ClassChanges,
    ) -> Result<classes::Model, ServiceError> {
        changes.validate()?;
        let current = Self::find(db, id).await?;

        if let Some(name) = &changes.name
            && *name != current.name
        {
            Self::ensure_unique_name(db, name, Some(id)).await?;
        }

        let mut class: classes::ActiveModel = current.into();
        if let Some(name) = changes.name {
            class.name = Set(name);
        }
        if let Some(program) = changes.program {
            class.program = Set(program);
        }
        if let Some(year) = changes.year {
            class.year = Set(year);
        }
        if let Some(division) = changes.division {
            class.division = Set(division);
        }
        if let Some(semester) = changes.semester {
            class.semester = Set(semester);
        }
        if let Some(strength) = changes.strength {
            class.strength = Set(strength);
        }
        class.updated_at = Set(now());

        class
            .update(db)
            .await
            .map_err(|err| duplicate_or_db(err, &[("name", DUPLICATE_NAME)]))
    }

    /// Deletes a class with neither students nor timetable entries
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let class = Self::find(db, id).await?;

        if Self::has_students(db, id).await? {
            return Err(ServiceError::InUse(IN_USE_STUDENTS));
        }

        if exists::<_, timetable_entries::Entity>(
            db,
            Condition::all().add(timetable_entries::Column::ClassId.eq(id)),
            timetable_entries::Column::Id,
            None,
        )
        .await?
        {
            return Err(ServiceError::InUse(IN_USE_ENTRIES));
        }

        if let Err(err) = class.delete(db).await {
            // A dependent row was added after the checks above
            return Err(match in_use_or_db(err, IN_USE_ENTRIES) {
                ServiceError::InUse(_) if Self::has_students(db, id).await? => {
                    ServiceError::InUse(IN_USE_STUDENTS)
                }
                other => other,
            });
        }

        info!("Deleted class {id}");

        Ok(())
    }

    async fn has_students<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
        exists::<_, students::Entity>(
            db,
            Condition::all().add(students::Column::ClassId.eq(id)),
            students::Column::Id,
            None,
        )
        .await
    }

    pub async fn find<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<classes::Model, ServiceError> {
        classes::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Class"))
    }

    async fn ensure_unique_name<C: ConnectionTrait>(
        db: &C,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        if exists::<_, classes::Entity>(
            db,
            Condition::all().add(classes::Column::Name.eq(name)),
            classes::Column::Id,
            exclude,
        )
        .await?
        {
            return Err(ServiceError::Duplicate(DUPLICATE_NAME));
        }

        Ok(())
    }
}
