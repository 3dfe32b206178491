use crate::{
    entities::{classes, rooms, subjects, teachers, time_slots, timetable_entries},
    error::{ServiceError, conflict_or_db},
    services::now,
};
use log::info;
use models::{
    availability::check_availability,
    conflict::{Assignment, check_conflicts},
    enums::Day,
    forms::{EntryChanges, NewEntry, Validate},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// A timetable entry together with every row it references
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDetails {
    pub entry: timetable_entries::Model,
    pub class: classes::Model,
    pub subject: subjects::Model,
    pub teacher: teachers::Model,
    pub room: rooms::Model,
    pub time_slot: time_slots::Model,
}

#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub class_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    pub day: Option<Day>,
}

impl EntryFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(class_id) = self.class_id {
            condition = condition.add(timetable_entries::Column::ClassId.eq(class_id));
        }
        if let Some(teacher_id) = self.teacher_id {
            condition = condition.add(timetable_entries::Column::TeacherId.eq(teacher_id));
        }
        if let Some(room_id) = self.room_id {
            condition = condition.add(timetable_entries::Column::RoomId.eq(room_id));
        }
        if let Some(day) = self.day {
            condition = condition.add(time_slots::Column::Day.eq(day));
        }

        condition
    }
}

pub struct TimetableService;

impl TimetableService {
    /// Lists entries matching the filter in weekly order
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        filter: &EntryFilter,
    ) -> Result<Vec<EntryDetails>, DbErr> {
        Self::list_where(db, filter.condition()).await
    }

    /// Lists entries matching an arbitrary condition over entries and their
    /// time slots, ordered by day then period
    pub(crate) async fn list_where<C: ConnectionTrait>(
        db: &C,
        condition: Condition,
    ) -> Result<Vec<EntryDetails>, DbErr> {
        let entries = timetable_entries::Entity::find()
            .inner_join(time_slots::Entity)
            .filter(condition)
            .order_by_asc(time_slots::Column::Day)
            .order_by_asc(time_slots::Column::Period)
            .all(db)
            .await?;

        Self::details(db, entries).await
    }

    /// The most recently created entries, newest first
    pub async fn recent<C: ConnectionTrait>(
        db: &C,
        class_id: Option<Uuid>,
        limit: u64,
    ) -> Result<Vec<EntryDetails>, DbErr> {
        let mut query = timetable_entries::Entity::find()
            .order_by_desc(timetable_entries::Column::CreatedAt)
            .limit(limit);
        if let Some(class_id) = class_id {
            query = query.filter(timetable_entries::Column::ClassId.eq(class_id));
        }

        let entries = query.all(db).await?;
        Self::details(db, entries).await
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<EntryDetails, ServiceError> {
        let entry = timetable_entries::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Timetable entry"))?;

        Self::details(db, vec![entry])
            .await?
            .pop()
            .ok_or(ServiceError::NotFound("Timetable entry"))
    }

    /// Schedules a new entry.
    ///
    /// References are checked for existence, then the teacher and room for
    /// availability, then the slot for conflicts. The write happens in the
    /// same transaction as the checks, and the unique indexes on the table
    /// reject any conflicting row committed concurrently.
    pub async fn create(
        db: &DatabaseConnection,
        entry: NewEntry,
    ) -> Result<EntryDetails, ServiceError> {
        entry.validate()?;
        let assignment = entry.assignment()?;

        let txn = db.begin().await?;

        let (teacher_available, room_available) =
            Self::check_references(&txn, &assignment, None).await?;
        check_availability(teacher_available, room_available)?;
        Self::check_schedule(&txn, &assignment, None).await?;

        let timestamp = now();
        let created = timetable_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            class_id: Set(assignment.class_id),
            subject_id: Set(assignment.subject_id),
            teacher_id: Set(assignment.teacher_id),
            room_id: Set(assignment.room_id),
            time_slot_id: Set(assignment.time_slot_id),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await
        .map_err(conflict_or_db)?;

        txn.commit().await.map_err(conflict_or_db)?;
        info!("Scheduled timetable entry {}", created.id);

        Self::get(db, created.id).await
    }

    /// Moves an entry to new references.
    ///
    /// Only references the update changes are checked for existence and
    /// availability; the conflict check ignores the entry's own row.
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: EntryChanges,
    ) -> Result<EntryDetails, ServiceError> {
        changes.validate()?;

        let txn = db.begin().await?;

        let current = timetable_entries::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("Timetable entry"))?;
        let previous = current.assignment();
        let next = changes.apply(&previous);

        let (teacher_available, room_available) =
            Self::check_references(&txn, &next, Some(&previous)).await?;
        check_availability(teacher_available, room_available)?;
        Self::check_schedule(&txn, &next, Some(id)).await?;

        let mut entry: timetable_entries::ActiveModel = current.into();
        entry.class_id = Set(next.class_id);
        entry.subject_id = Set(next.subject_id);
        entry.teacher_id = Set(next.teacher_id);
        entry.room_id = Set(next.room_id);
        entry.time_slot_id = Set(next.time_slot_id);
        entry.updated_at = Set(now());
        entry.update(&txn).await.map_err(conflict_or_db)?;

        txn.commit().await.map_err(conflict_or_db)?;
        info!("Updated timetable entry {id}");

        Self::get(db, id).await
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let entry = timetable_entries::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Timetable entry"))?;

        entry.delete(db).await?;
        info!("Deleted timetable entry {id}");

        Ok(())
    }

    /// Checks that every reference of `next` that differs from `previous`
    /// exists, in class, subject, teacher, room, time slot order.
    ///
    /// Returns the availability flags of the teacher and room when they were
    /// checked.
    async fn check_references<C: ConnectionTrait>(
        db: &C,
        next: &Assignment,
        previous: Option<&Assignment>,
    ) -> Result<(Option<bool>, Option<bool>), ServiceError> {
        let changed = |pick: fn(&Assignment) -> Uuid| previous.is_none_or(|p| pick(p) != pick(next));

        if changed(|a| a.class_id)
            && classes::Entity::find_by_id(next.class_id)
                .one(db)
                .await?
                .is_none()
        {
            return Err(ServiceError::MissingReference("Class"));
        }

        if changed(|a| a.subject_id)
            && subjects::Entity::find_by_id(next.subject_id)
                .one(db)
                .await?
                .is_none()
        {
            return Err(ServiceError::MissingReference("Subject"));
        }

        let mut teacher_available = None;
        if changed(|a| a.teacher_id) {
            let teacher = teachers::Entity::find_by_id(next.teacher_id)
                .one(db)
                .await?
                .ok_or(ServiceError::MissingReference("Teacher"))?;
            teacher_available = Some(teacher.is_available);
        }

        let mut room_available = None;
        if changed(|a| a.room_id) {
            let room = rooms::Entity::find_by_id(next.room_id)
                .one(db)
                .await?
                .ok_or(ServiceError::MissingReference("Room"))?;
            room_available = Some(room.is_available);
        }

        if changed(|a| a.time_slot_id)
            && time_slots::Entity::find_by_id(next.time_slot_id)
                .one(db)
                .await?
                .is_none()
        {
            return Err(ServiceError::MissingReference("Time slot"));
        }

        Ok((teacher_available, room_available))
    }

    /// Runs the conflict check against every entry at the candidate's slot
    /// that shares its class, teacher or room
    async fn check_schedule<C: ConnectionTrait>(
        db: &C,
        candidate: &Assignment,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let scheduled: Vec<(Uuid, Assignment)> = timetable_entries::Entity::find()
            .filter(timetable_entries::Column::TimeSlotId.eq(candidate.time_slot_id))
            .filter(
                Condition::any()
                    .add(timetable_entries::Column::ClassId.eq(candidate.class_id))
                    .add(timetable_entries::Column::TeacherId.eq(candidate.teacher_id))
                    .add(timetable_entries::Column::RoomId.eq(candidate.room_id)),
            )
            .all(db)
            .await?
            .iter()
            .map(|entry| (entry.id, entry.assignment()))
            .collect();

        check_conflicts(
            candidate,
            exclude,
            scheduled.iter().map(|(id, assignment)| (*id, assignment)),
        )?;

        Ok(())
    }

    /// Attaches the referenced rows to each entry, keeping the input order
    pub(crate) async fn details<C: ConnectionTrait>(
        db: &C,
        entries: Vec<timetable_entries::Model>,
    ) -> Result<Vec<EntryDetails>, DbErr> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let ids = |pick: fn(&timetable_entries::Model) -> Uuid| -> Vec<Uuid> {
            entries
                .iter()
                .map(pick)
                .collect::<HashSet<_>>()
                .into_iter()
                .collect()
        };

        let classes: HashMap<Uuid, classes::Model> = classes::Entity::find()
            .filter(classes::Column::Id.is_in(ids(|e| e.class_id)))
            .all(db)
            .await?
            .into_iter()
            .map(|class| (class.id, class))
            .collect();

        let subjects: HashMap<Uuid, subjects::Model> = subjects::Entity::find()
            .filter(subjects::Column::Id.is_in(ids(|e| e.subject_id)))
            .all(db)
            .await?
            .into_iter()
            .map(|subject| (subject.id, subject))
            .collect();

        let teachers: HashMap<Uuid, teachers::Model> = teachers::Entity::find()
            .filter(teachers::Column::Id.is_in(ids(|e| e.teacher_id)))
            .all(db)
            .await?
            .into_iter()
            .map(|teacher| (teacher.id, teacher))
            .collect();

        let rooms: HashMap<Uuid, rooms::Model> = rooms::Entity::find()
            .filter(rooms::Column::Id.is_in(ids(|e| e.room_id)))
            .all(db)
            .await?
            .into_iter()
            .map(|room| (room.id, room))
            .collect();

        let time_slots: HashMap<Uuid, time_slots::Model> = time_slots::Entity::find()
            .filter(time_slots::Column::Id.is_in(ids(|e| e.time_slot_id)))
            .all(db)
            .await?
            .into_iter()
            .map(|slot| (slot.id, slot))
            .collect();

        // Foreign keys guarantee every reference resolves
        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                Some(EntryDetails {
                    class: classes.get(&entry.class_id)?.clone(),
                    subject: subjects.get(&entry.subject_id)?.clone(),
                    teacher: teachers.get(&entry.teacher_id)?.clone(),
                    room: rooms.get(&entry.room_id)?.clone(),
                    time_slot: time_slots.get(&entry.time_slot_id)?.clone(),
                    entry,
                })
            })
            .collect())
    }
}
