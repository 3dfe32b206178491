use crate::{
    entities::{time_slots, timetable_entries},
    error::{ServiceError, duplicate_or_db, in_use_or_db},
    services::{
        count_by, exists, now,
        timetable::{EntryDetails, TimetableService},
    },
};
use chrono::NaiveTime;
use log::info;
use models::{
    enums::Day,
    forms::{NewTimeSlot, TimeSlotChanges, Validate, time_range},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

const IN_USE: &str = "Cannot delete time slot with existing timetable entries";
const DUPLICATE_PERIOD: &str = "A time slot for this day and period already exists";
const DUPLICATE_TIMES: &str = "A time slot with these times already exists on this day";
const UNIQUE_COLUMNS: [(&str, &str); 2] = [
    ("period", DUPLICATE_PERIOD),
    ("start", DUPLICATE_TIMES),
];

pub struct TimeSlotService;

impl TimeSlotService {
    /// Lists time slots in weekly order, each with its number of timetable
    /// entries
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        day: Option<Day>,
    ) -> Result<Vec<(time_slots::Model, u64)>, DbErr> {
        let mut query = time_slots::Entity::find()
            .order_by_asc(time_slots::Column::Day)
            .order_by_asc(time_slots::Column::Period);
        if let Some(day) = day {
            query = query.filter(time_slots::Column::Day.eq(day));
        }
        let slots = query.all(db).await?;

        let ids: Vec<Uuid> = slots.iter().map(|slot| slot.id).collect();
        let counts = count_by::<_, timetable_entries::Entity>(
            db,
            timetable_entries::Column::TimeSlotId,
            &ids,
        )
        .await?;

        Ok(slots
            .into_iter()
            .map(|slot| {
                let entries = counts.get(&slot.id).copied().unwrap_or(0);
                (slot, entries)
            })
            .collect())
    }

    /// Every time slot in weekly order
    pub async fn all<C: ConnectionTrait>(db: &C) -> Result<Vec<time_slots::Model>, DbErr> {
        time_slots::Entity::find()
            .order_by_asc(time_slots::Column::Day)
            .order_by_asc(time_slots::Column::Period)
            .all(db)
            .await
    }

    /// Gets a time slot with the entries scheduled in it
    pub async fn get<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<(time_slots::Model, Vec<EntryDetails>), ServiceError> {
        let slot = Self::find(db, id).await?;
        let entries = TimetableService::list_where(
            db,
            Condition::all().add(timetable_entries::Column::TimeSlotId.eq(id)),
        )
        .await?;

        Ok((slot, entries))
    }

    pub async fn create(
        db: &DatabaseConnection,
        slot: NewTimeSlot,
    ) -> Result<time_slots::Model, ServiceError> {
        slot.validate()?;
        let (start, end) = slot.times()?;
        Self::ensure_unique(db, slot.day, slot.period, start, end, None).await?;

        let timestamp = now();
        let created = time_slots::ActiveModel {
            id: Set(Uuid::new_v4()),
            day: Set(slot.day),
            period: Set(slot.period),
            start_time: Set(start),
            end_time: Set(end),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await
        .map_err(|err| duplicate_or_db(err, &UNIQUE_COLUMNS))?;

        info!(
            "Created time slot {} period {} ({})",
            created.day, created.period, created.id
        );
        Ok(created)
    }

    /// Updates a time slot. Ordering and uniqueness are checked against the
    /// stored slot merged with the changes.
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: TimeSlotChanges,
    ) -> Result<time_slots::Model, ServiceError> {
        changes.validate()?;
        let current = Self::find(db, id).await?;

        let day = changes.day.unwrap_or(current.day);
        let period = changes.period.unwrap_or(current.period);
        let start = changes.start()?.unwrap_or(current.start_time);
        let end = changes.end()?.unwrap_or(current.end_time);
        time_range(start, end)?;
        Self::ensure_unique(db, day, period, start, end, Some(id)).await?;

        let mut slot: time_slots::ActiveModel = current.into();
        slot.day = Set(day);
        slot.period = Set(period);
        slot.start_time = Set(start);
        slot.end_time = Set(end);
        slot.updated_at = Set(now());

        slot.update(db)
            .await
            .map_err(|err| duplicate_or_db(err, &UNIQUE_COLUMNS))
    }

    /// Deletes a time slot that has no timetable entries
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let slot = Self::find(db, id).await?;

        if exists::<_, timetable_entries::Entity>(
            db,
            Condition::all().add(timetable_entries::Column::TimeSlotId.eq(id)),
            timetable_entries::Column::Id,
            None,
        )
        .await?
        {
            return Err(ServiceError::InUse(IN_USE));
        }

        slot
            .delete(db)
            .await
            .map_err(|err| in_use_or_db(err, IN_USE))?;
        info!("Deleted time slot {id}");

        Ok(())
    }

    async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<time_slots::Model, ServiceError> {
        time_slots::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Time slot"))
    }

    async fn ensure_unique<C: ConnectionTrait>(
        db: &C,
        day: Day,
        period: i32,
        start: NaiveTime,
        end: NaiveTime,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let same_period = Condition::all()
            .add(time_slots::Column::Day.eq(day))
            .add(time_slots::Column::Period.eq(period));
        if exists::<_, time_slots::Entity>(db, same_period, time_slots::Column::Id, exclude).await? {
            return Err(ServiceError::Duplicate(DUPLICATE_PERIOD));
        }

        let same_times = Condition::all()
            .add(time_slots::Column::Day.eq(day))
            .add(time_slots::Column::StartTime.eq(start))
            .add(time_slots::Column::EndTime.eq(end));
        if exists::<_, time_slots::Entity>(db, same_times, time_slots::Column::Id, exclude).await? {
            return Err(ServiceError::Duplicate(DUPLICATE_TIMES));
        }

        Ok(())
    }
}
