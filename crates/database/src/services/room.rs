use crate::{
    entities::{rooms, timetable_entries},
    error::{ServiceError, duplicate_or_db, in_use_or_db},
    services::{
        count_by, exists, now,
        timetable::{EntryDetails, EntryFilter, TimetableService},
    },
};
use log::info;
use models::{
    enums::RoomType,
    forms::{NewRoom, RoomChanges, Validate},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

const IN_USE: &str = "Cannot delete room with existing timetable entries";
const DUPLICATE_NAME: &str = "A room with this name already exists";

#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    pub room_type: Option<RoomType>,
    pub is_available: Option<bool>,
    pub building: Option<String>,
}

pub struct RoomService;

impl RoomService {
    /// Lists rooms ordered by name, each with its number of timetable entries
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        filter: &RoomFilter,
    ) -> Result<Vec<(rooms::Model, u64)>, DbErr> {
        let mut condition = Condition::all();
        if let Some(room_type) = filter.room_type {
            condition = condition.add(rooms::Column::RoomType.eq(room_type));
        }
        if let Some(is_available) = filter.is_available {
            condition = condition.add(rooms::Column::IsAvailable.eq(is_available));
        }
        if let Some(building) = &filter.building {
            condition = condition.add(rooms::Column::Building.eq(building.as_str()));
        }

        let rooms = rooms::Entity::find()
            .filter(condition)
            .order_by_asc(rooms::Column::Name)
            .all(db)
            .await?;

        let ids: Vec<Uuid> = rooms.iter().map(|room| room.id).collect();
        let counts =
            count_by::<_, timetable_entries::Entity>(db, timetable_entries::Column::RoomId, &ids)
                .await?;

        Ok(rooms
            .into_iter()
            .map(|room| {
                let entries = counts.get(&room.id).copied().unwrap_or(0);
                (room, entries)
            })
            .collect())
    }

    /// Gets a room with the entries scheduled in it
    pub async fn get<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<(rooms::Model, Vec<EntryDetails>), ServiceError> {
        let room = Self::find(db, id).await?;
        let filter = EntryFilter {
            room_id: Some(id),
            ..Default::default()
        };
        let entries = TimetableService::list(db, &filter).await?;

        Ok((room, entries))
    }

    pub async fn create(db: &DatabaseConnection, room: NewRoom) -> Result<rooms::Model, ServiceError> {
        room.validate()?;
        Self::ensure_unique_name(db, &room.name, None).await?;

        let timestamp = now();
        let created = rooms::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(room.name),
            capacity: Set(room.capacity),
            room_type: Set(room.room_type),
            building: Set(room.building),
            floor: Set(room.floor),
            is_available: Set(room.is_available),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await
        .map_err(|err| duplicate_or_db(err, &[("name", DUPLICATE_NAME)]))?;

        info!("Created room {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: RoomChanges,
    ) -> Result<rooms::Model, ServiceError> {
        changes.validate()?;
        let current = Self::find(db, id).await?;

        if let Some(name) = &changes.name
            && *name != current.name
        {
            Self::ensure_unique_name(db, name, Some(id)).await?;
        }

        let mut room: rooms::ActiveModel = current.into();
        if let Some(name) = changes.name {
            room.name = Set(name);
        }
        if let Some(capacity) = changes.capacity {
            room.capacity = Set(capacity);
        }
        if let Some(room_type) = changes.room_type {
            room.room_type = Set(room_type);
        }
        if let Some(building) = changes.building {
            room.building = Set(building);
        }
        if let Some(floor) = changes.floor {
            room.floor = Set(floor);
        }
        if let Some(is_available) = changes.is_available {
            room.is_available = Set(is_available);
        }
        room.updated_at = Set(now());

        room.update(db)
            .await
            .map_err(|err| duplicate_or_db(err, &[("name", DUPLICATE_NAME)]))
    }

    /// Deletes a room that has no timetable entries
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let room = Self::find(db, id).await?;

        if exists::<_, timetable_entries::Entity>(
            db,
            Condition::all().add(timetable_entries::Column::RoomId.eq(id)),
            timetable_entries::Column::Id,
            None,
        )
        .await?
        {
            return Err(ServiceError::InUse(IN_USE));
        }

        room
            .delete(db)
            .await
            .map_err(|err| in_use_or_db(err, IN_USE))?;
        info!("Deleted room {id}");

        Ok(())
    }

    async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<rooms::Model, ServiceError> {
        rooms::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Room"))
    }

    async fn ensure_unique_name<C: ConnectionTrait>(
        db: &C,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        if exists::<_, rooms::Entity>(
            db,
            Condition::all().add(rooms::Column::Name.eq(name)),
            rooms::Column::Id,
            exclude,
        )
        .await?
        {
            return Err(ServiceError::Duplicate(DUPLICATE_NAME));
        }

        Ok(())
    }
}
