use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use std::collections::HashMap;
use uuid::Uuid;

pub mod catalog;
pub mod class;
pub mod dashboard;
pub mod room;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod time_slot;
pub mod timetable;
pub mod user;

/// Timestamp written to `created_at`/`updated_at`
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Number of rows of `E` per value of `column`, for the given ids only.
/// Ids without rows are absent from the map.
pub(crate) async fn count_by<C, E>(
    db: &C,
    column: E::Column,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, u64>, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, i64)> = E::find()
        .select_only()
        .column(column)
        .column_as(column.count(), "count")
        .filter(column.is_in(ids.iter().copied()))
        .group_by(column)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, count.max(0) as u64))
        .collect())
}

/// Whether any row of `E` matches `condition`, ignoring the row `exclude`
/// when given
pub(crate) async fn exists<C, E>(
    db: &C,
    condition: Condition,
    id_column: E::Column,
    exclude: Option<Uuid>,
) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync,
{
    let mut query = E::find().filter(condition);
    if let Some(id) = exclude {
        query = query.filter(id_column.ne(id));
    }

    Ok(query.count(db).await? > 0)
}
