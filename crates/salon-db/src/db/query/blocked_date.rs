//! Query composition for `blocked_date`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::blocked_date;
use crate::model::blocked_date::{BlockedDateChanges, BlockedDateRow, NewBlockedDate};

/// ## Summary
/// Lists every active block, specific dates first.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list_active(conn: &mut DbConnection<'_>) -> QueryResult<Vec<BlockedDateRow>> {
    blocked_date::table
        .filter(blocked_date::active.eq(true))
        .order((
            blocked_date::specific_date.asc().nulls_last(),
            blocked_date::day_of_week.asc(),
        ))
        .select(BlockedDateRow::as_select())
        .load(conn)
        .await
}

/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<BlockedDateRow>> {
    blocked_date::table
        .find(id)
        .select(BlockedDateRow::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    block: &NewBlockedDate<'_>,
) -> QueryResult<BlockedDateRow> {
    diesel::insert_into(blocked_date::table)
        .values(block)
        .returning(BlockedDateRow::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns `NotFound` if the id does not exist, or any database error.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    changes: &BlockedDateChanges<'_>,
) -> QueryResult<BlockedDateRow> {
    diesel::update(blocked_date::table.find(id))
        .set((changes, blocked_date::updated_at.eq(diesel::dsl::now)))
        .returning(BlockedDateRow::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<usize> {
    diesel::delete(blocked_date::table.find(id))
        .execute(conn)
        .await
}
