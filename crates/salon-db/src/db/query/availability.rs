//! Query composition for `availability_rule`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::availability_rule;
use crate::model::availability::{AvailabilityRuleChanges, AvailabilityRuleRow, NewAvailabilityRule};

/// ## Summary
/// Lists every active rule, specific dates first (by date) then weekdays.
///
/// Filtering by applicability to a day is left to the caller.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list_active(conn: &mut DbConnection<'_>) -> QueryResult<Vec<AvailabilityRuleRow>> {
    availability_rule::table
        .filter(availability_rule::active.eq(true))
        .order((
            availability_rule::specific_date.asc().nulls_last(),
            availability_rule::day_of_week.asc(),
            availability_rule::start_minute.asc(),
        ))
        .select(AvailabilityRuleRow::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Fetches a rule by id, active or not.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<AvailabilityRuleRow>> {
    availability_rule::table
        .find(id)
        .select(AvailabilityRuleRow::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Finds the recurring rule for a weekday, active or not.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find_recurring(
    conn: &mut DbConnection<'_>,
    day_of_week: i16,
) -> QueryResult<Option<AvailabilityRuleRow>> {
    availability_rule::table
        .filter(availability_rule::day_of_week.eq(day_of_week))
        .order(availability_rule::created_at.asc())
        .select(AvailabilityRuleRow::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Inserts a rule and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    rule: &NewAvailabilityRule<'_>,
) -> QueryResult<AvailabilityRuleRow> {
    diesel::insert_into(availability_rule::table)
        .values(rule)
        .returning(AvailabilityRuleRow::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Overwrites a rule's mutable columns.
///
/// ## Errors
/// Returns `NotFound` if the id does not exist, or any database error.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    changes: &AvailabilityRuleChanges<'_>,
) -> QueryResult<AvailabilityRuleRow> {
    diesel::update(availability_rule::table.find(id))
        .set((changes, availability_rule::updated_at.eq(diesel::dsl::now)))
        .returning(AvailabilityRuleRow::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Deletes a rule outright. Returns the number of rows removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<usize> {
    diesel::delete(availability_rule::table.find(id))
        .execute(conn)
        .await
}
