//! Administration of blocked dates.

use chrono::NaiveDate;
use serde::Deserialize;

use salon_core::rule::{BlockedDateRule, RuleScope};
use salon_core::time::{ClockTime, TimeWindow};
use salon_db::db::connection::DbConnection;
use salon_db::db::map::rule::{blocked_changes, new_blocked_row};
use salon_db::db::query::blocked_date;

use crate::error::{ServiceError, ServiceResult};

/// Fields an admin submits when creating or editing a blocked date.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInput {
    pub is_recurring: Option<bool>,
    pub recurring_day_of_week: Option<i64>,
    pub date: Option<NaiveDate>,
    pub all_day: Option<bool>,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub reason: Option<String>,
    pub is_active: Option<bool>,
}

fn blocked_range(start: Option<ClockTime>, end: Option<ClockTime>) -> ServiceResult<TimeWindow> {
    match (start, end) {
        (Some(start), Some(end)) => Ok(TimeWindow::new(start, end)?),
        _ => Err(ServiceError::ValidationError(
            "start time and end time are required for non-all-day blocks".into(),
        )),
    }
}

fn reason(value: Option<&str>) -> ServiceResult<String> {
    value
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| ServiceError::ValidationError("reason is required".into()))
}

/// ## Summary
/// Builds a new, active blocked date. Blocks are all-day unless `allDay` is
/// explicitly false.
///
/// ## Errors
/// Returns a validation error for a missing or invalid scope, a partial
/// block without a valid range, or a missing reason.
pub fn build_block(id: uuid::Uuid, input: &BlockInput) -> ServiceResult<BlockedDateRule> {
    let recurring = input.is_recurring.unwrap_or(false);
    let scope = RuleScope::from_parts(recurring, input.recurring_day_of_week, input.date)?;

    let range = if input.all_day.unwrap_or(true) {
        None
    } else {
        Some(blocked_range(input.start_time, input.end_time)?)
    };

    Ok(BlockedDateRule {
        id,
        scope,
        range,
        reason: reason(input.reason.as_deref())?,
        active: true,
    })
}

/// ## Summary
/// Applies the supplied fields of `input` to `block` and revalidates it.
///
/// ## Errors
/// Returns a validation error if the edited block is invalid.
pub fn apply_block_changes(
    mut block: BlockedDateRule,
    input: &BlockInput,
) -> ServiceResult<BlockedDateRule> {
    if input.is_recurring.is_some() || input.recurring_day_of_week.is_some() || input.date.is_some()
    {
        let recurring = input.is_recurring.unwrap_or(block.scope.is_recurring());
        let day_of_week = input
            .recurring_day_of_week
            .or_else(|| block.scope.day_of_week().map(|d| i64::from(d.index())));
        let date = input.date.or_else(|| block.scope.date());
        block.scope = RuleScope::from_parts(recurring, day_of_week, date)?;
    }

    let all_day = input.all_day.unwrap_or(block.is_all_day());
    block.range = if all_day {
        None
    } else {
        let current = block.range;
        Some(blocked_range(
            input.start_time.or_else(|| current.map(|r| r.start())),
            input.end_time.or_else(|| current.map(|r| r.end())),
        )?)
    };

    if input.reason.is_some() {
        block.reason = reason(input.reason.as_deref())?;
    }
    if let Some(active) = input.is_active {
        block.active = active;
    }

    Ok(block)
}

fn not_found(id: uuid::Uuid) -> ServiceError {
    ServiceError::NotFound(format!("blocked date {id}"))
}

/// ## Errors
/// Returns an error if the query fails or a stored row is malformed.
#[tracing::instrument(skip(conn))]
pub async fn list_active(conn: &mut DbConnection<'_>) -> ServiceResult<Vec<BlockedDateRule>> {
    let rows = blocked_date::list_active(conn).await?;
    let blocks = rows
        .into_iter()
        .map(BlockedDateRule::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(blocks)
}

/// ## Errors
/// Returns a validation error for bad input, or any database error.
#[tracing::instrument(skip(conn, input))]
pub async fn create(conn: &mut DbConnection<'_>, input: &BlockInput) -> ServiceResult<BlockedDateRule> {
    let block = build_block(uuid::Uuid::now_v7(), input)?;
    let row = blocked_date::insert(conn, &new_blocked_row(&block)).await?;

    tracing::info!(block_id = %row.id, all_day = row.all_day, "Blocked date created");
    Ok(BlockedDateRule::try_from(row)?)
}

/// ## Errors
/// Returns `NotFound` for an unknown id, a validation error if the edited
/// block is invalid, or any database error.
#[tracing::instrument(skip(conn, input), fields(block_id = %id))]
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    input: &BlockInput,
) -> ServiceResult<BlockedDateRule> {
    let row = blocked_date::get(conn, id).await?.ok_or_else(|| not_found(id))?;
    let block = apply_block_changes(BlockedDateRule::try_from(row)?, input)?;

    let row = blocked_date::update(conn, id, &blocked_changes(&block)).await?;
    Ok(BlockedDateRule::try_from(row)?)
}

/// ## Errors
/// Returns `NotFound` for an unknown id, or any database error.
#[tracing::instrument(skip(conn), fields(block_id = %id))]
pub async fn delete(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> ServiceResult<()> {
    if blocked_date::delete(conn, id).await? == 0 {
        return Err(not_found(id));
    }
    tracing::info!("Blocked date deleted");
    Ok(())
}
