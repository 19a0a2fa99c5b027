//! Administration of availability rules.

use chrono::NaiveDate;
use serde::Deserialize;

use salon_core::constants::DEFAULT_SLOT_GRANULARITY_MINUTES;
use salon_core::rule::{AvailabilityRule, DayOfWeek, RuleScope, RuleWindow, validate_granularity};
use salon_core::time::{ClockTime, TimeWindow};
use salon_db::db::connection::DbConnection;
use salon_db::db::map::rule::{availability_changes, new_availability_row};
use salon_db::db::query::availability;

use crate::error::{ServiceError, ServiceResult};

/// Fields an admin submits when creating or editing a rule.
///
/// On update every field is optional and only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInput {
    pub is_recurring: Option<bool>,
    pub day_of_week: Option<i64>,
    pub date: Option<NaiveDate>,
    pub all_day: Option<bool>,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub slot_duration: Option<u16>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

/// Body of the legacy "set weekly hours" call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyHoursInput {
    pub day_of_week: i64,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub slot_duration: Option<u16>,
    pub notes: Option<String>,
}

fn explicit_window(start: Option<ClockTime>, end: Option<ClockTime>) -> ServiceResult<TimeWindow> {
    match (start, end) {
        (Some(start), Some(end)) => Ok(TimeWindow::new(start, end)?),
        _ => Err(ServiceError::ValidationError(
            "start time and end time are required for non-all-day availability".into(),
        )),
    }
}

/// ## Summary
/// Builds a new, active rule from admin input.
///
/// A rule is recurring when `isRecurring` says so, or when it names a weekday
/// and no date.
///
/// ## Errors
/// Returns a validation error for a missing or invalid scope, a missing or
/// empty window, or a slot duration outside 15..=120 minutes.
pub fn build_rule(id: uuid::Uuid, input: &RuleInput) -> ServiceResult<AvailabilityRule> {
    let recurring = input
        .is_recurring
        .unwrap_or(input.day_of_week.is_some() && input.date.is_none());
    let scope = RuleScope::from_parts(recurring, input.day_of_week, input.date)?;

    let window = if input.all_day.unwrap_or(false) {
        RuleWindow::AllDay
    } else {
        RuleWindow::Explicit(explicit_window(input.start_time, input.end_time)?)
    };

    let slot_granularity_minutes =
        validate_granularity(input.slot_duration.unwrap_or(DEFAULT_SLOT_GRANULARITY_MINUTES))?;

    Ok(AvailabilityRule {
        id,
        scope,
        window,
        slot_granularity_minutes,
        active: true,
        notes: input.notes.clone(),
    })
}

/// ## Summary
/// Applies the supplied fields of `input` to `rule` and revalidates the result.
///
/// Switching an all-day rule to explicit hours keeps 09:00 and 17:00 for any
/// bound not supplied.
///
/// ## Errors
/// Returns a validation error if the edited rule is invalid.
pub fn apply_rule_changes(
    mut rule: AvailabilityRule,
    input: &RuleInput,
) -> ServiceResult<AvailabilityRule> {
    if input.is_recurring.is_some() || input.day_of_week.is_some() || input.date.is_some() {
        let recurring = input.is_recurring.unwrap_or(rule.scope.is_recurring());
        let day_of_week = input
            .day_of_week
            .or_else(|| rule.scope.day_of_week().map(|d| i64::from(d.index())));
        let date = input.date.or_else(|| rule.scope.date());
        rule.scope = RuleScope::from_parts(recurring, day_of_week, date)?;
    }

    let all_day = input.all_day.unwrap_or(rule.window.is_all_day());
    rule.window = if all_day {
        RuleWindow::AllDay
    } else {
        let bounds = rule.window.bounds();
        RuleWindow::Explicit(explicit_window(
            input.start_time.or(Some(bounds.start())),
            input.end_time.or(Some(bounds.end())),
        )?)
    };

    if let Some(minutes) = input.slot_duration {
        rule.slot_granularity_minutes = validate_granularity(minutes)?;
    }
    if let Some(active) = input.is_active {
        rule.active = active;
    }
    if input.notes.is_some() {
        rule.notes.clone_from(&input.notes);
    }

    Ok(rule)
}

fn weekday(day_of_week: i64) -> ServiceResult<DayOfWeek> {
    u8::try_from(day_of_week)
        .ok()
        .and_then(|index| DayOfWeek::new(index).ok())
        .ok_or_else(|| ServiceError::ValidationError(format!("invalid day of week {day_of_week}")))
}

fn not_found(id: uuid::Uuid) -> ServiceError {
    ServiceError::NotFound(format!("availability rule {id}"))
}

/// ## Summary
/// Lists active rules, date-specific rules first by date, then by weekday.
///
/// ## Errors
/// Returns an error if the query fails or a stored row is malformed.
#[tracing::instrument(skip(conn))]
pub async fn list_active(conn: &mut DbConnection<'_>) -> ServiceResult<Vec<AvailabilityRule>> {
    let rows = availability::list_active(conn).await?;
    let rules = rows
        .into_iter()
        .map(AvailabilityRule::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rules)
}

/// ## Errors
/// Returns a validation error for bad input, or any database error.
#[tracing::instrument(skip(conn, input))]
pub async fn create(conn: &mut DbConnection<'_>, input: &RuleInput) -> ServiceResult<AvailabilityRule> {
    let rule = build_rule(uuid::Uuid::now_v7(), input)?;
    let row = availability::insert(conn, &new_availability_row(&rule)).await?;

    tracing::info!(rule_id = %row.id, "Availability rule created");
    Ok(AvailabilityRule::try_from(row)?)
}

/// ## Summary
/// Edits a rule in place, changing only the supplied fields.
///
/// ## Errors
/// Returns `NotFound` for an unknown id, a validation error if the edited
/// rule is invalid, or any database error.
#[tracing::instrument(skip(conn, input), fields(rule_id = %id))]
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    input: &RuleInput,
) -> ServiceResult<AvailabilityRule> {
    let row = availability::get(conn, id).await?.ok_or_else(|| not_found(id))?;
    let rule = apply_rule_changes(AvailabilityRule::try_from(row)?, input)?;

    let row = availability::update(conn, id, &availability_changes(&rule)).await?;
    Ok(AvailabilityRule::try_from(row)?)
}

/// ## Errors
/// Returns `NotFound` for an unknown id, or any database error.
#[tracing::instrument(skip(conn), fields(rule_id = %id))]
pub async fn delete(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> ServiceResult<()> {
    if availability::delete(conn, id).await? == 0 {
        return Err(not_found(id));
    }
    tracing::info!("Availability rule deleted");
    Ok(())
}

/// ## Summary
/// Upserts the recurring rule for one weekday and re-activates it.
///
/// ## Errors
/// Returns a validation error for an invalid weekday, missing or empty hours,
/// or a bad slot duration, or any database error.
#[tracing::instrument(skip(conn, input), fields(day_of_week = input.day_of_week))]
pub async fn set_weekly_hours(
    conn: &mut DbConnection<'_>,
    input: &WeeklyHoursInput,
) -> ServiceResult<AvailabilityRule> {
    let day = weekday(input.day_of_week)?;
    let window = explicit_window(input.start_time, input.end_time)?;
    let slot_granularity_minutes =
        validate_granularity(input.slot_duration.unwrap_or(DEFAULT_SLOT_GRANULARITY_MINUTES))?;

    let existing = availability::find_recurring(conn, i16::from(day.index())).await?;

    let row = if let Some(row) = existing {
        let mut rule = AvailabilityRule::try_from(row)?;
        rule.window = RuleWindow::Explicit(window);
        rule.slot_granularity_minutes = slot_granularity_minutes;
        rule.notes.clone_from(&input.notes);
        rule.active = true;
        availability::update(conn, rule.id, &availability_changes(&rule)).await?
    } else {
        let rule = AvailabilityRule {
            id: uuid::Uuid::now_v7(),
            scope: RuleScope::Recurring(day),
            window: RuleWindow::Explicit(window),
            slot_granularity_minutes,
            active: true,
            notes: input.notes.clone(),
        };
        availability::insert(conn, &new_availability_row(&rule)).await?
    };

    tracing::info!(weekday = %day, "Weekly hours set");
    Ok(AvailabilityRule::try_from(row)?)
}

/// ## Summary
/// Marks the recurring rule for one weekday inactive.
///
/// ## Errors
/// Returns a validation error for an invalid weekday, `NotFound` if the
/// weekday has no recurring rule, or any database error.
#[tracing::instrument(skip(conn))]
pub async fn deactivate_weekday(
    conn: &mut DbConnection<'_>,
    day_of_week: i64,
) -> ServiceResult<AvailabilityRule> {
    let day = weekday(day_of_week)?;
    let row = availability::find_recurring(conn, i16::from(day.index()))
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("availability for {day}")))?;

    let mut rule = AvailabilityRule::try_from(row)?;
    rule.active = false;

    let row = availability::update(conn, rule.id, &availability_changes(&rule)).await?;
    tracing::info!(weekday = %day, "Weekly hours deactivated");
    Ok(AvailabilityRule::try_from(row)?)
}
