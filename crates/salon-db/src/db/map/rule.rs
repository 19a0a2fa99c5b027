//! Row <-> domain mapping for availability rules and blocked dates.
//!
//! Rows read back from the database are re-validated: a row that violates
//! the domain invariants surfaces as `CoreError::InvariantViolation` rather
//! than a silently wrong schedule.

use chrono::NaiveDate;

use salon_core::error::{CoreError, CoreResult};
use salon_core::rule::{AvailabilityRule, BlockedDateRule, DayOfWeek, RuleScope, RuleWindow};
use salon_core::time::{ClockTime, TimeWindow};

use crate::model::availability::{AvailabilityRuleChanges, AvailabilityRuleRow, NewAvailabilityRule};
use crate::model::blocked_date::{BlockedDateChanges, BlockedDateRow, NewBlockedDate};

fn clock(minute: i16) -> CoreResult<ClockTime> {
    u16::try_from(minute)
        .ok()
        .and_then(ClockTime::from_minutes)
        .ok_or(CoreError::InvariantViolation("stored minute outside the day"))
}

fn scope(day_of_week: Option<i16>, specific_date: Option<NaiveDate>) -> CoreResult<RuleScope> {
    match (day_of_week, specific_date) {
        (Some(day), None) => {
            let day = u8::try_from(day)
                .map_err(|_err| CoreError::InvariantViolation("stored weekday out of range"))?;
            DayOfWeek::new(day)
                .map(RuleScope::Recurring)
                .map_err(|_err| CoreError::InvariantViolation("stored weekday out of range"))
        }
        (None, Some(date)) => Ok(RuleScope::SpecificDate(date)),
        _ => Err(CoreError::InvariantViolation(
            "stored rule must have exactly one of weekday and date",
        )),
    }
}

/// Splits a scope into its `(day_of_week, specific_date)` columns.
#[must_use]
pub fn scope_columns(scope: &RuleScope) -> (Option<i16>, Option<NaiveDate>) {
    match scope {
        RuleScope::Recurring(day) => (Some(i16::from(day.index())), None),
        RuleScope::SpecificDate(date) => (None, Some(*date)),
    }
}

fn minute(time: ClockTime) -> i16 {
    // Clock minutes are below 1440.
    i16::try_from(time.minutes()).unwrap_or(i16::MAX)
}

fn window_columns(window: &RuleWindow) -> (bool, i16, i16) {
    let bounds = window.bounds();
    (
        window.is_all_day(),
        minute(bounds.start()),
        minute(bounds.end()),
    )
}

fn granularity(slot_minutes: u16) -> i16 {
    i16::try_from(slot_minutes).unwrap_or(i16::MAX)
}

impl TryFrom<AvailabilityRuleRow> for AvailabilityRule {
    type Error = CoreError;

    fn try_from(row: AvailabilityRuleRow) -> Result<Self, Self::Error> {
        let window = if row.all_day {
            RuleWindow::AllDay
        } else {
            let window = TimeWindow::new(clock(row.start_minute)?, clock(row.end_minute)?)
                .map_err(|_err| CoreError::InvariantViolation("stored window is empty"))?;
            RuleWindow::Explicit(window)
        };

        Ok(Self {
            id: row.id,
            scope: scope(row.day_of_week, row.specific_date)?,
            window,
            slot_granularity_minutes: u16::try_from(row.slot_minutes)
                .map_err(|_err| CoreError::InvariantViolation("stored slot length negative"))?,
            active: row.active,
            notes: row.notes,
        })
    }
}

impl TryFrom<BlockedDateRow> for BlockedDateRule {
    type Error = CoreError;

    fn try_from(row: BlockedDateRow) -> Result<Self, Self::Error> {
        let range = if row.all_day {
            None
        } else {
            match (row.start_minute, row.end_minute) {
                (Some(start), Some(end)) => Some(
                    TimeWindow::new(clock(start)?, clock(end)?)
                        .map_err(|_err| CoreError::InvariantViolation("stored block range is empty"))?,
                ),
                _ => {
                    return Err(CoreError::InvariantViolation(
                        "partial block stored without a time range",
                    ));
                }
            }
        };

        Ok(Self {
            id: row.id,
            scope: scope(row.day_of_week, row.specific_date)?,
            range,
            reason: row.reason,
            active: row.active,
        })
    }
}

/// Builds the insert row for a validated rule.
#[must_use]
pub fn new_availability_row(rule: &AvailabilityRule) -> NewAvailabilityRule<'_> {
    let (day_of_week, specific_date) = scope_columns(&rule.scope);
    let (all_day, start_minute, end_minute) = window_columns(&rule.window);
    NewAvailabilityRule {
        id: rule.id,
        day_of_week,
        specific_date,
        all_day,
        start_minute,
        end_minute,
        slot_minutes: granularity(rule.slot_granularity_minutes),
        active: rule.active,
        notes: rule.notes.as_deref(),
    }
}

/// Builds the full-column update for a validated rule.
#[must_use]
pub fn availability_changes(rule: &AvailabilityRule) -> AvailabilityRuleChanges<'_> {
    let (day_of_week, specific_date) = scope_columns(&rule.scope);
    let (all_day, start_minute, end_minute) = window_columns(&rule.window);
    AvailabilityRuleChanges {
        day_of_week,
        specific_date,
        all_day,
        start_minute,
        end_minute,
        slot_minutes: granularity(rule.slot_granularity_minutes),
        active: rule.active,
        notes: rule.notes.as_deref(),
    }
}

fn range_columns(range: Option<&TimeWindow>) -> (Option<i16>, Option<i16>) {
    range.map_or((None, None), |r| (Some(minute(r.start())), Some(minute(r.end()))))
}

#[must_use]
pub fn new_blocked_row(block: &BlockedDateRule) -> NewBlockedDate<'_> {
    let (day_of_week, specific_date) = scope_columns(&block.scope);
    let (start_minute, end_minute) = range_columns(block.range.as_ref());
    NewBlockedDate {
        id: block.id,
        day_of_week,
        specific_date,
        all_day: block.is_all_day(),
        start_minute,
        end_minute,
        reason: &block.reason,
        active: block.active,
    }
}

#[must_use]
pub fn blocked_changes(block: &BlockedDateRule) -> BlockedDateChanges<'_> {
    let (day_of_week, specific_date) = scope_columns(&block.scope);
    let (start_minute, end_minute) = range_columns(block.range.as_ref());
    BlockedDateChanges {
        day_of_week,
        specific_date,
        all_day: block.is_all_day(),
        start_minute,
        end_minute,
        reason: &block.reason,
        active: block.active,
    }
}
