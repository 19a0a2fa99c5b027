//! Month-level availability for the booking calendar.
//!
//! This is a cheap capacity estimate, not slot resolution: a day counts as
//! available while its non-cancelled appointments number fewer than the
//! slots its rules generate. A listed day may still have no slot long enough
//! for a particular service; resolving the day itself gives the exact answer.

use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use serde::Serialize;

use salon_core::config::ScheduleConfig;
use salon_core::rule::{AvailabilityRule, BlockedDateRule};
use salon_db::db::connection::DbConnection;
use salon_db::db::query::appointment;

use crate::availability::{blocked, rules};
use crate::error::{ServiceError, ServiceResult};

/// One listed day of the booking calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub available: bool,
    /// Estimated open slots: capacity minus non-cancelled appointments.
    pub slot_count: usize,
}

/// ## Summary
/// First and last calendar day of `month` in `year`.
///
/// ## Errors
/// Returns a validation error unless `month` is `1..=12` and the year is
/// representable.
pub fn month_bounds(year: i32, month: u32) -> ServiceResult<(NaiveDate, NaiveDate)> {
    let invalid = || ServiceError::ValidationError(format!("invalid month {year}-{month:02}"));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;
    Ok((first, last))
}

/// Sum of every applicable rule's candidate slots on `date`.
#[must_use]
pub fn day_capacity(rules: &[AvailabilityRule], date: NaiveDate) -> usize {
    rules
        .iter()
        .filter(|rule| rule.applies_to_date(date))
        .map(|rule| rule.candidate_slots().len())
        .sum()
}

/// ## Summary
/// Lists the available days in `[first, last]`, skipping days before `today`.
///
/// Days without an applicable rule, days under an all-day blackout, and days
/// whose bookings have reached capacity are omitted rather than listed as
/// unavailable. `bookings` maps a day to its non-cancelled appointment count.
#[must_use]
pub fn scan_month(
    first: NaiveDate,
    last: NaiveDate,
    today: NaiveDate,
    rules: &[AvailabilityRule],
    blocks: &[BlockedDateRule],
    bookings: &HashMap<NaiveDate, i64>,
) -> Vec<DayAvailability> {
    first
        .iter_days()
        .take_while(|date| *date <= last)
        .filter(|date| *date >= today)
        .filter_map(|date| {
            if !rules.iter().any(|rule| rule.applies_to_date(date)) {
                return None;
            }
            if blocks.iter().any(|block| block.applies(date, None)) {
                return None;
            }

            let capacity = day_capacity(rules, date);
            let booked = bookings
                .get(&date)
                .map_or(0, |count| usize::try_from(*count).unwrap_or(0));

            (booked < capacity).then(|| DayAvailability {
                date,
                available: true,
                slot_count: capacity - booked,
            })
        })
        .collect()
}

/// ## Summary
/// Lists the bookable days of a month from today onward.
///
/// Rules, blackouts and per-day appointment counts are each loaded with a
/// single query before the days are walked in memory.
///
/// ## Errors
/// Returns a validation error for an invalid month, or an error if a query
/// fails, a stored rule is malformed, or the configured timezone is invalid.
#[tracing::instrument(skip(conn, schedule))]
pub async fn available_dates(
    conn: &mut DbConnection<'_>,
    schedule: &ScheduleConfig,
    year: i32,
    month: u32,
) -> ServiceResult<Vec<DayAvailability>> {
    let (first, last) = month_bounds(year, month)?;
    let today = schedule.local_today()?;
    if last < today {
        return Ok(Vec::new());
    }

    let rules = rules::list_active(conn).await?;
    let blocks = blocked::list_active(conn).await?;
    let bookings: HashMap<NaiveDate, i64> = appointment::count_by_date(conn, first.max(today), last)
        .await?
        .into_iter()
        .collect();

    let days = scan_month(first, last, today, &rules, &blocks, &bookings);
    tracing::debug!(available_days = days.len(), "Scanned month");
    Ok(days)
}
