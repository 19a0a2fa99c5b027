//! Bookable slot resolution for a single calendar day.
//!
//! [`resolve_slots`] is pure: it works on a snapshot of the day's rules,
//! blackouts and occupied intervals, so the same inputs always give the same
//! slots. [`available_slots`] loads that snapshot from the database.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};

use salon_core::config::ScheduleConfig;
use salon_core::rule::{AvailabilityRule, BlockedDateRule};
use salon_core::time::{ClockTime, Interval};
use salon_db::db::connection::DbConnection;
use salon_db::db::query::{appointment, catalog};
use salon_db::model::appointment::Appointment;

use crate::availability::{blocked, rules};
use crate::error::ServiceResult;

/// Everything that constrains one day's slots.
#[derive(Debug, Clone, Copy)]
pub struct DaySnapshot<'a> {
    /// Active availability rules; applicability to the day is checked here.
    pub rules: &'a [AvailabilityRule],
    /// Active blackouts; applicability to the day is checked here.
    pub blocks: &'a [BlockedDateRule],
    /// Time already held on the day by pending or confirmed appointments.
    pub occupied: &'a [Interval],
}

/// ## Summary
/// Computes the bookable start times on `date` for a service of
/// `duration_minutes`, ascending and without duplicates.
///
/// A slot survives when its prospective interval `[s, s + duration)`:
/// - overlaps no occupied interval,
/// - overlaps no partial blackout applying to the day,
/// - lies inside the window of at least one applicable rule,
/// - and, when `date` is the day of `now`, starts strictly after `now`.
///
/// A day without applicable rules, or with an all-day blackout, has no
/// slots. So does any day before `now`.
#[must_use]
pub fn resolve_slots(
    date: NaiveDate,
    duration_minutes: u16,
    day: DaySnapshot<'_>,
    now: NaiveDateTime,
) -> Vec<ClockTime> {
    let today = now.date();
    if date < today {
        return Vec::new();
    }

    let applicable: Vec<&AvailabilityRule> = day
        .rules
        .iter()
        .filter(|rule| rule.applies_to_date(date))
        .collect();
    if applicable.is_empty() {
        return Vec::new();
    }

    if day.blocks.iter().any(|block| block.applies(date, None)) {
        return Vec::new();
    }

    let candidates: BTreeSet<ClockTime> = applicable
        .iter()
        .flat_map(|rule| rule.candidate_slots())
        .collect();

    let windows: Vec<Interval> = applicable
        .iter()
        .map(|rule| rule.window.bounds().interval())
        .collect();

    let blocked_ranges: Vec<Interval> = day
        .blocks
        .iter()
        .filter(|block| block.active && block.scope.matches(date))
        .filter_map(|block| block.range.map(|range| range.interval()))
        .collect();

    let cutoff = (date == today).then(|| ClockTime::from_naive_time(now.time()));

    candidates
        .into_iter()
        .filter(|slot| {
            let prospective = Interval::occupied(*slot, duration_minutes);

            !day.occupied.iter().any(|held| held.overlaps(&prospective))
                && !blocked_ranges.iter().any(|range| range.overlaps(&prospective))
                && windows.iter().any(|window| window.contains(&prospective))
                && cutoff.is_none_or(|now| *slot > now)
        })
        .collect()
}

/// The service length slots were resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDuration {
    pub minutes: u16,
    /// True when no usable service duration was found and the configured
    /// default was used instead.
    pub fallback: bool,
}

/// Bookable slots for a day plus the duration they were resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotResolution {
    pub slots: Vec<ClockTime>,
    pub duration: SlotDuration,
}

/// ## Summary
/// Looks up the duration of `service_id`, falling back to `default_minutes`
/// when no service is given, it does not exist, or its duration is unusable.
///
/// The fallback is reported in the result and logged at `warn`.
///
/// ## Errors
/// Returns an error if the lookup query fails.
#[tracing::instrument(skip(conn))]
pub async fn service_duration(
    conn: &mut DbConnection<'_>,
    service_id: Option<uuid::Uuid>,
    default_minutes: u16,
) -> ServiceResult<SlotDuration> {
    let found = match service_id {
        Some(id) => catalog::get_service(conn, id)
            .await?
            .and_then(|service| service.duration()),
        None => None,
    };

    Ok(found.map_or_else(
        || {
            tracing::warn!(
                default_minutes,
                "No usable service duration, resolving against the default"
            );
            SlotDuration {
                minutes: default_minutes,
                fallback: true,
            }
        },
        |minutes| SlotDuration {
            minutes,
            fallback: false,
        },
    ))
}

/// ## Errors
/// Returns an error if the query fails.
pub async fn occupied_intervals(
    conn: &mut DbConnection<'_>,
    date: NaiveDate,
) -> ServiceResult<Vec<Interval>> {
    let held = appointment::occupying_on(conn, date).await?;
    Ok(held.iter().map(Appointment::occupied_interval).collect())
}

/// ## Summary
/// Resolves the bookable slots on `date` for `service_id`.
///
/// Rules are loaded first so that a day without availability costs a single
/// query.
///
/// ## Errors
/// Returns an error if a query fails, a stored rule is malformed, or the
/// configured timezone is invalid.
#[tracing::instrument(skip(conn, schedule))]
pub async fn available_slots(
    conn: &mut DbConnection<'_>,
    schedule: &ScheduleConfig,
    date: NaiveDate,
    service_id: Option<uuid::Uuid>,
) -> ServiceResult<SlotResolution> {
    let duration = service_duration(conn, service_id, schedule.default_service_minutes).await?;

    let rules = rules::list_active(conn).await?;
    if !rules.iter().any(|rule| rule.applies_to_date(date)) {
        tracing::debug!("No availability defined for date");
        return Ok(SlotResolution {
            slots: Vec::new(),
            duration,
        });
    }

    let blocks = blocked::list_active(conn).await?;
    let occupied = occupied_intervals(conn, date).await?;
    let now = schedule.local_now()?;

    let slots = resolve_slots(
        date,
        duration.minutes,
        DaySnapshot {
            rules: &rules,
            blocks: &blocks,
            occupied: &occupied,
        },
        now,
    );

    tracing::debug!(slot_count = slots.len(), "Resolved slots");
    Ok(SlotResolution { slots, duration })
}
