//! Booking and hard blocks.
//!
//! Both run check-then-insert inside one transaction holding the advisory
//! lock for the appointment date, so two writers for the same day cannot
//! both pass the conflict check.

use chrono::{NaiveDate, NaiveDateTime};
use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use serde::Deserialize;

use salon_core::config::ScheduleConfig;
use salon_core::constants::DEFAULT_BLOCK_NOTE;
use salon_core::time::{ClockTime, Interval, TimeWindow};
use salon_db::db::connection::DbConnection;
use salon_db::db::enums::AppointmentStatus;
use salon_db::db::lock::lock_appointment_date;
use salon_db::db::query::{appointment, catalog, client};
use salon_db::model::appointment::{Appointment, NewAppointment};

use crate::availability::resolver::{DaySnapshot, resolve_slots};
use crate::availability::{blocked, rules};
use crate::error::{ServiceError, ServiceResult};
use crate::notify::{Notification, Notifier, dispatch};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub client_id: uuid::Uuid,
    pub service_id: uuid::Uuid,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    #[serde(default)]
    pub client_notes: Option<String>,
    #[serde(default)]
    pub inspo_photos: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardBlockRequest {
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default)]
    pub reason: Option<String>,
}

/// ## Summary
/// Returns the first held appointment whose occupied interval overlaps
/// `requested`.
#[must_use]
pub fn find_conflict<'a>(held: &'a [Appointment], requested: &Interval) -> Option<&'a Appointment> {
    held.iter()
        .find(|existing| existing.occupied_interval().overlaps(requested))
}

fn conflict_error(existing: &Appointment) -> ServiceError {
    let at = existing
        .start_time()
        .map_or_else(|| "an existing appointment".to_string(), |t| format!("the appointment at {t}"));
    ServiceError::Conflict(format!("time slot already booked, overlaps {at}"))
}

/// ## Summary
/// Rejects a start at or before `now`.
///
/// ## Errors
/// Returns a validation error for a start in the past.
pub fn ensure_upcoming(date: NaiveDate, start: ClockTime, now: NaiveDateTime) -> ServiceResult<()> {
    let today = now.date();
    if date < today || (date == today && start <= ClockTime::from_naive_time(now.time())) {
        return Err(ServiceError::ValidationError(format!(
            "cannot book {date} {start}, it is in the past"
        )));
    }
    Ok(())
}

/// ## Summary
/// Rejects a start that slot resolution would not offer for a
/// `duration_minutes` service on `date`.
///
/// ## Errors
/// Returns a validation error if `start` is outside the day's opening hours,
/// off the slot grid, inside a blackout, or already taken.
pub fn ensure_offered(
    date: NaiveDate,
    start: ClockTime,
    duration_minutes: u16,
    day: DaySnapshot<'_>,
    now: NaiveDateTime,
) -> ServiceResult<()> {
    if resolve_slots(date, duration_minutes, day, now).contains(&start) {
        return Ok(());
    }
    Err(ServiceError::ValidationError(format!(
        "{start} on {date} is not an available slot"
    )))
}

fn minute(time: ClockTime) -> i16 {
    // Clock minutes are below 1440.
    i16::try_from(time.minutes()).unwrap_or(i16::MAX)
}

/// ## Summary
/// Books `request.service_id` for `request.client_id` at the requested start.
///
/// The end time and cost come from the service; the appointment starts out
/// pending.
///
/// ## Side Effects
/// - Inserts an appointment row
/// - Emits [`Notification::BookingCreated`]
///
/// ## Errors
/// - `ValidationError` if the start is in the past, is not an offered slot,
///   or the appointment would run past midnight
/// - `NotFound` if the client or service does not exist
/// - `Conflict` if the interval overlaps a pending or confirmed appointment
///   or a hard block
/// - any database error
#[tracing::instrument(
    skip(conn, schedule, notifier, request),
    fields(date = %request.date, start = %request.start_time, service_id = %request.service_id)
)]
pub async fn book(
    conn: &mut DbConnection<'_>,
    schedule: &ScheduleConfig,
    notifier: &dyn Notifier,
    request: BookingRequest,
) -> ServiceResult<Appointment> {
    let now = schedule.local_now()?;
    ensure_upcoming(request.date, request.start_time, now)?;

    let created = conn
        .transaction::<_, ServiceError, _>(move |tx| {
            async move {
                let service = catalog::get_service(tx, request.service_id)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound("service not found".into()))?;
                let duration = service.duration().ok_or(ServiceError::InvariantViolation(
                    "service has no usable duration",
                ))?;

                client::get_client(tx, request.client_id)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound("client not found".into()))?;

                let end_time = request.start_time.checked_add_minutes(duration).ok_or_else(|| {
                    ServiceError::ValidationError(format!(
                        "a {duration}-minute appointment at {} would run past midnight",
                        request.start_time
                    ))
                })?;

                lock_appointment_date(tx, request.date).await?;

                let held = appointment::occupying_on(tx, request.date).await?;
                let requested = Interval::occupied(request.start_time, duration);
                if let Some(existing) = find_conflict(&held, &requested) {
                    return Err(conflict_error(existing));
                }

                let active_rules = rules::list_active(tx).await?;
                let active_blocks = blocked::list_active(tx).await?;
                let occupied: Vec<Interval> = held.iter().map(Appointment::occupied_interval).collect();
                ensure_offered(
                    request.date,
                    request.start_time,
                    duration,
                    DaySnapshot {
                        rules: &active_rules,
                        blocks: &active_blocks,
                        occupied: &occupied,
                    },
                    now,
                )?;

                let new_appointment = NewAppointment {
                    id: uuid::Uuid::now_v7(),
                    client_id: Some(request.client_id),
                    service_id: Some(request.service_id),
                    appointment_date: request.date,
                    start_minute: minute(request.start_time),
                    end_minute: minute(end_time),
                    duration_minutes: i32::from(duration),
                    status: AppointmentStatus::Pending,
                    total_cost_cents: service.price_cents,
                    is_blocked: false,
                    client_notes: request.client_notes.as_deref(),
                    notes: None,
                    inspo_photos: &request.inspo_photos,
                };

                Ok(appointment::insert(tx, &new_appointment).await?)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(appointment_id = %created.id, "Appointment booked");
    dispatch(notifier, &Notification::booking_created(&created));
    Ok(created)
}

/// ## Summary
/// Holds `[start, end)` on a day with a confirmed pseudo-appointment that has
/// no client or service.
///
/// ## Side Effects
/// - Inserts an appointment row flagged `is_blocked`
/// - Emits [`Notification::SlotBlocked`]
///
/// ## Errors
/// - `ValidationError` if the range is empty or the date is in the past
/// - `Conflict` if the range overlaps a pending or confirmed appointment or
///   another hard block
/// - any database error
#[tracing::instrument(
    skip(conn, schedule, notifier, request),
    fields(date = %request.date, start = %request.start_time, end = %request.end_time)
)]
pub async fn block_slot(
    conn: &mut DbConnection<'_>,
    schedule: &ScheduleConfig,
    notifier: &dyn Notifier,
    request: HardBlockRequest,
) -> ServiceResult<Appointment> {
    let window = TimeWindow::new(request.start_time, request.end_time)?;
    if request.date < schedule.local_today()? {
        return Err(ServiceError::ValidationError(format!(
            "cannot block {}, it is in the past",
            request.date
        )));
    }

    let reason = request
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_BLOCK_NOTE)
        .to_string();

    let created = conn
        .transaction::<_, ServiceError, _>(move |tx| {
            async move {
                lock_appointment_date(tx, request.date).await?;

                let held = appointment::occupying_on(tx, request.date).await?;
                let requested = window.interval();
                if let Some(existing) = find_conflict(&held, &requested) {
                    return Err(conflict_error(existing));
                }

                let new_block = NewAppointment {
                    id: uuid::Uuid::now_v7(),
                    client_id: None,
                    service_id: None,
                    appointment_date: request.date,
                    start_minute: minute(window.start()),
                    end_minute: minute(window.end()),
                    duration_minutes: i32::from(window.end().minutes() - window.start().minutes()),
                    status: AppointmentStatus::Confirmed,
                    total_cost_cents: 0,
                    is_blocked: true,
                    client_notes: None,
                    notes: Some(reason.as_str()),
                    inspo_photos: &[],
                };

                Ok(appointment::insert(tx, &new_block).await?)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(appointment_id = %created.id, "Slot blocked");
    dispatch(notifier, &Notification::slot_blocked(&created));
    Ok(created)
}
