//! Appointment reminders.
//!
//! A sweep claims the reminder flag for one day's bookings and reports each
//! claimed appointment through the [`Notifier`]. Once claimed, an appointment
//! is never reminded again for that kind, even if delivery failed.

use std::fmt;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use salon_core::config::ScheduleConfig;
use salon_core::error::CoreError;
use salon_db::db::connection::DbConnection;
use salon_db::db::query::appointment;

use crate::error::{ServiceError, ServiceResult};
use crate::notify::{Notification, Notifier, dispatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    /// Tomorrow's bookings, sent once a day.
    DayBefore,
    /// Today's bookings, sent on the morning of.
    SameDay,
}

impl ReminderKind {
    pub const ALL: [Self; 2] = [Self::DayBefore, Self::SameDay];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DayBefore => "day_before",
            Self::SameDay => "same_day",
        }
    }

    /// The day whose bookings a sweep running on `today` covers.
    #[must_use]
    pub fn target_date(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::DayBefore => today.checked_add_days(Days::new(1)),
            Self::SameDay => Some(today),
        }
    }

    /// Local hour at which this sweep runs.
    #[must_use]
    pub const fn hour(self, schedule: &ScheduleConfig) -> u8 {
        match self {
            Self::DayBefore => schedule.reminder_hour,
            Self::SameDay => schedule.same_day_reminder_hour,
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ## Summary
/// The first local time strictly after `now` that falls on `hour:00`.
///
/// ## Errors
/// Returns a configuration error if `hour` is not in `0..=23`.
pub fn next_run(now: NaiveDateTime, hour: u8) -> ServiceResult<NaiveDateTime> {
    let at = NaiveTime::from_hms_opt(u32::from(hour), 0, 0).ok_or_else(|| {
        CoreError::ConfigError(format!("reminder hour {hour} is not between 0 and 23"))
    })?;

    let today = now.date().and_time(at);
    if today > now {
        return Ok(today);
    }

    now.date()
        .succ_opt()
        .map(|tomorrow| tomorrow.and_time(at))
        .ok_or(ServiceError::InvariantViolation("no day after the current one"))
}

/// ## Summary
/// How long to wait, from the salon's current wall clock, before the next
/// `kind` sweep.
///
/// ## Errors
/// Returns an error for an invalid timezone or reminder hour.
pub fn time_until_next_run(
    schedule: &ScheduleConfig,
    kind: ReminderKind,
) -> ServiceResult<std::time::Duration> {
    let now = schedule.local_now()?;
    let next = next_run(now, kind.hour(schedule))?;
    (next - now)
        .to_std()
        .map_err(|_err| ServiceError::InvariantViolation("next reminder run is in the past"))
}

/// ## Summary
/// Runs one `kind` sweep for the salon's current day.
///
/// Returns how many appointments were reminded.
///
/// ## Errors
/// Returns an error for an invalid timezone, or any database error.
pub async fn send_reminders(
    conn: &mut DbConnection<'_>,
    schedule: &ScheduleConfig,
    notifier: &dyn Notifier,
    kind: ReminderKind,
) -> ServiceResult<usize> {
    let today = schedule.local_today()?;
    send_reminders_on(conn, notifier, kind, today).await
}

/// ## Summary
/// Runs one `kind` sweep as if the salon's current day were `today`.
///
/// ## Side Effects
/// - Sets the kind's reminder flag on every claimed appointment
/// - Emits [`Notification::Reminder`] per claimed appointment
///
/// ## Errors
/// Returns an error if the claim query fails.
#[tracing::instrument(skip(conn, notifier), fields(kind = %kind))]
pub async fn send_reminders_on(
    conn: &mut DbConnection<'_>,
    notifier: &dyn Notifier,
    kind: ReminderKind,
    today: NaiveDate,
) -> ServiceResult<usize> {
    let date = kind
        .target_date(today)
        .ok_or(ServiceError::InvariantViolation("no day after the current one"))?;

    let claimed = match kind {
        ReminderKind::DayBefore => appointment::claim_day_before_reminders(conn, date).await?,
        ReminderKind::SameDay => appointment::claim_same_day_reminders(conn, date).await?,
    };

    for reminded in &claimed {
        dispatch(notifier, &Notification::reminder(reminded, kind));
    }

    tracing::info!(%date, reminded = claimed.len(), "Reminder sweep finished");
    Ok(claimed.len())
}
