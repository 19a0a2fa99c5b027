use chrono::NaiveDate;
use diesel::{pg::Pg, prelude::*};

use salon_core::constants::DEFAULT_APPOINTMENT_MINUTES;
use salon_core::time::{ClockTime, Interval};

use crate::db::{enums::AppointmentStatus, schema};

/// A booked appointment or, with `is_blocked`, a slot held by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::appointment)]
#[diesel(check_for_backend(Pg))]
pub struct Appointment {
    pub id: uuid::Uuid,
    pub client_id: Option<uuid::Uuid>,
    pub service_id: Option<uuid::Uuid>,
    pub appointment_date: NaiveDate,
    pub start_minute: i16,
    pub end_minute: i16,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub total_cost_cents: i64,
    pub is_blocked: bool,
    pub client_notes: Option<String>,
    pub notes: Option<String>,
    pub inspo_photos: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    /// Set once the day-before reminder has gone out.
    pub reminder_sent: bool,
    /// Set once the morning-of reminder has gone out.
    pub same_day_reminder_sent: bool,
}

impl Appointment {
    #[must_use]
    pub fn start_time(&self) -> Option<ClockTime> {
        u16::try_from(self.start_minute)
            .ok()
            .and_then(ClockTime::from_minutes)
    }

    #[must_use]
    pub fn end_time(&self) -> Option<ClockTime> {
        u16::try_from(self.end_minute)
            .ok()
            .and_then(ClockTime::from_minutes)
    }

    /// ## Summary
    /// The time this appointment holds on its day.
    ///
    /// Hard blocks hold `[start, end)`. Bookings hold their persisted
    /// duration from the start, or the default when none was recorded.
    #[must_use]
    pub fn occupied_interval(&self) -> Interval {
        let start = u32::try_from(self.start_minute).unwrap_or(0);

        let minutes = if self.is_blocked {
            u32::try_from(self.end_minute)
                .ok()
                .and_then(|end| end.checked_sub(start))
                .filter(|m| *m > 0)
        } else {
            u32::try_from(self.duration_minutes).ok().filter(|m| *m > 0)
        }
        .unwrap_or(u32::from(DEFAULT_APPOINTMENT_MINUTES));

        Interval {
            start,
            end: start + minutes,
        }
    }
}

/// Insert struct for bookings and hard blocks
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::appointment)]
pub struct NewAppointment<'a> {
    pub id: uuid::Uuid,
    pub client_id: Option<uuid::Uuid>,
    pub service_id: Option<uuid::Uuid>,
    pub appointment_date: NaiveDate,
    pub start_minute: i16,
    pub end_minute: i16,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub total_cost_cents: i64,
    pub is_blocked: bool,
    pub client_notes: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub inspo_photos: &'a [String],
}
