//! Appointment notifications.
//!
//! The ledger reports what happened through a [`Notifier`]; delivering it
//! by email or SMS belongs to whichever implementation is installed. A
//! failed delivery is logged and never fails the operation that caused it.

use chrono::NaiveDate;
use thiserror::Error;

use salon_core::time::ClockTime;
use salon_db::db::enums::AppointmentStatus;
use salon_db::model::appointment::Appointment;

use crate::appointment::reminder::ReminderKind;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification transport failed: {0}")]
    Transport(String),
}

/// Something a client or the salon should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    BookingCreated {
        appointment_id: uuid::Uuid,
        client_id: Option<uuid::Uuid>,
        date: NaiveDate,
        start_time: Option<ClockTime>,
    },
    AppointmentCancelled {
        appointment_id: uuid::Uuid,
        client_id: Option<uuid::Uuid>,
        date: NaiveDate,
        start_time: Option<ClockTime>,
    },
    StatusChanged {
        appointment_id: uuid::Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    SlotBlocked {
        appointment_id: uuid::Uuid,
        date: NaiveDate,
        start_time: Option<ClockTime>,
        end_time: Option<ClockTime>,
    },
    Reminder {
        appointment_id: uuid::Uuid,
        client_id: Option<uuid::Uuid>,
        date: NaiveDate,
        start_time: Option<ClockTime>,
        kind: ReminderKind,
    },
}

impl Notification {
    #[must_use]
    pub fn booking_created(appointment: &Appointment) -> Self {
        Self::BookingCreated {
            appointment_id: appointment.id,
            client_id: appointment.client_id,
            date: appointment.appointment_date,
            start_time: appointment.start_time(),
        }
    }

    #[must_use]
    pub fn cancelled(appointment: &Appointment) -> Self {
        Self::AppointmentCancelled {
            appointment_id: appointment.id,
            client_id: appointment.client_id,
            date: appointment.appointment_date,
            start_time: appointment.start_time(),
        }
    }

    #[must_use]
    pub fn slot_blocked(appointment: &Appointment) -> Self {
        Self::SlotBlocked {
            appointment_id: appointment.id,
            date: appointment.appointment_date,
            start_time: appointment.start_time(),
            end_time: appointment.end_time(),
        }
    }

    #[must_use]
    pub fn reminder(appointment: &Appointment, kind: ReminderKind) -> Self {
        Self::Reminder {
            appointment_id: appointment.id,
            client_id: appointment.client_id,
            date: appointment.appointment_date,
            start_time: appointment.start_time(),
            kind,
        }
    }

    /// Stable event name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BookingCreated { .. } => "booking_created",
            Self::AppointmentCancelled { .. } => "appointment_cancelled",
            Self::StatusChanged { .. } => "status_changed",
            Self::SlotBlocked { .. } => "slot_blocked",
            Self::Reminder {
                kind: ReminderKind::DayBefore,
                ..
            } => "reminder",
            Self::Reminder {
                kind: ReminderKind::SameDay,
                ..
            } => "same_day_reminder",
        }
    }

    #[must_use]
    pub const fn appointment_id(&self) -> uuid::Uuid {
        match self {
            Self::BookingCreated { appointment_id, .. }
            | Self::AppointmentCancelled { appointment_id, .. }
            | Self::StatusChanged { appointment_id, .. }
            | Self::SlotBlocked { appointment_id, .. }
            | Self::Reminder { appointment_id, .. } => *appointment_id,
        }
    }
}

pub trait Notifier: Send + Sync {
    /// ## Errors
    /// Returns an error if the notification could not be delivered.
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Records each notification as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            event = notification.kind(),
            appointment_id = %notification.appointment_id(),
            detail = ?notification,
            "Appointment notification"
        );
        Ok(())
    }
}

/// Delivers `notification`, logging instead of propagating a failure.
pub fn dispatch(notifier: &dyn Notifier, notification: &Notification) {
    if let Err(e) = notifier.notify(notification) {
        tracing::warn!(
            error = %e,
            event = notification.kind(),
            appointment_id = %notification.appointment_id(),
            "Failed to deliver notification"
        );
    }
}
