//! JSON shapes returned by the API.
//!
//! Domain and row types stay free of wire concerns; these views fix the
//! camelCase field names clients depend on.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use salon_core::rule::{AvailabilityRule, BlockedDateRule};
use salon_core::time::ClockTime;
use salon_db::db::enums::AppointmentStatus;
use salon_db::db::query::appointment::AppointmentDetail;
use salon_db::model::appointment::Appointment;
use salon_db::model::catalog::SalonService;
use salon_db::model::client::Client;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleView {
    pub id: uuid::Uuid,
    pub is_recurring: bool,
    pub day_of_week: Option<u8>,
    pub date: Option<NaiveDate>,
    pub all_day: bool,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub slot_duration: u16,
    pub is_active: bool,
    pub notes: Option<String>,
}

impl From<AvailabilityRule> for RuleView {
    fn from(rule: AvailabilityRule) -> Self {
        let window = rule.window.bounds();
        Self {
            id: rule.id,
            is_recurring: rule.scope.is_recurring(),
            day_of_week: rule.scope.day_of_week().map(|d| d.index()),
            date: rule.scope.date(),
            all_day: rule.window.is_all_day(),
            start_time: window.start(),
            end_time: window.end(),
            slot_duration: rule.slot_granularity_minutes,
            is_active: rule.active,
            notes: rule.notes,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockView {
    pub id: uuid::Uuid,
    pub is_recurring: bool,
    pub recurring_day_of_week: Option<u8>,
    pub date: Option<NaiveDate>,
    pub all_day: bool,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub reason: String,
    pub is_active: bool,
}

impl From<BlockedDateRule> for BlockView {
    fn from(block: BlockedDateRule) -> Self {
        Self {
            id: block.id,
            is_recurring: block.scope.is_recurring(),
            recurring_day_of_week: block.scope.day_of_week().map(|d| d.index()),
            date: block.scope.date(),
            all_day: block.is_all_day(),
            start_time: block.range.map(|r| r.start()),
            end_time: block.range.map(|r| r.end()),
            reason: block.reason,
            is_active: block.active,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<Client> for ClientView {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            email: client.email,
            phone: client.phone,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceView {
    pub id: uuid::Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
}

impl From<SalonService> for ServiceView {
    fn from(service: SalonService) -> Self {
        Self {
            id: service.id,
            name: service.name,
            duration_minutes: service.duration_minutes,
            price_cents: service.price_cents,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    pub id: uuid::Uuid,
    pub client_id: Option<uuid::Uuid>,
    pub service_id: Option<uuid::Uuid>,
    pub date: NaiveDate,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub total_cost_cents: i64,
    pub is_blocked: bool,
    pub client_notes: Option<String>,
    pub notes: Option<String>,
    pub inspo_photos: Vec<String>,
    pub reminder_sent: bool,
    pub same_day_reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceView>,
}

impl From<Appointment> for AppointmentView {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            client_id: appointment.client_id,
            service_id: appointment.service_id,
            date: appointment.appointment_date,
            start_time: appointment.start_time(),
            end_time: appointment.end_time(),
            duration_minutes: appointment.duration_minutes,
            status: appointment.status,
            total_cost_cents: appointment.total_cost_cents,
            is_blocked: appointment.is_blocked,
            client_notes: appointment.client_notes,
            notes: appointment.notes,
            inspo_photos: appointment.inspo_photos,
            reminder_sent: appointment.reminder_sent,
            same_day_reminder_sent: appointment.same_day_reminder_sent,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
            client: None,
            service: None,
        }
    }
}

impl From<AppointmentDetail> for AppointmentView {
    fn from((appointment, client, service): AppointmentDetail) -> Self {
        Self {
            client: client.map(ClientView::from),
            service: service.map(ServiceView::from),
            ..Self::from(appointment)
        }
    }
}

/// Body of delete endpoints.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub message: String,
}

impl MessageView {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
