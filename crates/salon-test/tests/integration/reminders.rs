//! Reminder sweeps claim each booking once per reminder kind.

use std::sync::Mutex;

use chrono::{Days, NaiveDate};

use salon_test::component::appointment::reminder::{ReminderKind, send_reminders_on};
use salon_test::component::db::enums::AppointmentStatus;
use salon_test::component::db::query::appointment;
use salon_test::component::model::appointment::NewAppointment;
use salon_test::component::notify::{Notification, Notifier, NotifyError};

use super::helpers::*;

/// Keeps every notification it is handed.
#[derive(Default)]
struct Recorder(Mutex<Vec<Notification>>);

impl Notifier for Recorder {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.0.lock().expect("recorder lock").push(notification.clone());
        Ok(())
    }
}

impl Recorder {
    fn reminded(&self) -> Vec<uuid::Uuid> {
        self.0
            .lock()
            .expect("recorder lock")
            .iter()
            .filter(|n| matches!(n, Notification::Reminder { .. }))
            .map(Notification::appointment_id)
            .collect()
    }
}

async fn seed_appointment(
    db: &TestDb,
    client_id: uuid::Uuid,
    service_id: uuid::Uuid,
    date: NaiveDate,
    status: AppointmentStatus,
) -> uuid::Uuid {
    let mut conn = db.get_conn().await.expect("connection");
    appointment::insert(
        &mut conn,
        &NewAppointment {
            id: uuid::Uuid::now_v7(),
            client_id: Some(client_id),
            service_id: Some(service_id),
            appointment_date: date,
            start_minute: 600,
            end_minute: 630,
            duration_minutes: 30,
            status,
            total_cost_cents: 2500,
            is_blocked: false,
            client_notes: None,
            notes: None,
            inspo_photos: &[],
        },
    )
    .await
    .expect("insert appointment")
    .id
}

#[test_log::test(tokio::test)]
async fn day_before_reminder_is_sent_exactly_once() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");

    let today = upcoming_monday();
    let tomorrow = today + Days::new(1);
    let pending = seed_appointment(&db, ana, trim, tomorrow, AppointmentStatus::Pending).await;
    let confirmed = seed_appointment(&db, ana, trim, tomorrow, AppointmentStatus::Confirmed).await;
    seed_appointment(&db, ana, trim, tomorrow, AppointmentStatus::Cancelled).await;
    seed_appointment(&db, ana, trim, today, AppointmentStatus::Pending).await;

    let recorder = Recorder::default();
    let mut conn = db.get_conn().await.expect("connection");

    let sent = send_reminders_on(&mut conn, &recorder, ReminderKind::DayBefore, today)
        .await
        .expect("first sweep");
    assert_eq!(sent, 2);

    let mut reminded = recorder.reminded();
    reminded.sort();
    let mut expected = vec![pending, confirmed];
    expected.sort();
    assert_eq!(reminded, expected);

    let sent = send_reminders_on(&mut conn, &recorder, ReminderKind::DayBefore, today)
        .await
        .expect("second sweep");
    assert_eq!(sent, 0);
    assert_eq!(recorder.reminded().len(), 2);
}

#[test_log::test(tokio::test)]
async fn same_day_reminder_is_independent_of_day_before() {
    let Some(db) = TestDb::new().await.expect("test database") else {
        return;
    };
    let ana = db.seed_client("Ana", "ana@example.com").await.expect("seed client");
    let trim = db.seed_service("Trim", 30, 2500).await.expect("seed service");

    let monday = upcoming_monday();
    let id = seed_appointment(&db, ana, trim, monday, AppointmentStatus::Confirmed).await;

    let recorder = Recorder::default();
    let mut conn = db.get_conn().await.expect("connection");

    let yesterday = monday - Days::new(1);
    let sent = send_reminders_on(&mut conn, &recorder, ReminderKind::DayBefore, yesterday)
        .await
        .expect("day-before sweep");
    assert_eq!(sent, 1);

    let sent = send_reminders_on(&mut conn, &recorder, ReminderKind::SameDay, monday)
        .await
        .expect("same-day sweep");
    assert_eq!(sent, 1);

    let sent = send_reminders_on(&mut conn, &recorder, ReminderKind::SameDay, monday)
        .await
        .expect("repeat same-day sweep");
    assert_eq!(sent, 0);

    assert_eq!(recorder.reminded(), vec![id, id]);

    let stored = appointment::get(&mut conn, id)
        .await
        .expect("load appointment")
        .expect("appointment exists");
    assert!(stored.reminder_sent);
    assert!(stored.same_day_reminder_sent);
}
