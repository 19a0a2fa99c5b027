//! Query composition for `appointment`, the booked calendar.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::enums::AppointmentStatus;
use crate::db::schema::{appointment, salon_service, salon_user};
use crate::model::appointment::{Appointment, NewAppointment};
use crate::model::catalog::SalonService;
use crate::model::client::Client;

/// ## Summary
/// Lists appointments on `date` that hold their slot (pending or confirmed),
/// hard blocks included, ordered by start time.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn occupying_on(
    conn: &mut DbConnection<'_>,
    date: NaiveDate,
) -> QueryResult<Vec<Appointment>> {
    appointment::table
        .filter(appointment::appointment_date.eq(date))
        .filter(appointment::status.eq_any(AppointmentStatus::OCCUPYING))
        .order(appointment::start_minute.asc())
        .select(Appointment::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Counts non-cancelled appointments per day in `[from, to]`.
///
/// Days with no appointments are absent from the result.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn count_by_date(
    conn: &mut DbConnection<'_>,
    from: NaiveDate,
    to: NaiveDate,
) -> QueryResult<Vec<(NaiveDate, i64)>> {
    appointment::table
        .filter(appointment::appointment_date.between(from, to))
        .filter(appointment::status.ne(AppointmentStatus::Cancelled))
        .group_by(appointment::appointment_date)
        .select((appointment::appointment_date, diesel::dsl::count_star()))
        .order(appointment::appointment_date.asc())
        .load(conn)
        .await
}

/// An appointment with its client and service, when it has them.
pub type AppointmentDetail = (Appointment, Option<Client>, Option<SalonService>);

/// ## Summary
/// Lists every appointment in `[from, to]` regardless of status, joined
/// with its client and service. Hard blocks carry neither.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn in_range(
    conn: &mut DbConnection<'_>,
    from: NaiveDate,
    to: NaiveDate,
) -> QueryResult<Vec<AppointmentDetail>> {
    appointment::table
        .left_join(salon_user::table)
        .left_join(salon_service::table)
        .filter(appointment::appointment_date.between(from, to))
        .order((
            appointment::appointment_date.asc(),
            appointment::start_minute.asc(),
        ))
        .select((
            Appointment::as_select(),
            Option::<Client>::as_select(),
            Option::<SalonService>::as_select(),
        ))
        .load(conn)
        .await
}

/// ## Summary
/// Lists appointments, optionally narrowed to one client and/or one day.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list(
    conn: &mut DbConnection<'_>,
    client_id: Option<Uuid>,
    date: Option<NaiveDate>,
) -> QueryResult<Vec<Appointment>> {
    let mut query = appointment::table
        .select(Appointment::as_select())
        .order((
            appointment::appointment_date.asc(),
            appointment::start_minute.asc(),
        ))
        .into_boxed();

    if let Some(client_id) = client_id {
        query = query.filter(appointment::client_id.eq(client_id));
    }
    if let Some(date) = date {
        query = query.filter(appointment::appointment_date.eq(date));
    }

    query.load(conn).await
}

/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Appointment>> {
    appointment::table
        .find(id)
        .select(Appointment::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Like [`get`], but row-locks the appointment until the surrounding
/// transaction ends.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_for_update(
    conn: &mut DbConnection<'_>,
    id: Uuid,
) -> QueryResult<Option<Appointment>> {
    appointment::table
        .find(id)
        .select(Appointment::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    new_appointment: &NewAppointment<'_>,
) -> QueryResult<Appointment> {
    diesel::insert_into(appointment::table)
        .values(new_appointment)
        .returning(Appointment::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Flags every un-reminded booking on `date` that still holds its slot as
/// reminded the day before, returning the rows it flipped.
///
/// Claiming happens in a single `UPDATE`, so overlapping sweeps never hand
/// out the same appointment twice.
///
/// ## Errors
/// Returns an error if the database operation fails.
#[tracing::instrument(skip(conn))]
pub async fn claim_day_before_reminders(
    conn: &mut DbConnection<'_>,
    date: NaiveDate,
) -> QueryResult<Vec<Appointment>> {
    diesel::update(
        appointment::table
            .filter(appointment::appointment_date.eq(date))
            .filter(appointment::status.eq_any(AppointmentStatus::OCCUPYING))
            .filter(appointment::is_blocked.eq(false))
            .filter(appointment::reminder_sent.eq(false)),
    )
    .set(appointment::reminder_sent.eq(true))
    .returning(Appointment::as_returning())
    .get_results(conn)
    .await
}

/// ## Summary
/// Same as [`claim_day_before_reminders`], for the morning-of reminder.
///
/// ## Errors
/// Returns an error if the database operation fails.
#[tracing::instrument(skip(conn))]
pub async fn claim_same_day_reminders(
    conn: &mut DbConnection<'_>,
    date: NaiveDate,
) -> QueryResult<Vec<Appointment>> {
    diesel::update(
        appointment::table
            .filter(appointment::appointment_date.eq(date))
            .filter(appointment::status.eq_any(AppointmentStatus::OCCUPYING))
            .filter(appointment::is_blocked.eq(false))
            .filter(appointment::same_day_reminder_sent.eq(false)),
    )
    .set(appointment::same_day_reminder_sent.eq(true))
    .returning(Appointment::as_returning())
    .get_results(conn)
    .await
}

/// ## Errors
/// Returns `NotFound` if the id does not exist, or any database error.
pub async fn update_status(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    status: AppointmentStatus,
) -> QueryResult<Appointment> {
    diesel::update(appointment::table.find(id))
        .set((
            appointment::status.eq(status),
            appointment::updated_at.eq(diesel::dsl::now),
        ))
        .returning(Appointment::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Hard-deletes an appointment. Returns the number of rows removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<usize> {
    diesel::delete(appointment::table.find(id))
        .execute(conn)
        .await
}
