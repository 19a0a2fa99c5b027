//! Appointment lookup and lifecycle changes.

use chrono::NaiveDate;
use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedFutureExt;

use salon_db::db::connection::DbConnection;
use salon_db::db::enums::AppointmentStatus;
use salon_db::db::lock::lock_appointment_date;
use salon_db::db::query::appointment;
use salon_db::model::appointment::Appointment;

use crate::appointment::booking::find_conflict;
use crate::error::{ServiceError, ServiceResult};
use crate::notify::{Notification, Notifier, dispatch};

fn not_found(id: uuid::Uuid) -> ServiceError {
    ServiceError::NotFound(format!("appointment {id}"))
}

/// ## Errors
/// Returns an error if the query fails.
#[tracing::instrument(skip(conn))]
pub async fn list(
    conn: &mut DbConnection<'_>,
    client_id: Option<uuid::Uuid>,
    date: Option<NaiveDate>,
) -> ServiceResult<Vec<Appointment>> {
    Ok(appointment::list(conn, client_id, date).await?)
}

/// ## Errors
/// Returns `NotFound` for an unknown id, or any database error.
pub async fn get(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> ServiceResult<Appointment> {
    appointment::get(conn, id).await?.ok_or_else(|| not_found(id))
}

/// ## Summary
/// Client-side cancellation.
///
/// The status check and the update run in one transaction holding the row
/// lock, so a concurrent status change cannot slip in between them.
///
/// ## Errors
/// Returns `NotFound` for an unknown id, a validation error if the
/// appointment is already cancelled or completed, or any database error.
#[tracing::instrument(skip(conn, notifier), fields(appointment_id = %id))]
pub async fn cancel(
    conn: &mut DbConnection<'_>,
    notifier: &dyn Notifier,
    id: uuid::Uuid,
) -> ServiceResult<Appointment> {
    let cancelled = conn
        .transaction::<_, ServiceError, _>(move |tx| {
            async move {
                let current = appointment::get_for_update(tx, id)
                    .await?
                    .ok_or_else(|| not_found(id))?;
                if !current.status.is_cancellable() {
                    return Err(ServiceError::ValidationError(format!(
                        "cannot cancel a {} appointment",
                        current.status
                    )));
                }

                Ok(appointment::update_status(tx, id, AppointmentStatus::Cancelled).await?)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!("Appointment cancelled");
    dispatch(notifier, &Notification::cancelled(&cancelled));
    Ok(cancelled)
}

/// ## Summary
/// Admin status change.
///
/// Moving an appointment back into a slot-holding status re-runs the
/// booking conflict check under the date lock.
///
/// ## Errors
/// Returns `NotFound` for an unknown id, `Conflict` if reinstating the
/// appointment would overlap another one, or any database error.
#[tracing::instrument(skip(conn, notifier), fields(appointment_id = %id, status = %status))]
pub async fn update_status(
    conn: &mut DbConnection<'_>,
    notifier: &dyn Notifier,
    id: uuid::Uuid,
    status: AppointmentStatus,
) -> ServiceResult<Appointment> {
    let (from, updated) = conn
        .transaction::<_, ServiceError, _>(move |tx| {
            async move {
                let current = appointment::get_for_update(tx, id)
                    .await?
                    .ok_or_else(|| not_found(id))?;

                if status.occupies_slot() && !current.status.occupies_slot() {
                    lock_appointment_date(tx, current.appointment_date).await?;
                    let held = appointment::occupying_on(tx, current.appointment_date).await?;
                    if find_conflict(&held, &current.occupied_interval()).is_some() {
                        return Err(ServiceError::Conflict(format!(
                            "cannot mark appointment {status}, its slot has been taken"
                        )));
                    }
                }

                let updated = appointment::update_status(tx, id, status).await?;
                Ok((current.status, updated))
            }
            .scope_boxed()
        })
        .await?;

    if from != status {
        dispatch(
            notifier,
            &Notification::StatusChanged {
                appointment_id: id,
                from,
                to: status,
            },
        );
    }
    Ok(updated)
}

/// ## Summary
/// Hard-deletes an appointment or hard block.
///
/// ## Errors
/// Returns `NotFound` for an unknown id, or any database error.
#[tracing::instrument(skip(conn), fields(appointment_id = %id))]
pub async fn delete(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> ServiceResult<()> {
    if appointment::delete(conn, id).await? == 0 {
        return Err(not_found(id));
    }
    tracing::info!("Appointment deleted");
    Ok(())
}
