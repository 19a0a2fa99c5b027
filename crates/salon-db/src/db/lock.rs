//! Transaction-scoped advisory locks.
//!
//! Booking takes a per-date lock before its conflict check so that two
//! writers for the same day serialize on check-then-insert. The lock is
//! released when the surrounding transaction commits or rolls back.

use chrono::{Datelike, NaiveDate};
use diesel::sql_types::Integer;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;

/// First key of the two-key advisory lock space reserved for appointment dates.
const APPOINTMENT_DATE_LOCK_SPACE: i32 = 0x5A10_0D00;

/// ## Summary
/// Blocks until this transaction holds the advisory lock for `date`.
///
/// Must be called inside a transaction; outside one the lock is released
/// immediately.
///
/// ## Errors
/// Returns an error if the lock query fails.
#[tracing::instrument(skip(conn))]
pub async fn lock_appointment_date(
    conn: &mut DbConnection<'_>,
    date: NaiveDate,
) -> diesel::QueryResult<()> {
    diesel::sql_query("SELECT pg_advisory_xact_lock($1, $2)")
        .bind::<Integer, _>(APPOINTMENT_DATE_LOCK_SPACE)
        .bind::<Integer, _>(date.num_days_from_ce())
        .execute(conn)
        .await?;
    tracing::trace!("Acquired appointment date lock");
    Ok(())
}
