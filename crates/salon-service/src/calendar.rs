//! Admin dashboard feed: a month of appointments next to the raw rules.

use salon_core::rule::{AvailabilityRule, BlockedDateRule};
use salon_db::db::connection::DbConnection;
use salon_db::db::query::appointment::{self, AppointmentDetail};

use crate::availability::scanner::month_bounds;
use crate::availability::{blocked, rules};
use crate::error::ServiceResult;

/// Unresolved calendar data for one month.
#[derive(Debug, Clone)]
pub struct CalendarFeed {
    /// Every appointment in the month, any status, hard blocks included.
    pub appointments: Vec<AppointmentDetail>,
    /// All active blackouts; recurring ones are not expanded.
    pub blocked_dates: Vec<BlockedDateRule>,
    /// All active availability rules; recurring ones are not expanded.
    pub availability: Vec<AvailabilityRule>,
}

/// ## Errors
/// Returns a validation error for an invalid month, or any database error.
#[tracing::instrument(skip(conn))]
pub async fn month_feed(
    conn: &mut DbConnection<'_>,
    year: i32,
    month: u32,
) -> ServiceResult<CalendarFeed> {
    let (first, last) = month_bounds(year, month)?;

    Ok(CalendarFeed {
        appointments: appointment::in_range(conn, first, last).await?,
        blocked_dates: blocked::list_active(conn).await?,
        availability: rules::list_active(conn).await?,
    })
}
