use chrono::NaiveDate;
use salvo::writing::Json;
use salvo::{Depot, Request, handler};
use serde::Serialize;

use salon_core::time::ClockTime;
use salon_service::availability::{resolver, scanner};
use salon_service::calendar as calendar_feed;

use crate::app::api::extract::{connection, optional_query, path_param, required_query};
use crate::app::api::view::{AppointmentView, BlockView, RuleView};
use crate::config::get_config_from_depot;
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    pub slots: Vec<ClockTime>,
    /// Present, and true, only when the service's duration was unknown.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub duration_fallback: bool,
}

/// ## Summary
/// GET `/availability/slots?date=YYYY-MM-DD&serviceId=<id>`
///
/// ## Errors
/// Returns 400 for a missing or malformed date or service id, 500 if the
/// store fails. A day without availability is an empty list, not an error.
#[handler]
pub async fn available_slots(req: &mut Request, depot: &mut Depot) -> AppResult<Json<SlotsResponse>> {
    let date: NaiveDate = required_query(req, "date")?;
    let service_id: Option<uuid::Uuid> = optional_query(req, "serviceId")?;

    let settings = get_config_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let resolution =
        resolver::available_slots(&mut conn, &settings.schedule, date, service_id).await?;

    Ok(Json(SlotsResponse {
        slots: resolution.slots,
        duration_fallback: resolution.duration.fallback,
    }))
}

/// ## Summary
/// GET `/availability/dates/{year}/{month}`
///
/// Returns a bare array of the month's bookable days.
///
/// ## Errors
/// Returns 400 for a non-numeric or out-of-range month or year.
#[handler]
pub async fn available_dates(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<Vec<scanner::DayAvailability>>> {
    let year: i32 = path_param(req, "year")?;
    let month: u32 = path_param(req, "month")?;

    let settings = get_config_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let days = scanner::available_dates(&mut conn, &settings.schedule, year, month).await?;
    Ok(Json(days))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub appointments: Vec<AppointmentView>,
    pub blocked_dates: Vec<BlockView>,
    pub availability: Vec<RuleView>,
}

/// ## Summary
/// GET `/availability/calendar?month=&year=`
///
/// The admin dashboard feed: raw rules and blackouts next to the month's
/// appointments, nothing resolved into slots.
///
/// ## Errors
/// Returns 400 if `month` or `year` is missing or invalid.
#[handler]
pub async fn calendar(req: &mut Request, depot: &mut Depot) -> AppResult<Json<CalendarResponse>> {
    let month: u32 = required_query(req, "month")?;
    let year: i32 = required_query(req, "year")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let feed = calendar_feed::month_feed(&mut conn, year, month).await?;
    Ok(Json(CalendarResponse {
        appointments: feed.appointments.into_iter().map(AppointmentView::from).collect(),
        blocked_dates: feed.blocked_dates.into_iter().map(BlockView::from).collect(),
        availability: feed.availability.into_iter().map(RuleView::from).collect(),
    }))
}
