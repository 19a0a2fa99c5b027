use chrono::NaiveDate;
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, handler};
use serde::{Deserialize, Serialize};

use salon_db::db::enums::AppointmentStatus;
use salon_service::appointment::booking::{self, BookingRequest, HardBlockRequest};
use salon_service::appointment::ledger;

use crate::app::api::extract::{connection, json_body, optional_query, path_param};
use crate::app::api::view::{AppointmentView, MessageView};
use crate::config::get_config_from_depot;
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;
use crate::notifier_handler::get_notifier_from_depot;

#[derive(Debug, Serialize)]
pub struct AppointmentsBody {
    pub appointments: Vec<AppointmentView>,
}

#[derive(Debug, Serialize)]
pub struct AppointmentBody {
    pub appointment: AppointmentView,
}

#[derive(Debug, Serialize)]
pub struct BlockBody {
    pub block: AppointmentView,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: AppointmentStatus,
}

/// GET `/appointments?clientId=&date=`
#[handler]
pub async fn list_appointments(req: &mut Request, depot: &mut Depot) -> AppResult<Json<AppointmentsBody>> {
    let client_id: Option<uuid::Uuid> = optional_query(req, "clientId")?;
    let date: Option<NaiveDate> = optional_query(req, "date")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let appointments = ledger::list(&mut conn, client_id, date).await?;
    Ok(Json(AppointmentsBody {
        appointments: appointments.into_iter().map(AppointmentView::from).collect(),
    }))
}

/// ## Summary
/// POST `/appointments/book`
///
/// Any `endTime` in the body is ignored; the service's duration decides it.
///
/// ## Errors
/// Returns 400 for a malformed or past request, 404 for an unknown client
/// or service, and 409 when the interval is already held.
#[handler]
pub async fn book(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<AppointmentBody>> {
    let request: BookingRequest = json_body(req).await?;

    let settings = get_config_from_depot(depot)?;
    let notifier = get_notifier_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let created = booking::book(&mut conn, &settings.schedule, notifier.as_ref(), request).await?;
    res.status_code(StatusCode::CREATED);
    Ok(Json(AppointmentBody {
        appointment: created.into(),
    }))
}

/// ## Summary
/// POST `/appointments/block`
///
/// ## Errors
/// Returns 400 for an empty range or a past date, 409 on overlap.
#[handler]
pub async fn block_slot(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<BlockBody>> {
    let request: HardBlockRequest = json_body(req).await?;

    let settings = get_config_from_depot(depot)?;
    let notifier = get_notifier_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let created =
        booking::block_slot(&mut conn, &settings.schedule, notifier.as_ref(), request).await?;
    res.status_code(StatusCode::CREATED);
    Ok(Json(BlockBody {
        block: created.into(),
    }))
}

/// PUT `/appointments/{id}/status`
#[handler]
pub async fn update_status(req: &mut Request, depot: &mut Depot) -> AppResult<Json<AppointmentBody>> {
    let id: uuid::Uuid = path_param(req, "id")?;
    let change: StatusChange = json_body(req).await?;

    let notifier = get_notifier_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let updated = ledger::update_status(&mut conn, notifier.as_ref(), id, change.status).await?;
    Ok(Json(AppointmentBody {
        appointment: updated.into(),
    }))
}

/// POST `/appointments/{id}/cancel`
#[handler]
pub async fn cancel(req: &mut Request, depot: &mut Depot) -> AppResult<Json<AppointmentBody>> {
    let id: uuid::Uuid = path_param(req, "id")?;

    let notifier = get_notifier_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let cancelled = ledger::cancel(&mut conn, notifier.as_ref(), id).await?;
    Ok(Json(AppointmentBody {
        appointment: cancelled.into(),
    }))
}

/// DELETE `/appointments/{id}`
#[handler]
pub async fn delete_appointment(req: &mut Request, depot: &mut Depot) -> AppResult<Json<MessageView>> {
    let id: uuid::Uuid = path_param(req, "id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    ledger::delete(&mut conn, id).await?;
    Ok(Json(MessageView::new("Appointment deleted")))
}
