use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, handler};
use serde::Serialize;

use salon_service::availability::rules::{self, RuleInput, WeeklyHoursInput};

use crate::app::api::extract::{connection, json_body, path_param};
use crate::app::api::view::{MessageView, RuleView};
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
pub struct AvailabilityBody<T> {
    pub availability: T,
}

/// GET `/availability`
#[handler]
pub async fn list_rules(depot: &mut Depot) -> AppResult<Json<AvailabilityBody<Vec<RuleView>>>> {
    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let listed = rules::list_active(&mut conn).await?;
    Ok(Json(AvailabilityBody {
        availability: listed.into_iter().map(RuleView::from).collect(),
    }))
}

/// ## Summary
/// POST `/availability/create`
///
/// ## Errors
/// Returns 400 if the rule is invalid.
#[handler]
pub async fn create_rule(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<AvailabilityBody<RuleView>>> {
    let input: RuleInput = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let rule = rules::create(&mut conn, &input).await?;
    res.status_code(StatusCode::CREATED);
    Ok(Json(AvailabilityBody {
        availability: rule.into(),
    }))
}

/// ## Summary
/// PUT `/availability/{id}`
///
/// ## Errors
/// Returns 404 for an unknown rule and 400 if the edit leaves it invalid.
#[handler]
pub async fn update_rule(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<AvailabilityBody<RuleView>>> {
    let id: uuid::Uuid = path_param(req, "id")?;
    let input: RuleInput = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let rule = rules::update(&mut conn, id, &input).await?;
    Ok(Json(AvailabilityBody {
        availability: rule.into(),
    }))
}

/// DELETE `/availability/{id}`
#[handler]
pub async fn delete_rule(req: &mut Request, depot: &mut Depot) -> AppResult<Json<MessageView>> {
    let id: uuid::Uuid = path_param(req, "id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    rules::delete(&mut conn, id).await?;
    Ok(Json(MessageView::new("Availability deleted")))
}

/// ## Summary
/// POST `/availability/set`
///
/// Upserts the recurring hours of one weekday.
#[handler]
pub async fn set_weekly_hours(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<AvailabilityBody<RuleView>>> {
    let input: WeeklyHoursInput = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let rule = rules::set_weekly_hours(&mut conn, &input).await?;
    Ok(Json(AvailabilityBody {
        availability: rule.into(),
    }))
}

/// DELETE `/availability/deactivate/{day}`
#[handler]
pub async fn deactivate_weekday(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<AvailabilityBody<RuleView>>> {
    let day: i64 = path_param(req, "day")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let rule = rules::deactivate_weekday(&mut conn, day).await?;
    Ok(Json(AvailabilityBody {
        availability: rule.into(),
    }))
}
