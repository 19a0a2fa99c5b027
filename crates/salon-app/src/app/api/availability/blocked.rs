use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Serialize;

use salon_service::availability::blocked::{self, BlockInput};

use crate::app::api::extract::{connection, json_body, path_param};
use crate::app::api::view::{BlockView, MessageView};
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedDatesBody {
    pub blocked_dates: Vec<BlockView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedDateBody {
    pub blocked_date: BlockView,
}

#[handler]
async fn list_blocked(depot: &mut Depot) -> AppResult<Json<BlockedDatesBody>> {
    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let blocks = blocked::list_active(&mut conn).await?;
    Ok(Json(BlockedDatesBody {
        blocked_dates: blocks.into_iter().map(BlockView::from).collect(),
    }))
}

/// ## Summary
/// POST `/availability/blocked`
///
/// ## Errors
/// Returns 400 without a reason, a scope, or a valid partial range.
#[handler]
async fn create_blocked(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<BlockedDateBody>> {
    let input: BlockInput = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let block = blocked::create(&mut conn, &input).await?;
    res.status_code(StatusCode::CREATED);
    Ok(Json(BlockedDateBody {
        blocked_date: block.into(),
    }))
}

#[handler]
async fn update_blocked(req: &mut Request, depot: &mut Depot) -> AppResult<Json<BlockedDateBody>> {
    let id: uuid::Uuid = path_param(req, "id")?;
    let input: BlockInput = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    let block = blocked::update(&mut conn, id, &input).await?;
    Ok(Json(BlockedDateBody {
        blocked_date: block.into(),
    }))
}

#[handler]
async fn delete_blocked(req: &mut Request, depot: &mut Depot) -> AppResult<Json<MessageView>> {
    let id: uuid::Uuid = path_param(req, "id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = connection(provider.as_ref()).await?;

    blocked::delete(&mut conn, id).await?;
    Ok(Json(MessageView::new("Blocked date deleted")))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("blocked")
        .get(list_blocked)
        .post(create_blocked)
        .push(
            Router::with_path("{id}")
                .put(update_blocked)
                .delete(delete_blocked),
        )
}
