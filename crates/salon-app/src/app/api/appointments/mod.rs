//! `/api/appointments`: the appointment ledger.

mod handlers;

use salvo::Router;

use salon_core::constants::APPOINTMENTS_ROUTE_COMPONENT;

#[must_use]
pub fn routes() -> Router {
    Router::with_path(APPOINTMENTS_ROUTE_COMPONENT)
        .get(handlers::list_appointments)
        .push(Router::with_path("book").post(handlers::book))
        .push(Router::with_path("block").post(handlers::block_slot))
        .push(
            Router::with_path("{id}")
                .delete(handlers::delete_appointment)
                .push(Router::with_path("status").put(handlers::update_status))
                .push(Router::with_path("cancel").post(handlers::cancel)),
        )
}
