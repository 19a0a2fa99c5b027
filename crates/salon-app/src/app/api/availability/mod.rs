//! `/api/availability`: slot lookup for clients plus rule and blackout
//! administration.

mod blocked;
mod rules;
mod slots;

use salvo::Router;

use salon_core::constants::AVAILABILITY_ROUTE_COMPONENT;

#[must_use]
pub fn routes() -> Router {
    // Literal segments are pushed before `{id}` so they are matched first.
    Router::with_path(AVAILABILITY_ROUTE_COMPONENT)
        .get(rules::list_rules)
        .push(Router::with_path("slots").get(slots::available_slots))
        .push(Router::with_path("dates/{year}/{month}").get(slots::available_dates))
        .push(Router::with_path("calendar").get(slots::calendar))
        .push(Router::with_path("create").post(rules::create_rule))
        .push(Router::with_path("set").post(rules::set_weekly_hours))
        .push(Router::with_path("deactivate/{day}").delete(rules::deactivate_weekday))
        .push(blocked::routes())
        .push(
            Router::with_path("{id}")
                .put(rules::update_rule)
                .delete(rules::delete_rule),
        )
}
