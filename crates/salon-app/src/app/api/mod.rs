mod app_specific;
mod appointments;
mod availability;
pub mod extract;
pub mod view;

use salvo::Router;

// Re-export route constants from core
pub use salon_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, APPOINTMENTS_ROUTE_PREFIX, AVAILABILITY_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the main API router.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(availability::routes())
        .push(appointments::routes())
}
