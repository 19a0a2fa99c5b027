//! Service lookup used by booking and slot resolution.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::salon_service;
use crate::model::catalog::{NewSalonService, SalonService};

/// ## Summary
/// Fetches a service by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_service(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<SalonService>> {
    salon_service::table
        .find(id)
        .select(SalonService::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert_service(
    conn: &mut DbConnection<'_>,
    service: &NewSalonService<'_>,
) -> QueryResult<SalonService> {
    diesel::insert_into(salon_service::table)
        .values(service)
        .returning(SalonService::as_returning())
        .get_result(conn)
        .await
}
