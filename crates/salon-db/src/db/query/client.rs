//! Client lookup used by booking.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::salon_user;
use crate::model::client::{Client, NewClient};

/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_client(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Client>> {
    salon_user::table
        .find(id)
        .select(Client::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert_client(conn: &mut DbConnection<'_>, client: &NewClient<'_>) -> QueryResult<Client> {
    diesel::insert_into(salon_user::table)
        .values(client)
        .returning(Client::as_returning())
        .get_result(conn)
        .await
}
