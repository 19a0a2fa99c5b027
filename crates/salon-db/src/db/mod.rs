use crate::error::DbResult;
use std::future::Future;
use std::pin::Pin;

use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub mod connection;
pub mod enums;
pub mod lock;
pub mod map;
pub mod query;
pub mod schema;

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub trait DbProvider: Send + Sync {
    fn get_connection<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = DbResult<connection::DbConnection<'a>>> + Send + 'a>>;
}
