//! PostgreSQL persistence for the salon booking server.

pub mod db;
pub mod error;
pub mod model;
