//! Salon booking core: configuration, errors, and the scheduling vocabulary
//! shared by the database, service, and HTTP crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod rule;
pub mod time;
