//! Query composition, one module per table.

pub mod appointment;
pub mod availability;
pub mod blocked_date;
pub mod catalog;
pub mod client;
