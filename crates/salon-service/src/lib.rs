pub mod appointment;
pub mod availability;
pub mod calendar;
pub mod error;
pub mod notify;
