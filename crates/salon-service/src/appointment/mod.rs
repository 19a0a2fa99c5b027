//! The appointment ledger: bookings, hard blocks, their lifecycle and reminders.

pub mod booking;
pub mod ledger;
pub mod reminder;
