mod helpers;

mod booking;
mod ledger;
mod reminders;
