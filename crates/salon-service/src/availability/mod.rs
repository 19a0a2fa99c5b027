//! Stylist availability: admin-managed opening hours and blackouts, and the
//! slot and calendar resolution computed over them.

pub mod blocked;
pub mod resolver;
pub mod rules;
pub mod scanner;
