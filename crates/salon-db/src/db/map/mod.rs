//! Conversions between stored rows and the scheduling domain types.

pub mod rule;
