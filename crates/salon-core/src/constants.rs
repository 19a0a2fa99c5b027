/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const AVAILABILITY_ROUTE_COMPONENT: &str = "availability";
pub const AVAILABILITY_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", AVAILABILITY_ROUTE_COMPONENT);

pub const APPOINTMENTS_ROUTE_COMPONENT: &str = "appointments";
pub const APPOINTMENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", APPOINTMENTS_ROUTE_COMPONENT);

/// Slot stride used when a rule does not specify one.
pub const DEFAULT_SLOT_GRANULARITY_MINUTES: u16 = 30;
pub const MIN_SLOT_GRANULARITY_MINUTES: u16 = 15;
pub const MAX_SLOT_GRANULARITY_MINUTES: u16 = 120;

/// Occupancy assumed for an appointment whose own duration is unknown.
pub const DEFAULT_APPOINTMENT_MINUTES: u16 = 30;

/// Note stored on hard blocks created without a reason.
pub const DEFAULT_BLOCK_NOTE: &str = "Blocked by admin";

/// Local hours at which the reminder sweeps run.
pub const DEFAULT_REMINDER_HOUR: u8 = 9;
pub const DEFAULT_SAME_DAY_REMINDER_HOUR: u8 = 8;
