//! Clock times, time-of-day windows, and slot arithmetic.
//!
//! All values here are wall-clock times on a single calendar day with no
//! timezone attached. Arithmetic is done on linear minute offsets from
//! midnight so that an interval may end at or past `24:00`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, CoreResult};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A minute-resolution time of day (`00:00` through `23:59`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MIDNIGHT: Self = Self(0);

    /// Returns `None` unless `minutes` falls inside a single day.
    #[must_use]
    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(Self(minutes))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour as u16 * 60 + minute as u16))
        } else {
            None
        }
    }

    /// Truncates seconds and sub-seconds.
    #[must_use]
    pub fn from_naive_time(time: NaiveTime) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "hour < 24 and minute < 60 always fit in u16"
        )]
        let minutes = (time.hour() * 60 + time.minute()) as u16;
        Self(minutes)
    }

    /// Minutes after midnight.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    #[must_use]
    pub const fn minute(self) -> u16 {
        self.0 % 60
    }

    /// ## Summary
    /// Adds minutes, returning `None` if the result leaves the day.
    #[must_use]
    pub fn checked_add_minutes(self, minutes: u16) -> Option<Self> {
        self.0.checked_add(minutes).and_then(Self::from_minutes)
    }

    /// ## Summary
    /// Parses `H:MM` or `HH:MM` (24-hour clock).
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` for anything else.
    pub fn parse(value: &str) -> CoreResult<Self> {
        let invalid = || CoreError::ValidationError(format!("invalid time '{value}', expected HH:MM"));

        let (hour, minute) = value.split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let hour: u8 = hour.parse().map_err(|_err| invalid())?;
        let minute: u8 = minute.parse().map_err(|_err| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Half-open `[start, end)` range in minutes after midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    /// The range a booking of `duration_minutes` starting at `start` occupies.
    #[must_use]
    pub fn occupied(start: ClockTime, duration_minutes: u16) -> Self {
        let start = u32::from(start.minutes());
        Self {
            start,
            end: start + u32::from(duration_minutes),
        }
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        intervals_overlap(self.start, self.end, other.start, other.end)
    }

    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// ## Summary
/// Half-open interval overlap: `[start_a, end_a)` and `[start_b, end_b)` share
/// at least one minute.
#[must_use]
pub const fn intervals_overlap(start_a: u32, end_a: u32, start_b: u32, end_b: u32) -> bool {
    start_a < end_b && start_b < end_a
}

/// A time-of-day range with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: ClockTime,
    end: ClockTime,
}

impl TimeWindow {
    /// The conventional window for rules marked "all day".
    pub const ALL_DAY: Self = Self {
        start: ClockTime(9 * 60),
        end: ClockTime(17 * 60),
    };

    /// ## Summary
    /// Builds a window from two clock times.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` unless `start < end`.
    pub fn new(start: ClockTime, end: ClockTime) -> CoreResult<Self> {
        if start >= end {
            return Err(CoreError::ValidationError(format!(
                "start time {start} must be before end time {end}"
            )));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> ClockTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> ClockTime {
        self.end
    }

    #[must_use]
    pub fn interval(&self) -> Interval {
        Interval {
            start: u32::from(self.start.minutes()),
            end: u32::from(self.end.minutes()),
        }
    }

    /// True if `time` lies in `[start, end)`.
    #[must_use]
    pub fn contains_time(&self, time: ClockTime) -> bool {
        self.start <= time && time < self.end
    }
}

/// ## Summary
/// Emits slot start times from `window.start`, stepping by `granularity_minutes`,
/// keeping only starts whose full slot still ends inside the window.
///
/// A zero granularity yields no slots.
#[must_use]
pub fn generate_slots(window: &TimeWindow, granularity_minutes: u16) -> Vec<ClockTime> {
    if granularity_minutes == 0 {
        return Vec::new();
    }

    let end = u32::from(window.end.minutes());
    let step = u32::from(granularity_minutes);
    let mut current = u32::from(window.start.minutes());
    let mut slots = Vec::new();

    while current + step <= end {
        if let Some(slot) = u16::try_from(current).ok().and_then(ClockTime::from_minutes) {
            slots.push(slot);
        }
        current += step;
    }

    slots
}
