//! Availability and blackout rules, and how they attach to calendar days.
//!
//! Rule dates are `NaiveDate` values: a calendar day with no time-of-day or
//! offset. Matching a rule to a day is therefore plain equality, never
//! instant arithmetic.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_SLOT_GRANULARITY_MINUTES, MIN_SLOT_GRANULARITY_MINUTES};
use crate::error::{CoreError, CoreResult};
use crate::time::{ClockTime, TimeWindow, generate_slots};

/// Day of week, `0` = Sunday through `6` = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub const NAMES: [&'static str; 7] = [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];

    /// ## Errors
    /// Returns `CoreError::ValidationError` unless `index` is in `0..=6`.
    pub fn new(index: u8) -> CoreResult<Self> {
        if index <= 6 {
            Ok(Self(index))
        } else {
            Err(CoreError::ValidationError(format!(
                "invalid day of week {index}, expected 0 (Sunday) through 6 (Saturday)"
            )))
        }
    }

    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "num_days_from_sunday is always 0..=6"
        )]
        let index = date.weekday().num_days_from_sunday() as u8;
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        Self::NAMES[self.0 as usize]
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayOfWeek> for u8 {
    fn from(value: DayOfWeek) -> Self {
        value.0
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which calendar days a rule attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Every date falling on this weekday.
    Recurring(DayOfWeek),
    /// Exactly one calendar day.
    SpecificDate(NaiveDate),
}

impl RuleScope {
    /// ## Summary
    /// Builds a scope from the optional parts an admin submits.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` if a recurring scope lacks a valid
    /// weekday or a specific-date scope lacks a date.
    pub fn from_parts(
        recurring: bool,
        day_of_week: Option<i64>,
        date: Option<NaiveDate>,
    ) -> CoreResult<Self> {
        if recurring {
            let index = day_of_week.ok_or_else(|| {
                CoreError::ValidationError("day of week is required for recurring rules".into())
            })?;
            let index = u8::try_from(index).map_err(|_err| {
                CoreError::ValidationError(format!("invalid day of week {index}"))
            })?;
            Ok(Self::Recurring(DayOfWeek::new(index)?))
        } else {
            date.map(Self::SpecificDate).ok_or_else(|| {
                CoreError::ValidationError("date is required for non-recurring rules".into())
            })
        }
    }

    #[must_use]
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            Self::Recurring(day) => DayOfWeek::of(date) == *day,
            Self::SpecificDate(specific) => *specific == date,
        }
    }

    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        matches!(self, Self::Recurring(_))
    }

    #[must_use]
    pub const fn day_of_week(&self) -> Option<DayOfWeek> {
        match self {
            Self::Recurring(day) => Some(*day),
            Self::SpecificDate(_) => None,
        }
    }

    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Recurring(_) => None,
            Self::SpecificDate(date) => Some(*date),
        }
    }
}

/// Opening hours of an availability rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleWindow {
    /// Conventionally 09:00 to 17:00.
    AllDay,
    Explicit(TimeWindow),
}

impl RuleWindow {
    #[must_use]
    pub const fn bounds(&self) -> TimeWindow {
        match self {
            Self::AllDay => TimeWindow::ALL_DAY,
            Self::Explicit(window) => *window,
        }
    }

    #[must_use]
    pub const fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay)
    }
}

/// Validates a slot stride.
///
/// ## Errors
/// Returns `CoreError::ValidationError` outside `15..=120` minutes.
pub fn validate_granularity(minutes: u16) -> CoreResult<u16> {
    if (MIN_SLOT_GRANULARITY_MINUTES..=MAX_SLOT_GRANULARITY_MINUTES).contains(&minutes) {
        Ok(minutes)
    } else {
        Err(CoreError::ValidationError(format!(
            "slot duration {minutes} must be between {MIN_SLOT_GRANULARITY_MINUTES} and {MAX_SLOT_GRANULARITY_MINUTES} minutes"
        )))
    }
}

/// Opening hours attached to a weekday or a single date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRule {
    pub id: uuid::Uuid,
    pub scope: RuleScope,
    pub window: RuleWindow,
    pub slot_granularity_minutes: u16,
    pub active: bool,
    pub notes: Option<String>,
}

impl AvailabilityRule {
    /// ## Summary
    /// Returns true if the rule is active and attaches to `date`.
    #[must_use]
    pub fn applies_to_date(&self, date: NaiveDate) -> bool {
        self.active && self.scope.matches(date)
    }

    /// ## Summary
    /// Candidate slot starts at this rule's own granularity.
    #[must_use]
    pub fn candidate_slots(&self) -> Vec<ClockTime> {
        generate_slots(&self.window.bounds(), self.slot_granularity_minutes)
    }
}

/// A blackout attached to a weekday or a single date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedDateRule {
    pub id: uuid::Uuid,
    pub scope: RuleScope,
    /// `None` blocks the whole day.
    pub range: Option<TimeWindow>,
    pub reason: String,
    pub active: bool,
}

impl BlockedDateRule {
    #[must_use]
    pub const fn is_all_day(&self) -> bool {
        self.range.is_none()
    }

    /// ## Summary
    /// Returns true if this block covers `date`, and when `time` is given for a
    /// partial block, if `time` falls inside the blocked range.
    ///
    /// A partial block never matches when no time is supplied.
    #[must_use]
    pub fn applies(&self, date: NaiveDate, time: Option<ClockTime>) -> bool {
        if !self.active || !self.scope.matches(date) {
            return false;
        }

        match (&self.range, time) {
            (None, _) => true,
            (Some(range), Some(time)) => range.contains_time(time),
            (Some(_), None) => false,
        }
    }
}
