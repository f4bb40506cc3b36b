use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Inputs available when resolving a pre-schedule limit for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreScheduleContext {
    pub total_staff: u32,
    pub required_staff: u32,
    /// Already-resolved daily limit for the same date.
    pub daily_limit: u32,
    /// Configured `holidayPreScheduleLimit`.
    pub holiday_limit: u32,
}

/// How many staff may pre-schedule on a holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayLimitFormula {
    Fixed,
    SameAsDaily,
    HalfSurplus,
    MinOfFixedAndDaily,
}

impl HolidayLimitFormula {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Fixed,
            Self::SameAsDaily,
            Self::HalfSurplus,
            Self::MinOfFixedAndDaily,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::SameAsDaily => "same_as_daily",
            Self::HalfSurplus => "half_surplus",
            Self::MinOfFixedAndDaily => "min_of_fixed_and_daily",
        }
    }

    pub fn evaluate(self, context: &PreScheduleContext) -> u32 {
        match self {
            Self::Fixed => context.holiday_limit,
            Self::SameAsDaily => context.daily_limit,
            Self::HalfSurplus => context.total_staff.saturating_sub(context.required_staff) / 2,
            Self::MinOfFixedAndDaily => context.holiday_limit.min(context.daily_limit),
        }
    }
}

impl fmt::Display for HolidayLimitFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HolidayLimitFormula {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|formula| formula.as_str() == normalized)
            .ok_or(ConfigError::UnknownHolidayFormula(raw.trim().to_string()))
    }
}

/// `max(0, total − required − 1)`: one head is always held back.
pub fn dynamic_daily_limit(total_staff: u32, required_staff: u32) -> u32 {
    total_staff
        .saturating_sub(required_staff)
        .saturating_sub(1)
}

pub fn dynamic_monthly_limit(average_off_days: f64) -> u32 {
    (average_off_days / 2.0).floor().max(0.0) as u32
}
