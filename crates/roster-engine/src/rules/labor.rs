use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Flexible working-time arrangement the roster is audited against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborStandard {
    FourWeek,
    TwoWeek,
    EightWeek,
}

/// Statutory ceiling over one rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborCap {
    pub window_days: usize,
    pub max_hours: u32,
    pub max_worked_days: usize,
}

impl LaborStandard {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FourWeek => "four_week",
            Self::TwoWeek => "two_week",
            Self::EightWeek => "eight_week",
        }
    }

    pub const fn cap(self) -> LaborCap {
        match self {
            Self::TwoWeek => LaborCap {
                window_days: 14,
                max_hours: 80,
                max_worked_days: 10,
            },
            Self::FourWeek => LaborCap {
                window_days: 28,
                max_hours: 160,
                max_worked_days: 20,
            },
            Self::EightWeek => LaborCap {
                window_days: 56,
                max_hours: 320,
                max_worked_days: 40,
            },
        }
    }
}

impl LaborCap {
    /// Cap for a horizon shorter than the statutory window, scaled down and floored.
    pub fn fitted_to(self, horizon_days: usize) -> Self {
        if horizon_days >= self.window_days || self.window_days == 0 {
            return self;
        }

        Self {
            window_days: horizon_days,
            max_hours: (u64::from(self.max_hours) * horizon_days as u64
                / self.window_days as u64) as u32,
            max_worked_days: self.max_worked_days * horizon_days / self.window_days,
        }
    }
}

impl fmt::Display for LaborStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaborStandard {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "four_week" | "4w" => Ok(Self::FourWeek),
            "two_week" | "2w" => Ok(Self::TwoWeek),
            "eight_week" | "8w" => Ok(Self::EightWeek),
            other => Err(ConfigError::UnknownLaborStandard(other.to_string())),
        }
    }
}
