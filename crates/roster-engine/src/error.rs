use std::path::PathBuf;

use chrono::NaiveDate;

use crate::roster::shift::{ShiftCode, UnknownShiftCode};
use crate::roster::staff::StaffId;
use crate::scoring::{ProfileError, ScoringCategory, TermKey};

/// Rule set, scoring schema, or profile configuration that cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("failed to read configuration from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must be a non-negative integer or \"dynamic\" (found '{value}')")]
    InvalidLimit { field: &'static str, value: String },
    #[error("{field} contains unknown shift code '{value}'")]
    UnknownShiftCode { field: &'static str, value: String },
    #[error("shiftOrder must not be empty when enableShiftOrder is set")]
    EmptyShiftOrder,
    #[error("shiftOrder lists {0} more than once")]
    DuplicateShiftOrderCode(ShiftCode),
    #[error("unknown holiday limit formula '{0}'")]
    UnknownHolidayFormula(String),
    #[error("unknown labor standard '{0}'")]
    UnknownLaborStandard(String),
    #[error("scoring schema does not declare term {0}")]
    SchemaMissingTerm(TermKey),
    #[error("scoring schema bounds for {term} are invalid ([{min}, {max}])")]
    InvalidTermBounds { term: TermKey, min: f64, max: f64 },
    #[error("scoring schema share for {category} must be within (0, 1] (found {share})")]
    InvalidCategoryShare {
        category: ScoringCategory,
        share: f64,
    },
    #[error("invalid strategy profile: {}", summarize(.0))]
    InvalidProfile(Vec<ProfileError>),
    #[error("unknown strategy profile '{0}'")]
    UnknownProfile(String),
}

fn summarize(errors: &[ProfileError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<ProfileError>> for ConfigError {
    fn from(errors: Vec<ProfileError>) -> Self {
        Self::InvalidProfile(errors)
    }
}

/// A candidate schedule that is not a valid domain object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{year}-{month:02} is not a calendar month")]
    InvalidMonth { year: i32, month: u32 },
    #[error("schedule references unknown staff {0}")]
    UnknownStaff(StaffId),
    #[error("schedule has no assignment for {staff_id} on {date}")]
    IncompleteSchedule { staff_id: StaffId, date: NaiveDate },
    #[error("schedule row for {staff_id} has {provided} days, month has {expected}")]
    ExcessDays {
        staff_id: StaffId,
        provided: usize,
        expected: usize,
    },
    #[error("day {day} for {staff_id} is outside 1..={days_in_month}")]
    DayOutOfRange {
        staff_id: StaffId,
        day: u32,
        days_in_month: u32,
    },
    #[error("{0} is outside the scheduled month")]
    DateOutsideMonth(NaiveDate),
    #[error("duplicate pre-schedule request for {staff_id} on {date}")]
    DuplicateRequest { staff_id: StaffId, date: NaiveDate },
    #[error(transparent)]
    UnknownShiftCode(#[from] UnknownShiftCode),
}

impl InputError {
    /// Stable identifier for API consumers.
    pub const fn code(&self) -> &'static str {
        match self {
            InputError::InvalidMonth { .. } => "INVALID_MONTH",
            InputError::UnknownStaff(_) => "UNKNOWN_STAFF",
            InputError::IncompleteSchedule { .. } => "INCOMPLETE_SCHEDULE",
            InputError::ExcessDays { .. } => "EXCESS_DAYS",
            InputError::DayOutOfRange { .. } => "DAY_OUT_OF_RANGE",
            InputError::DateOutsideMonth(_) => "DATE_OUTSIDE_MONTH",
            InputError::DuplicateRequest { .. } => "DUPLICATE_REQUEST",
            InputError::UnknownShiftCode(_) => "UNKNOWN_SHIFT_CODE",
        }
    }
}
