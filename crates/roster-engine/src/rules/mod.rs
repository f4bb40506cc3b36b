//! Hard-constraint configuration for one rostering session.

mod formula;
mod labor;

pub use formula::{
    dynamic_daily_limit, dynamic_monthly_limit, HolidayLimitFormula, PreScheduleContext,
};
pub use labor::{LaborCap, LaborStandard};

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::roster::shift::ShiftCode;

const DYNAMIC_MARKER: &str = "dynamic";

/// Limit value as written in configuration: a count or the `"dynamic"` marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LimitSetting {
    Count(i64),
    Marker(String),
}

/// Flat key/value rule configuration, before bounds are checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetConfig {
    pub monthly_off_days: i64,
    pub daily_pre_schedule_limit: LimitSetting,
    pub holiday_pre_schedule_limit: i64,
    pub monthly_pre_schedule_limit: LimitSetting,
    pub average_off_days: f64,
    pub package_min_days: i64,
    #[serde(default)]
    pub enable_package_rule: bool,
    #[serde(default)]
    pub enable_shift_order: bool,
    #[serde(default)]
    pub shift_order: Vec<String>,
    #[serde(default, rename = "enableFFNoNight")]
    pub enable_ff_no_night: bool,
    pub holiday_limit_formula: String,
    #[serde(default)]
    pub off_count_to_limit: bool,
    #[serde(default)]
    pub other_shift_count_to_limit: bool,
    #[serde(default)]
    pub swap_count_to_stats: bool,
    #[serde(default)]
    pub swap_open_days: i64,
    pub labor_standard_type: String,
    #[serde(default)]
    pub enable_labor_check: bool,
}

impl RuleSetConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

/// A resolved pre-schedule limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreScheduleLimit {
    Fixed(u32),
    Dynamic,
}

/// Validated, immutable rule set. Only constructible through [`RuleSet::build`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    monthly_off_days: u32,
    daily_pre_schedule_limit: PreScheduleLimit,
    holiday_pre_schedule_limit: u32,
    monthly_pre_schedule_limit: PreScheduleLimit,
    average_off_days: f64,
    package_min_days: u32,
    enable_package_rule: bool,
    enable_shift_order: bool,
    shift_order: Vec<ShiftCode>,
    enable_ff_no_night: bool,
    holiday_limit_formula: HolidayLimitFormula,
    off_count_to_limit: bool,
    other_shift_count_to_limit: bool,
    swap_count_to_stats: bool,
    swap_open_days: u32,
    labor_standard: LaborStandard,
    enable_labor_check: bool,
}

impl RuleSet {
    /// All-or-nothing: any out-of-bounds field rejects the whole configuration.
    pub fn build(config: RuleSetConfig) -> Result<Self, ConfigError> {
        let monthly_off_days = bounded("monthlyOffDays", config.monthly_off_days, 0, 31)?;
        let daily_pre_schedule_limit = resolve_limit(
            "dailyPreScheduleLimit",
            &config.daily_pre_schedule_limit,
            i64::from(u32::MAX),
        )?;
        let holiday_pre_schedule_limit = bounded(
            "holidayPreScheduleLimit",
            config.holiday_pre_schedule_limit,
            0,
            i64::from(u32::MAX),
        )?;
        let monthly_pre_schedule_limit = resolve_limit(
            "monthlyPreScheduleLimit",
            &config.monthly_pre_schedule_limit,
            31,
        )?;

        if !(0.0..=31.0).contains(&config.average_off_days) {
            return Err(ConfigError::OutOfRange {
                field: "averageOffDays",
                value: config.average_off_days,
                min: 0.0,
                max: 31.0,
            });
        }

        let package_min_days = bounded("packageMinDays", config.package_min_days, 0, 31)?;
        let swap_open_days = bounded("swapOpenDays", config.swap_open_days, 0, 30)?;

        let mut seen = BTreeSet::new();
        let mut shift_order = Vec::with_capacity(config.shift_order.len());
        for token in &config.shift_order {
            let code = token
                .parse::<ShiftCode>()
                .map_err(|err| ConfigError::UnknownShiftCode {
                    field: "shiftOrder",
                    value: err.0,
                })?;
            if !seen.insert(code) {
                return Err(ConfigError::DuplicateShiftOrderCode(code));
            }
            shift_order.push(code);
        }
        if config.enable_shift_order && shift_order.is_empty() {
            return Err(ConfigError::EmptyShiftOrder);
        }

        let holiday_limit_formula = config.holiday_limit_formula.parse::<HolidayLimitFormula>()?;
        let labor_standard = config.labor_standard_type.parse::<LaborStandard>()?;

        Ok(Self {
            monthly_off_days,
            daily_pre_schedule_limit,
            holiday_pre_schedule_limit,
            monthly_pre_schedule_limit,
            average_off_days: config.average_off_days,
            package_min_days,
            enable_package_rule: config.enable_package_rule,
            enable_shift_order: config.enable_shift_order,
            shift_order,
            enable_ff_no_night: config.enable_ff_no_night,
            holiday_limit_formula,
            off_count_to_limit: config.off_count_to_limit,
            other_shift_count_to_limit: config.other_shift_count_to_limit,
            swap_count_to_stats: config.swap_count_to_stats,
            swap_open_days,
            labor_standard,
            enable_labor_check: config.enable_labor_check,
        })
    }

    pub fn monthly_off_days(&self) -> u32 {
        self.monthly_off_days
    }

    pub fn daily_pre_schedule_limit(&self) -> PreScheduleLimit {
        self.daily_pre_schedule_limit
    }

    pub fn holiday_pre_schedule_limit(&self) -> u32 {
        self.holiday_pre_schedule_limit
    }

    pub fn monthly_pre_schedule_limit(&self) -> PreScheduleLimit {
        self.monthly_pre_schedule_limit
    }

    pub fn average_off_days(&self) -> f64 {
        self.average_off_days
    }

    pub fn package_min_days(&self) -> u32 {
        self.package_min_days
    }

    pub fn enable_package_rule(&self) -> bool {
        self.enable_package_rule
    }

    pub fn enable_shift_order(&self) -> bool {
        self.enable_shift_order
    }

    pub fn shift_order(&self) -> &[ShiftCode] {
        &self.shift_order
    }

    pub fn enable_ff_no_night(&self) -> bool {
        self.enable_ff_no_night
    }

    pub fn holiday_limit_formula(&self) -> HolidayLimitFormula {
        self.holiday_limit_formula
    }

    pub fn off_count_to_limit(&self) -> bool {
        self.off_count_to_limit
    }

    pub fn other_shift_count_to_limit(&self) -> bool {
        self.other_shift_count_to_limit
    }

    pub fn swap_count_to_stats(&self) -> bool {
        self.swap_count_to_stats
    }

    pub fn swap_open_days(&self) -> u32 {
        self.swap_open_days
    }

    pub fn labor_standard(&self) -> LaborStandard {
        self.labor_standard
    }

    pub fn enable_labor_check(&self) -> bool {
        self.enable_labor_check
    }

    /// Position of `code` in the declared shift order, if ranked at all.
    pub fn shift_rank(&self, code: ShiftCode) -> Option<usize> {
        self.shift_order.iter().position(|ranked| *ranked == code)
    }

    pub fn daily_limit(&self, total_staff: u32, required_staff: u32) -> u32 {
        match self.daily_pre_schedule_limit {
            PreScheduleLimit::Fixed(limit) => limit,
            PreScheduleLimit::Dynamic => dynamic_daily_limit(total_staff, required_staff),
        }
    }

    pub fn holiday_limit(&self, total_staff: u32, required_staff: u32) -> u32 {
        let context = PreScheduleContext {
            total_staff,
            required_staff,
            daily_limit: self.daily_limit(total_staff, required_staff),
            holiday_limit: self.holiday_pre_schedule_limit,
        };
        self.holiday_limit_formula.evaluate(&context)
    }

    pub fn monthly_limit(&self) -> u32 {
        match self.monthly_pre_schedule_limit {
            PreScheduleLimit::Fixed(limit) => limit,
            PreScheduleLimit::Dynamic => dynamic_monthly_limit(self.average_off_days),
        }
    }

    /// Whether a pre-schedule request for `code` is charged against the limits.
    pub fn counts_toward_limit(&self, code: ShiftCode) -> bool {
        if code.is_off() {
            self.off_count_to_limit
        } else {
            self.other_shift_count_to_limit
        }
    }
}

impl TryFrom<RuleSetConfig> for RuleSet {
    type Error = ConfigError;

    fn try_from(config: RuleSetConfig) -> Result<Self, Self::Error> {
        Self::build(config)
    }
}

fn bounded(field: &'static str, value: i64, min: i64, max: i64) -> Result<u32, ConfigError> {
    if (min..=max).contains(&value) {
        Ok(value as u32)
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        })
    }
}

fn resolve_limit(
    field: &'static str,
    setting: &LimitSetting,
    max: i64,
) -> Result<PreScheduleLimit, ConfigError> {
    match setting {
        LimitSetting::Count(value) => bounded(field, *value, 0, max).map(PreScheduleLimit::Fixed),
        LimitSetting::Marker(marker) if marker.trim().eq_ignore_ascii_case(DYNAMIC_MARKER) => {
            Ok(PreScheduleLimit::Dynamic)
        }
        LimitSetting::Marker(marker) => {
            if let Ok(value) = marker.trim().parse::<i64>() {
                return bounded(field, value, 0, max).map(PreScheduleLimit::Fixed);
            }
            Err(ConfigError::InvalidLimit {
                field,
                value: marker.clone(),
            })
        }
    }
}
