//! Hard-constraint validation of a candidate roster against a rule set.

mod checks;

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::InputError;
use crate::roster::{PackageType, ScheduleMonth, ShiftCode, StaffId, StaffRegistry};
use crate::rules::RuleSet;

/// Category of a rule breach. Variant order is the order checks run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    IneligibleShift,
    InvalidShiftTransition,
    NightFollowedByFf,
    ExcessiveConsecutiveDays,
    PackageMinNotMet,
    CoverageShortfall,
    OffQuotaExceeded,
    PreScheduleLimitExceeded,
    LaborLimitExceeded,
}

impl ViolationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ViolationKind::IneligibleShift => "INELIGIBLE_SHIFT",
            ViolationKind::InvalidShiftTransition => "INVALID_SHIFT_TRANSITION",
            ViolationKind::NightFollowedByFf => "NIGHT_FOLLOWED_BY_FF",
            ViolationKind::ExcessiveConsecutiveDays => "EXCESSIVE_CONSECUTIVE_DAYS",
            ViolationKind::PackageMinNotMet => "PACKAGE_MIN_NOT_MET",
            ViolationKind::CoverageShortfall => "COVERAGE_SHORTFALL",
            ViolationKind::OffQuotaExceeded => "OFF_QUOTA_EXCEEDED",
            ViolationKind::PreScheduleLimitExceeded => "PRE_SCHEDULE_LIMIT_EXCEEDED",
            ViolationKind::LaborLimitExceeded => "LABOR_LIMIT_EXCEEDED",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope a pre-schedule quota was evaluated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaScope {
    Monthly,
    Daily,
    Holiday,
}

/// Magnitudes behind a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ViolationDetail {
    Ineligible {
        shift: ShiftCode,
    },
    Transition {
        from: ShiftCode,
        to: ShiftCode,
    },
    #[serde(rename_all = "camelCase")]
    Streak {
        streak: u32,
        max_consecutive_days: u32,
    },
    #[serde(rename_all = "camelCase")]
    PackageMinimum {
        package_type: PackageType,
        worked_days: u32,
        required_days: u32,
    },
    Coverage {
        shift: ShiftCode,
        required: u32,
        assigned: u32,
        deficit: u32,
    },
    #[serde(rename_all = "camelCase")]
    OffQuota {
        off_days: u32,
        monthly_off_days: u32,
        allowance: u32,
    },
    PreScheduleQuota {
        scope: QuotaScope,
        counted: u32,
        limit: u32,
    },
    #[serde(rename_all = "camelCase")]
    LaborWindow {
        window_start: NaiveDate,
        window_end: NaiveDate,
        hours: u32,
        max_hours: u32,
        worked_days: u32,
        max_worked_days: u32,
    },
}

/// A recorded rule breach. Never blocks scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub kind: ViolationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<StaffId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub detail: ViolationDetail,
}

impl Violation {
    fn sort_key(&self) -> (ViolationKind, Option<&StaffId>, Option<NaiveDate>) {
        (self.kind, self.staff_id.as_ref(), self.date)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(staff_id) = &self.staff_id {
            write!(f, " staff={staff_id}")?;
        }
        if let Some(date) = &self.date {
            write!(f, " date={date}")?;
        }
        Ok(())
    }
}

/// Every violation found, ordered by check, staff id, then date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |violation| violation.kind == kind)
    }

    pub fn count_by_kind(&self) -> BTreeMap<ViolationKind, usize> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

/// Checks candidate rosters against one rule set.
#[derive(Debug, Clone)]
pub struct ConstraintValidator {
    rules: RuleSet,
}

impl ConstraintValidator {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn validate(
        &self,
        schedule: &ScheduleMonth,
        registry: &StaffRegistry,
    ) -> Result<ValidationResult, InputError> {
        validate(schedule, &self.rules, registry)
    }
}

/// Run every check; none short-circuits another.
pub fn validate(
    schedule: &ScheduleMonth,
    rules: &RuleSet,
    registry: &StaffRegistry,
) -> Result<ValidationResult, InputError> {
    let rows = schedule.staffed_rows(registry)?;
    let days = schedule.days();

    let mut violations = Vec::new();
    checks::capability(&rows, days, &mut violations);
    if rules.enable_shift_order() {
        checks::shift_order(&rows, days, rules, &mut violations);
    }
    if rules.enable_ff_no_night() {
        checks::night_followed_by_ff(&rows, days, &mut violations);
    }
    checks::consecutive_days(&rows, days, &mut violations);
    if rules.enable_package_rule() {
        checks::package_minimum(&rows, rules, &mut violations);
    }
    checks::coverage(schedule, &rows, &mut violations);
    checks::off_quota(schedule, &rows, rules, &mut violations);
    checks::pre_schedule_quota(schedule, &rows, rules, &mut violations);
    if rules.enable_labor_check() {
        checks::labor_standard(&rows, days, rules, &mut violations);
    }

    violations.sort_by(|left, right| left.sort_key().cmp(&right.sort_key()));

    Ok(ValidationResult { violations })
}
