use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::roster::{
    PackageType, ScheduleDraft, ScheduleMonth, ShiftCode, Staff, StaffId, StaffRegistry,
    StaffStatus,
};
use crate::rules::{LimitSetting, RuleSet, RuleSetConfig};

pub(super) const YEAR: i32 = 2025;
/// September 2025: 30 days, the 1st is a Monday.
pub(super) const MONTH: u32 = 9;
pub(super) const DAYS: usize = 30;

pub(super) fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(YEAR, MONTH, day).expect("valid date")
}

pub(super) fn id(raw: &str) -> StaffId {
    StaffId::new(raw)
}

pub(super) fn nurse(raw_id: &str) -> Staff {
    Staff {
        id: id(raw_id),
        name: format!("Nurse {raw_id}"),
        level: "N2".to_string(),
        eligible_shifts: ShiftCode::ordered().into_iter().collect::<BTreeSet<_>>(),
        group: "ward-a".to_string(),
        max_consecutive_days: 6,
        package: None,
        email: None,
        contact_id: None,
        status: StaffStatus::Active,
    }
}

pub(super) fn package_nurse(raw_id: &str, package: PackageType) -> Staff {
    Staff {
        package: Some(package),
        ..nurse(raw_id)
    }
}

pub(super) fn registry(staff: Vec<Staff>) -> StaffRegistry {
    let build = StaffRegistry::from_staff(staff);
    assert!(build.is_clean(), "fixture staff rejected: {:?}", build.rejected);
    build.into_registry()
}

/// Every rule switched off and every quota generous.
pub(super) fn permissive_config() -> RuleSetConfig {
    RuleSetConfig {
        monthly_off_days: 31,
        daily_pre_schedule_limit: LimitSetting::Count(100),
        holiday_pre_schedule_limit: 100,
        monthly_pre_schedule_limit: LimitSetting::Count(31),
        average_off_days: 8.0,
        package_min_days: 0,
        enable_package_rule: false,
        enable_shift_order: false,
        shift_order: Vec::new(),
        enable_ff_no_night: false,
        holiday_limit_formula: "fixed".to_string(),
        off_count_to_limit: false,
        other_shift_count_to_limit: false,
        swap_count_to_stats: false,
        swap_open_days: 0,
        labor_standard_type: "four_week".to_string(),
        enable_labor_check: false,
    }
}

pub(super) fn rules(configure: impl FnOnce(&mut RuleSetConfig)) -> RuleSet {
    let mut config = permissive_config();
    configure(&mut config);
    RuleSet::build(config).expect("fixture rules valid")
}

pub(super) fn shift_order() -> Vec<String> {
    ["FF", "night", "day", "evening", "DL"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Five days on, two off, repeated, shifted by `offset` days.
pub(super) fn rotating_row(offset: usize) -> Vec<ShiftCode> {
    (0..DAYS)
        .map(|day| {
            if (day + offset) % 7 < 5 {
                ShiftCode::Day
            } else {
                ShiftCode::Off
            }
        })
        .collect()
}

/// Every staff member on the same rotation.
pub(super) fn draft_for(registry: &StaffRegistry) -> ScheduleDraft {
    let mut draft = ScheduleDraft::new(YEAR, MONTH);
    for member in registry.iter() {
        draft.assign_row(&member.id, rotating_row(0));
    }
    draft
}

pub(super) fn schedule(draft: &ScheduleDraft, registry: &StaffRegistry) -> ScheduleMonth {
    draft.build(registry).expect("fixture schedule valid")
}

/// Fill `days` (1-based) with `code`, everything else off.
pub(super) fn row_with(code: ShiftCode, days: impl IntoIterator<Item = u32>) -> Vec<ShiftCode> {
    let mut row = vec![ShiftCode::Off; DAYS];
    for day in days {
        row[(day - 1) as usize] = code;
    }
    row
}
