use std::collections::BTreeSet;

use proptest::prelude::*;
use roster_engine::roster::{StaffStatus, StaffRegistry};
use roster_engine::rules::LimitSetting;
use roster_engine::scoring::score;
use roster_engine::{
    ProfilePreset, RuleSet, RuleSetConfig, ScheduleDraft, ShiftCode, Staff, StaffId,
    ViolationKind,
};

const DAYS: usize = 30;

fn staff(raw_id: &str, max_consecutive_days: u8) -> Staff {
    Staff {
        id: StaffId::new(raw_id),
        name: format!("Nurse {raw_id}"),
        level: "N2".to_string(),
        eligible_shifts: ShiftCode::ordered().into_iter().collect::<BTreeSet<_>>(),
        group: "ward-a".to_string(),
        max_consecutive_days,
        package: None,
        email: None,
        contact_id: None,
        status: StaffStatus::Active,
    }
}

fn rules(enable_shift_order: bool) -> RuleSet {
    RuleSet::build(RuleSetConfig {
        monthly_off_days: 31,
        daily_pre_schedule_limit: LimitSetting::Count(100),
        holiday_pre_schedule_limit: 100,
        monthly_pre_schedule_limit: LimitSetting::Count(31),
        average_off_days: 8.0,
        package_min_days: 0,
        enable_package_rule: false,
        enable_shift_order,
        shift_order: ["FF", "night", "day", "evening", "DL"]
            .map(str::to_string)
            .to_vec(),
        enable_ff_no_night: false,
        holiday_limit_formula: "fixed".to_string(),
        off_count_to_limit: false,
        other_shift_count_to_limit: false,
        swap_count_to_stats: false,
        swap_open_days: 0,
        labor_standard_type: "four_week".to_string(),
        enable_labor_check: false,
    })
    .expect("rules valid")
}

fn single(member: Staff) -> StaffRegistry {
    StaffRegistry::from_staff(vec![member]).into_registry()
}

fn shift_code() -> impl Strategy<Value = ShiftCode> {
    prop::sample::select(ShiftCode::ordered().to_vec())
}

fn row() -> impl Strategy<Value = Vec<ShiftCode>> {
    prop::collection::vec(shift_code(), DAYS)
}

/// `worked` consecutive day shifts starting on the 1st, off for the rest.
fn streak_row(worked: usize) -> Vec<ShiftCode> {
    (0..DAYS)
        .map(|day| {
            if day < worked {
                ShiftCode::Day
            } else {
                ShiftCode::Off
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn disabled_shift_order_never_reports_transitions(codes in row()) {
        let registry = single(staff("a", 31));
        let mut draft = ScheduleDraft::new(2025, 9);
        draft.assign_row(&StaffId::new("a"), codes);
        let schedule = draft.build(&registry).expect("complete schedule");

        let result = roster_engine::validation::validate(&schedule, &rules(false), &registry)
            .expect("validates");

        prop_assert!(result.of_kind(ViolationKind::InvalidShiftTransition).next().is_none());
    }

    #[test]
    fn streak_at_the_limit_is_allowed_and_one_more_day_is_one_violation(max in 1u8..=29) {
        let registry = single(staff("a", max));
        let validate = |worked: usize| {
            let mut draft = ScheduleDraft::new(2025, 9);
            draft.assign_row(&StaffId::new("a"), streak_row(worked));
            let schedule = draft.build(&registry).expect("complete schedule");
            roster_engine::validation::validate(&schedule, &rules(true), &registry)
                .expect("validates")
        };

        let at_limit = validate(usize::from(max));
        prop_assert_eq!(at_limit.of_kind(ViolationKind::ExcessiveConsecutiveDays).count(), 0);

        let over = validate(usize::from(max) + 1);
        prop_assert_eq!(over.of_kind(ViolationKind::ExcessiveConsecutiveDays).count(), 1);
    }

    #[test]
    fn scores_are_reproducible_and_linear(first in row(), second in row()) {
        let registry = StaffRegistry::from_staff(vec![staff("a", 31), staff("b", 31)])
            .into_registry();
        let mut draft = ScheduleDraft::new(2025, 9);
        draft
            .assign_row(&StaffId::new("a"), first)
            .assign_row(&StaffId::new("b"), second);
        let schedule = draft.build(&registry).expect("complete schedule");
        let profile = ProfilePreset::A.profile();

        let once = score(&schedule, &registry, &profile).expect("scores");
        let again = score(&schedule, &registry, &profile).expect("scores");
        prop_assert_eq!(once.weighted.to_bits(), again.weighted.to_bits());

        let summed: f64 = once
            .components
            .iter()
            .map(|component| component.weight * component.metric)
            .sum();
        prop_assert!((once.weighted - summed).abs() < 1e-9);
    }
}
