use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{QuotaScope, Violation, ViolationDetail, ViolationKind};
use crate::roster::schedule::active_assigned_count;
use crate::roster::{ScheduleMonth, ShiftCode, Staff};
use crate::rules::RuleSet;

pub(super) type Row<'a> = (&'a Staff, &'a [ShiftCode]);

pub(super) fn capability(rows: &[Row<'_>], days: &[NaiveDate], out: &mut Vec<Violation>) {
    for (member, shifts) in rows {
        for (date, code) in days.iter().zip(shifts.iter()) {
            if !member.can_work(*code) {
                out.push(Violation {
                    kind: ViolationKind::IneligibleShift,
                    staff_id: Some(member.id.clone()),
                    date: Some(*date),
                    detail: ViolationDetail::Ineligible { shift: *code },
                });
            }
        }
    }
}

/// A move to a lower-ranked code is illegal; unranked codes are unconstrained.
pub(super) fn shift_order(
    rows: &[Row<'_>],
    days: &[NaiveDate],
    rules: &RuleSet,
    out: &mut Vec<Violation>,
) {
    for (member, shifts) in rows {
        for (offset, pair) in shifts.windows(2).enumerate() {
            let (previous, next) = (pair[0], pair[1]);
            let (Some(from_rank), Some(to_rank)) =
                (rules.shift_rank(previous), rules.shift_rank(next))
            else {
                continue;
            };
            if to_rank < from_rank {
                out.push(Violation {
                    kind: ViolationKind::InvalidShiftTransition,
                    staff_id: Some(member.id.clone()),
                    date: days.get(offset + 1).copied(),
                    detail: ViolationDetail::Transition {
                        from: previous,
                        to: next,
                    },
                });
            }
        }
    }
}

pub(super) fn night_followed_by_ff(
    rows: &[Row<'_>],
    days: &[NaiveDate],
    out: &mut Vec<Violation>,
) {
    for (member, shifts) in rows {
        for (offset, pair) in shifts.windows(2).enumerate() {
            if pair[0] == ShiftCode::Night && pair[1] == ShiftCode::Ff {
                out.push(Violation {
                    kind: ViolationKind::NightFollowedByFf,
                    staff_id: Some(member.id.clone()),
                    date: days.get(offset + 1).copied(),
                    detail: ViolationDetail::Transition {
                        from: ShiftCode::Night,
                        to: ShiftCode::Ff,
                    },
                });
            }
        }
    }
}

pub(super) fn consecutive_days(rows: &[Row<'_>], days: &[NaiveDate], out: &mut Vec<Violation>) {
    for (member, shifts) in rows {
        let max = u32::from(member.max_consecutive_days);
        let mut streak = 0u32;
        for (date, code) in days.iter().zip(shifts.iter()) {
            if code.is_off() {
                streak = 0;
                continue;
            }
            streak += 1;
            if streak > max {
                out.push(Violation {
                    kind: ViolationKind::ExcessiveConsecutiveDays,
                    staff_id: Some(member.id.clone()),
                    date: Some(*date),
                    detail: ViolationDetail::Streak {
                        streak,
                        max_consecutive_days: max,
                    },
                });
            }
        }
    }
}

pub(super) fn package_minimum(rows: &[Row<'_>], rules: &RuleSet, out: &mut Vec<Violation>) {
    let required_days = rules.package_min_days();
    for (member, shifts) in rows {
        let Some(package_type) = member.package else {
            continue;
        };
        if !member.is_active() {
            continue;
        }
        let worked_days = shifts
            .iter()
            .filter(|code| package_type.covers(**code))
            .count() as u32;
        if worked_days < required_days {
            out.push(Violation {
                kind: ViolationKind::PackageMinNotMet,
                staff_id: Some(member.id.clone()),
                date: None,
                detail: ViolationDetail::PackageMinimum {
                    package_type,
                    worked_days,
                    required_days,
                },
            });
        }
    }
}

/// Only active staff count toward a requirement.
pub(super) fn coverage(schedule: &ScheduleMonth, rows: &[Row<'_>], out: &mut Vec<Violation>) {
    for (date, by_shift) in schedule.requirements() {
        let Some(index) = schedule.day_index(*date) else {
            continue;
        };
        for (shift, required) in by_shift {
            let assigned = active_assigned_count(rows, index, *shift);
            if assigned < *required {
                out.push(Violation {
                    kind: ViolationKind::CoverageShortfall,
                    staff_id: None,
                    date: Some(*date),
                    detail: ViolationDetail::Coverage {
                        shift: *shift,
                        required: *required,
                        assigned,
                        deficit: required - assigned,
                    },
                });
            }
        }
    }
}

/// Off days beyond the monthly quota plus pre-approved off requests.
pub(super) fn off_quota(
    schedule: &ScheduleMonth,
    rows: &[Row<'_>],
    rules: &RuleSet,
    out: &mut Vec<Violation>,
) {
    let monthly_off_days = rules.monthly_off_days();
    for (member, shifts) in rows {
        if !member.is_active() {
            continue;
        }
        let off_days = shifts.iter().filter(|code| code.is_off()).count() as u32;
        let requested = schedule
            .requests_for(&member.id)
            .filter(|(_, shift)| shift.is_off())
            .count() as u32;
        let allowance = if rules.off_count_to_limit() {
            requested.min(rules.monthly_limit())
        } else {
            requested
        };
        if off_days > monthly_off_days + allowance {
            out.push(Violation {
                kind: ViolationKind::OffQuotaExceeded,
                staff_id: Some(member.id.clone()),
                date: None,
                detail: ViolationDetail::OffQuota {
                    off_days,
                    monthly_off_days,
                    allowance,
                },
            });
        }
    }
}

/// Counted requests per staff against the monthly limit, and per date against
/// the daily or holiday limit. Dynamic limits size the ward by its active staff.
pub(super) fn pre_schedule_quota(
    schedule: &ScheduleMonth,
    rows: &[Row<'_>],
    rules: &RuleSet,
    out: &mut Vec<Violation>,
) {
    let monthly_limit = rules.monthly_limit();
    let mut per_staff: BTreeMap<_, u32> = BTreeMap::new();
    let mut per_date: BTreeMap<NaiveDate, u32> = BTreeMap::new();

    for (staff_id, date, shift) in schedule.requests() {
        if !rules.counts_toward_limit(shift) {
            continue;
        }
        *per_staff.entry(staff_id).or_default() += 1;
        *per_date.entry(date).or_default() += 1;
    }

    for (staff_id, counted) in per_staff {
        if counted > monthly_limit {
            out.push(Violation {
                kind: ViolationKind::PreScheduleLimitExceeded,
                staff_id: Some(staff_id.clone()),
                date: None,
                detail: ViolationDetail::PreScheduleQuota {
                    scope: QuotaScope::Monthly,
                    counted,
                    limit: monthly_limit,
                },
            });
        }
    }

    let total_staff = rows.iter().filter(|(member, _)| member.is_active()).count() as u32;
    for (date, counted) in per_date {
        let required_staff = schedule.required_staff_on(date);
        let (scope, limit) = if schedule.is_holiday(date) {
            (
                QuotaScope::Holiday,
                rules.holiday_limit(total_staff, required_staff),
            )
        } else {
            (
                QuotaScope::Daily,
                rules.daily_limit(total_staff, required_staff),
            )
        };
        if counted > limit {
            out.push(Violation {
                kind: ViolationKind::PreScheduleLimitExceeded,
                staff_id: None,
                date: Some(date),
                detail: ViolationDetail::PreScheduleQuota {
                    scope,
                    counted,
                    limit,
                },
            });
        }
    }
}

/// Rolling windows; once a window breaches, the scan resumes after it.
pub(super) fn labor_standard(
    rows: &[Row<'_>],
    days: &[NaiveDate],
    rules: &RuleSet,
    out: &mut Vec<Violation>,
) {
    let cap = rules.labor_standard().cap().fitted_to(days.len());
    if cap.window_days == 0 {
        return;
    }

    for (member, shifts) in rows {
        if !member.is_active() {
            continue;
        }
        let mut start = 0;
        while start + cap.window_days <= shifts.len() {
            let window = &shifts[start..start + cap.window_days];
            let hours: u32 = window.iter().map(|code| code.standard_hours()).sum();
            let worked_days = window.iter().filter(|code| code.is_worked()).count();

            if hours <= cap.max_hours && worked_days <= cap.max_worked_days {
                start += 1;
                continue;
            }

            out.push(Violation {
                kind: ViolationKind::LaborLimitExceeded,
                staff_id: Some(member.id.clone()),
                date: Some(days[start]),
                detail: ViolationDetail::LaborWindow {
                    window_start: days[start],
                    window_end: days[start + cap.window_days - 1],
                    hours,
                    max_hours: cap.max_hours,
                    worked_days: worked_days as u32,
                    max_worked_days: cap.max_worked_days as u32,
                },
            });
            start += cap.window_days;
        }
    }
}
