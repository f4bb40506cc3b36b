use std::collections::BTreeMap;

use serde::Serialize;

use super::TermKey;
use crate::error::InputError;
use crate::roster::schedule::active_assigned_count;
use crate::roster::{ScheduleMonth, ShiftClass, ShiftCode, Staff, StaffRegistry};

/// Raw, unweighted value of every term for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricVector(BTreeMap<TermKey, f64>);

impl MetricVector {
    pub fn get(&self, term: TermKey) -> f64 {
        self.0.get(&term).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermKey, f64)> + '_ {
        self.0.iter().map(|(term, value)| (*term, *value))
    }
}

/// Compute all six metrics. Reductions run sequentially in staff-id order.
pub fn compute_metrics(
    schedule: &ScheduleMonth,
    registry: &StaffRegistry,
) -> Result<MetricVector, InputError> {
    let rows = schedule.staffed_rows(registry)?;

    let mut worked_counts = Vec::new();
    let mut off_counts = Vec::new();
    let mut excess_days = 0u32;
    let mut night_to_day = 0u32;

    for (member, shifts) in &rows {
        if member.is_active() {
            let off = shifts.iter().filter(|code| code.is_off()).count();
            off_counts.push(off as f64);
            worked_counts.push((shifts.len() - off) as f64);
        }
        excess_days += days_over_limit(shifts, u32::from(member.max_consecutive_days));
        night_to_day += night_to_day_transitions(shifts);
    }

    let mut values = BTreeMap::new();
    values.insert(TermKey::Overwork, population_std_dev(&worked_counts));
    values.insert(TermKey::ShiftBalance, population_std_dev(&off_counts));
    values.insert(TermKey::Pref, preference_ratio(schedule));
    values.insert(TermKey::Cons, f64::from(excess_days));
    values.insert(TermKey::NightToDay, f64::from(night_to_day));
    values.insert(TermKey::Coverage, coverage_ratio(schedule, &rows));

    Ok(MetricVector(values))
}

pub(crate) fn population_std_dev(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let count = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / count;
    let variance = samples
        .iter()
        .map(|sample| (sample - mean).powi(2))
        .sum::<f64>()
        / count;
    variance.sqrt()
}

/// Days on which the running worked streak is longer than `max`.
pub(crate) fn days_over_limit(shifts: &[ShiftCode], max: u32) -> u32 {
    let mut streak = 0u32;
    let mut over = 0u32;
    for code in shifts {
        if code.is_worked() {
            streak += 1;
            if streak > max {
                over += 1;
            }
        } else {
            streak = 0;
        }
    }
    over
}

fn night_to_day_transitions(shifts: &[ShiftCode]) -> u32 {
    shifts
        .windows(2)
        .filter(|pair| pair[0] == ShiftCode::Night && pair[1].class() == ShiftClass::Day)
        .count() as u32
}

fn preference_ratio(schedule: &ScheduleMonth) -> f64 {
    let total = schedule.request_count();
    if total == 0 {
        return 0.0;
    }

    let matched = schedule
        .requests()
        .filter(|(staff_id, date, shift)| {
            let assigned = schedule
                .day_index(*date)
                .zip(schedule.shifts_for(staff_id))
                .and_then(|(index, shifts)| shifts.get(index));
            assigned == Some(shift)
        })
        .count();

    matched as f64 / total as f64
}

fn coverage_ratio(schedule: &ScheduleMonth, rows: &[(&Staff, &[ShiftCode])]) -> f64 {
    let mut slots = 0usize;
    let mut met = 0usize;

    for (date, by_shift) in schedule.requirements() {
        let Some(index) = schedule.day_index(*date) else {
            continue;
        };
        for (shift, required) in by_shift {
            slots += 1;
            if active_assigned_count(rows, index, *shift) >= *required {
                met += 1;
            }
        }
    }

    if slots == 0 {
        1.0
    } else {
        met as f64 / slots as f64
    }
}
