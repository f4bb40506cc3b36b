use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::shift::ShiftCode;
use super::staff::{Staff, StaffId, StaffRegistry};
use crate::error::InputError;

/// A staff member's request, submitted during the pre-schedule window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreScheduleRequest {
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub shift: ShiftCode,
}

/// Mutable candidate as produced by an optimizer, before shape validation.
///
/// Roster rows are indexed by day of month (index 0 is the 1st); `None`
/// marks a cell the optimizer has not filled yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDraft {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub rosters: BTreeMap<StaffId, Vec<Option<ShiftCode>>>,
    #[serde(default)]
    pub requirements: BTreeMap<NaiveDate, BTreeMap<ShiftCode, u32>>,
    #[serde(default)]
    pub pre_schedule: Vec<PreScheduleRequest>,
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
}

impl ScheduleDraft {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            ..Self::default()
        }
    }

    /// Assign `code` on day-of-month `day` (1-based).
    pub fn assign(
        &mut self,
        staff_id: &StaffId,
        day: u32,
        code: ShiftCode,
    ) -> Result<&mut Self, InputError> {
        let days_in_month = days_in_month(self.year, self.month)?;
        if day == 0 || day > days_in_month {
            return Err(InputError::DayOutOfRange {
                staff_id: staff_id.clone(),
                day,
                days_in_month,
            });
        }
        let row = self.rosters.entry(staff_id.clone()).or_default();
        let index = (day - 1) as usize;
        if row.len() <= index {
            row.resize(index + 1, None);
        }
        row[index] = Some(code);
        Ok(self)
    }

    pub fn assign_token(
        &mut self,
        staff_id: &StaffId,
        day: u32,
        token: &str,
    ) -> Result<&mut Self, InputError> {
        let code = token.parse::<ShiftCode>()?;
        self.assign(staff_id, day, code)
    }

    /// Replace a staff member's whole row, starting on the 1st.
    pub fn assign_row<I>(&mut self, staff_id: &StaffId, codes: I) -> &mut Self
    where
        I: IntoIterator<Item = ShiftCode>,
    {
        self.rosters
            .insert(staff_id.clone(), codes.into_iter().map(Some).collect());
        self
    }

    pub fn require(&mut self, date: NaiveDate, shift: ShiftCode, count: u32) -> &mut Self {
        self.requirements
            .entry(date)
            .or_default()
            .insert(shift, count);
        self
    }

    pub fn request(&mut self, staff_id: &StaffId, date: NaiveDate, shift: ShiftCode) -> &mut Self {
        self.pre_schedule.push(PreScheduleRequest {
            staff_id: staff_id.clone(),
            date,
            shift,
        });
        self
    }

    pub fn holiday(&mut self, date: NaiveDate) -> &mut Self {
        self.holidays.insert(date);
        self
    }

    /// Check the draft is a total assignment over the registry's staff and days.
    pub fn build(&self, registry: &StaffRegistry) -> Result<ScheduleMonth, InputError> {
        let days = month_days(self.year, self.month)?;
        let in_month = |date: NaiveDate| date.year() == self.year && date.month() == self.month;

        let mut rosters = BTreeMap::new();
        for (staff_id, row) in &self.rosters {
            if !registry.contains(staff_id) {
                return Err(InputError::UnknownStaff(staff_id.clone()));
            }
            if row.len() > days.len() {
                return Err(InputError::ExcessDays {
                    staff_id: staff_id.clone(),
                    provided: row.len(),
                    expected: days.len(),
                });
            }

            let mut shifts = Vec::with_capacity(days.len());
            for (index, date) in days.iter().enumerate() {
                match row.get(index).copied().flatten() {
                    Some(code) => shifts.push(code),
                    None => {
                        return Err(InputError::IncompleteSchedule {
                            staff_id: staff_id.clone(),
                            date: *date,
                        })
                    }
                }
            }
            rosters.insert(staff_id.clone(), shifts);
        }

        if let Some(missing) = registry
            .active()
            .find(|member| !rosters.contains_key(&member.id))
        {
            return Err(InputError::IncompleteSchedule {
                staff_id: missing.id.clone(),
                date: days[0],
            });
        }

        if let Some(date) = self
            .requirements
            .keys()
            .chain(self.holidays.iter())
            .find(|date| !in_month(**date))
        {
            return Err(InputError::DateOutsideMonth(*date));
        }

        let mut pre_schedule: BTreeMap<StaffId, BTreeMap<NaiveDate, ShiftCode>> = BTreeMap::new();
        for request in &self.pre_schedule {
            if !registry.contains(&request.staff_id) {
                return Err(InputError::UnknownStaff(request.staff_id.clone()));
            }
            if !in_month(request.date) {
                return Err(InputError::DateOutsideMonth(request.date));
            }
            let requests = pre_schedule.entry(request.staff_id.clone()).or_default();
            if requests.insert(request.date, request.shift).is_some() {
                return Err(InputError::DuplicateRequest {
                    staff_id: request.staff_id.clone(),
                    date: request.date,
                });
            }
        }

        Ok(ScheduleMonth {
            year: self.year,
            month: self.month,
            days,
            rosters,
            requirements: self.requirements.clone(),
            pre_schedule,
            holidays: self.holidays.clone(),
        })
    }
}

/// A draft as it arrives in a JSON document, shift tokens still unresolved.
///
/// Converting into a [`ScheduleDraft`] reports the first unknown token as
/// [`InputError::UnknownShiftCode`] rather than as a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftDocument {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub rosters: BTreeMap<StaffId, Vec<Option<String>>>,
    #[serde(default)]
    pub requirements: BTreeMap<NaiveDate, BTreeMap<String, u32>>,
    #[serde(default)]
    pub pre_schedule: Vec<RequestDocument>,
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDocument {
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub shift: String,
}

impl DraftDocument {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl TryFrom<DraftDocument> for ScheduleDraft {
    type Error = InputError;

    fn try_from(document: DraftDocument) -> Result<Self, Self::Error> {
        let mut rosters = BTreeMap::new();
        for (staff_id, row) in document.rosters {
            let cells = row
                .into_iter()
                .map(|cell| cell.map(|token| token.parse::<ShiftCode>()).transpose())
                .collect::<Result<Vec<_>, _>>()?;
            rosters.insert(staff_id, cells);
        }

        let mut requirements = BTreeMap::new();
        for (date, by_shift) in document.requirements {
            let counts = by_shift
                .into_iter()
                .map(|(token, count)| -> Result<_, InputError> {
                    Ok((token.parse::<ShiftCode>()?, count))
                })
                .collect::<Result<BTreeMap<_, _>, InputError>>()?;
            requirements.insert(date, counts);
        }

        let pre_schedule = document
            .pre_schedule
            .into_iter()
            .map(|request| -> Result<_, InputError> {
                Ok(PreScheduleRequest {
                    shift: request.shift.parse::<ShiftCode>()?,
                    staff_id: request.staff_id,
                    date: request.date,
                })
            })
            .collect::<Result<Vec<_>, InputError>>()?;

        Ok(ScheduleDraft {
            year: document.year,
            month: document.month,
            rosters,
            requirements,
            pre_schedule,
            holidays: document.holidays,
        })
    }
}

/// A complete candidate roster for one calendar month. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleMonth {
    year: i32,
    month: u32,
    days: Vec<NaiveDate>,
    rosters: BTreeMap<StaffId, Vec<ShiftCode>>,
    requirements: BTreeMap<NaiveDate, BTreeMap<ShiftCode, u32>>,
    pre_schedule: BTreeMap<StaffId, BTreeMap<NaiveDate, ShiftCode>>,
    holidays: BTreeSet<NaiveDate>,
}

impl ScheduleMonth {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        self.days.binary_search(&date).ok()
    }

    /// Rows in staff-id order.
    pub fn rosters(&self) -> impl Iterator<Item = (&StaffId, &[ShiftCode])> {
        self.rosters
            .iter()
            .map(|(staff_id, shifts)| (staff_id, shifts.as_slice()))
    }

    pub fn shifts_for(&self, staff_id: &StaffId) -> Option<&[ShiftCode]> {
        self.rosters.get(staff_id).map(Vec::as_slice)
    }

    /// Pair every row with its capability record.
    pub fn staffed_rows<'a>(
        &'a self,
        registry: &'a StaffRegistry,
    ) -> Result<Vec<(&'a Staff, &'a [ShiftCode])>, InputError> {
        self.rosters()
            .map(|(staff_id, shifts)| {
                registry
                    .get(staff_id)
                    .map(|member| (member, shifts))
                    .ok_or_else(|| InputError::UnknownStaff(staff_id.clone()))
            })
            .collect()
    }

    pub fn staff_count(&self) -> usize {
        self.rosters.len()
    }

    pub fn requirements(&self) -> &BTreeMap<NaiveDate, BTreeMap<ShiftCode, u32>> {
        &self.requirements
    }

    /// Head count required on `date` across working codes.
    pub fn required_staff_on(&self, date: NaiveDate) -> u32 {
        self.requirements
            .get(&date)
            .map(|by_shift| {
                by_shift
                    .iter()
                    .filter(|(shift, _)| shift.is_worked())
                    .map(|(_, count)| *count)
                    .sum()
            })
            .unwrap_or(0)
    }

    pub fn requests_for(
        &self,
        staff_id: &StaffId,
    ) -> impl Iterator<Item = (NaiveDate, ShiftCode)> + '_ {
        self.pre_schedule
            .get(staff_id)
            .into_iter()
            .flat_map(|requests| requests.iter().map(|(date, shift)| (*date, *shift)))
    }

    /// Every request in staff-id, then date order.
    pub fn requests(&self) -> impl Iterator<Item = (&StaffId, NaiveDate, ShiftCode)> {
        self.pre_schedule.iter().flat_map(|(staff_id, requests)| {
            requests
                .iter()
                .map(move |(date, shift)| (staff_id, *date, *shift))
        })
    }

    pub fn request_count(&self) -> usize {
        self.pre_schedule.values().map(BTreeMap::len).sum()
    }

    /// Weekends are holidays in addition to the declared dates.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || self.holidays.contains(&date)
    }
}

/// Active staff among `rows` holding `shift` on `day_index`.
pub(crate) fn active_assigned_count(
    rows: &[(&Staff, &[ShiftCode])],
    day_index: usize,
    shift: ShiftCode,
) -> u32 {
    rows.iter()
        .filter(|(member, shifts)| member.is_active() && shifts.get(day_index) == Some(&shift))
        .count() as u32
}

fn days_in_month(year: i32, month: u32) -> Result<u32, InputError> {
    let first =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(InputError::InvalidMonth { year, month })?;
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .ok_or(InputError::InvalidMonth { year, month })?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}

pub fn month_days(year: i32, month: u32) -> Result<Vec<NaiveDate>, InputError> {
    let first =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(InputError::InvalidMonth { year, month })?;
    Ok(first
        .iter_days()
        .take_while(|date| date.month() == month)
        .collect())
}
