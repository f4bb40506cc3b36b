use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::shift::{PackageType, ShiftCode};

/// Employee identifier; unique within a registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(pub String);

impl StaffId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    Active,
    Inactive,
    OnLeave,
}

impl StaffStatus {
    pub const fn label(self) -> &'static str {
        match self {
            StaffStatus::Active => "active",
            StaffStatus::Inactive => "inactive",
            StaffStatus::OnLeave => "on_leave",
        }
    }
}

impl FromStr for StaffStatus {
    type Err = RecordFieldError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "on_leave" | "on leave" | "leave" => Ok(Self::OnLeave),
            "" => Err(RecordFieldError::MissingField("status")),
            _ => Err(RecordFieldError::UnknownStatus(raw.trim().to_string())),
        }
    }
}

pub const MAX_CONSECUTIVE_DAYS_LIMIT: u8 = 31;

/// Capability record for a single member of staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    pub level: String,
    pub eligible_shifts: BTreeSet<ShiftCode>,
    pub group: String,
    pub max_consecutive_days: u8,
    /// Present exactly when the staff member holds a package contract.
    pub package: Option<PackageType>,
    pub email: Option<String>,
    pub contact_id: Option<String>,
    pub status: StaffStatus,
}

impl Staff {
    pub fn is_package(&self) -> bool {
        self.package.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.status == StaffStatus::Active
    }

    pub fn can_work(&self, code: ShiftCode) -> bool {
        code.is_off() || self.eligible_shifts.contains(&code)
    }

    /// Structural checks shared by the import and typed construction paths.
    pub fn validate(&self) -> Vec<RecordFieldError> {
        let mut errors = Vec::new();

        if self.id.0.trim().is_empty() {
            errors.push(RecordFieldError::MissingField("employeeId"));
        }
        if self.name.trim().is_empty() {
            errors.push(RecordFieldError::MissingField("name"));
        }
        if self.group.trim().is_empty() {
            errors.push(RecordFieldError::MissingField("group"));
        }
        if self.eligible_shifts.is_empty() {
            errors.push(RecordFieldError::MissingField("eligibleShifts"));
        }
        if self.max_consecutive_days == 0 || self.max_consecutive_days > MAX_CONSECUTIVE_DAYS_LIMIT
        {
            errors.push(RecordFieldError::InvalidMaxConsecutiveDays(
                self.max_consecutive_days.to_string(),
            ));
        }
        if let Some(email) = &self.email {
            if !is_plausible_email(email) {
                errors.push(RecordFieldError::InvalidEmail(email.clone()));
            }
        }

        errors
    }

    /// Parse and validate a flat import record.
    pub fn from_record(record: &StaffRecord) -> Result<Self, Vec<RecordFieldError>> {
        let mut errors = Vec::new();

        let mut eligible_shifts = BTreeSet::new();
        for token in record
            .eligible_shifts
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
        {
            match token.parse::<ShiftCode>() {
                Ok(code) => {
                    eligible_shifts.insert(code);
                }
                Err(err) => errors.push(RecordFieldError::UnknownShiftCode(err.0)),
            }
        }

        let mut days_reported = false;
        let max_consecutive_days = match record.max_consecutive_days.trim() {
            "" => {
                errors.push(RecordFieldError::MissingField("maxConsecutiveDays"));
                days_reported = true;
                0
            }
            raw => raw.parse::<u8>().unwrap_or_else(|_| {
                errors.push(RecordFieldError::InvalidMaxConsecutiveDays(raw.to_string()));
                days_reported = true;
                0
            }),
        };

        let is_package = match parse_flag(&record.is_package) {
            Some(flag) => flag,
            None => {
                errors.push(RecordFieldError::InvalidBoolean {
                    field: "isPackage",
                    value: record.is_package.trim().to_string(),
                });
                false
            }
        };

        let package_token = record.package_type.trim();
        let package = match (is_package, package_token.is_empty()) {
            (true, true) => {
                errors.push(RecordFieldError::PackageTypeRequired);
                None
            }
            (false, false) => {
                errors.push(RecordFieldError::PackageTypeWithoutPackage(
                    package_token.to_string(),
                ));
                None
            }
            (true, false) => match package_token.parse::<PackageType>() {
                Ok(package) => Some(package),
                Err(err) => {
                    errors.push(RecordFieldError::UnknownPackageType(err.0));
                    None
                }
            },
            (false, true) => None,
        };

        let status = match record.status.parse::<StaffStatus>() {
            Ok(status) => Some(status),
            Err(err) => {
                errors.push(err);
                None
            }
        };

        let staff = Staff {
            id: StaffId(record.employee_id.trim().to_string()),
            name: record.name.trim().to_string(),
            level: record.level.trim().to_string(),
            eligible_shifts,
            group: record.group.trim().to_string(),
            max_consecutive_days,
            package,
            email: non_empty(&record.email),
            contact_id: non_empty(&record.contact_id),
            status: status.unwrap_or(StaffStatus::Inactive),
        };

        for error in staff.validate() {
            let already_reported = days_reported
                && matches!(error, RecordFieldError::InvalidMaxConsecutiveDays(_));
            if !already_reported && !errors.contains(&error) {
                errors.push(error);
            }
        }

        if errors.is_empty() {
            Ok(staff)
        } else {
            Err(errors)
        }
    }

    /// Flatten into the export representation, field order matching the import.
    pub fn to_record(&self) -> StaffRecord {
        StaffRecord {
            employee_id: self.id.0.clone(),
            name: self.name.clone(),
            level: self.level.clone(),
            eligible_shifts: self
                .eligible_shifts
                .iter()
                .map(|code| code.as_str())
                .collect::<Vec<_>>()
                .join(","),
            group: self.group.clone(),
            max_consecutive_days: self.max_consecutive_days.to_string(),
            is_package: self.is_package().to_string(),
            package_type: self
                .package
                .map(|package| package.as_str().to_string())
                .unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            contact_id: self.contact_id.clone().unwrap_or_default(),
            status: self.status.label().to_string(),
        }
    }
}

/// Flat staff record as exchanged with spreadsheets and the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecord {
    pub employee_id: String,
    pub name: String,
    #[serde(default)]
    pub level: String,
    pub eligible_shifts: String,
    pub group: String,
    pub max_consecutive_days: String,
    #[serde(default)]
    pub is_package: String,
    #[serde(default)]
    pub package_type: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact_id: String,
    #[serde(default)]
    pub status: String,
}

/// Reason a single field of a staff record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", content = "value", rename_all = "snake_case")]
pub enum RecordFieldError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("maxConsecutiveDays must be between 1 and 31 (found '{0}')")]
    InvalidMaxConsecutiveDays(String),
    #[error("{0}")]
    UnknownShiftCode(String),
    #[error("{field} is not a recognised boolean ('{value}')")]
    InvalidBoolean { field: &'static str, value: String },
    #[error("packageType is required for package staff")]
    PackageTypeRequired,
    #[error("packageType '{0}' given for non-package staff")]
    PackageTypeWithoutPackage(String),
    #[error("unknown package type '{0}'")]
    UnknownPackageType(String),
    #[error("email '{0}' is not a valid address")]
    InvalidEmail(String),
    #[error("unknown status '{0}'")]
    UnknownStatus(String),
    #[error("employeeId '{0}' appears more than once")]
    DuplicateEmployeeId(String),
}

/// A rejected record, kept alongside the registry for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordError {
    /// 1-based position of the record in its source.
    pub row: usize,
    pub employee_id: String,
    pub errors: Vec<RecordFieldError>,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reasons = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(
            f,
            "record {} ({}) rejected: {}",
            self.row, self.employee_id, reasons
        )
    }
}

/// Immutable lookup of staff capability records for one evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct StaffRegistry {
    staff: Vec<Staff>,
    index: HashMap<StaffId, usize>,
}

/// Outcome of registry construction: the accepted staff plus every rejection.
#[derive(Debug, Clone)]
pub struct RegistryBuild {
    pub registry: StaffRegistry,
    pub rejected: Vec<RecordError>,
}

impl RegistryBuild {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn into_registry(self) -> StaffRegistry {
        self.registry
    }
}

impl StaffRegistry {
    /// Validate each record independently; invalid ones are reported, not fatal.
    pub fn build<I>(records: I) -> RegistryBuild
    where
        I: IntoIterator<Item = StaffRecord>,
    {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for (position, record) in records.into_iter().enumerate() {
            match Staff::from_record(&record) {
                Ok(staff) => accepted.push((position + 1, staff)),
                Err(errors) => rejected.push(RecordError {
                    row: position + 1,
                    employee_id: record.employee_id.trim().to_string(),
                    errors,
                }),
            }
        }

        Self::assemble(accepted, rejected)
    }

    /// Same checks as [`StaffRegistry::build`] for already-typed values.
    pub fn from_staff<I>(staff: I) -> RegistryBuild
    where
        I: IntoIterator<Item = Staff>,
    {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for (position, member) in staff.into_iter().enumerate() {
            let errors = member.validate();
            if errors.is_empty() {
                accepted.push((position + 1, member));
            } else {
                rejected.push(RecordError {
                    row: position + 1,
                    employee_id: member.id.0.clone(),
                    errors,
                });
            }
        }

        Self::assemble(accepted, rejected)
    }

    fn assemble(accepted: Vec<(usize, Staff)>, mut rejected: Vec<RecordError>) -> RegistryBuild {
        let mut registry = StaffRegistry::default();

        for (row, member) in accepted {
            if registry.index.contains_key(&member.id) {
                rejected.push(RecordError {
                    row,
                    employee_id: member.id.0.clone(),
                    errors: vec![RecordFieldError::DuplicateEmployeeId(member.id.0.clone())],
                });
                continue;
            }
            registry.index.insert(member.id.clone(), registry.staff.len());
            registry.staff.push(member);
        }

        rejected.sort_by_key(|error| error.row);
        for error in &rejected {
            tracing::warn!(row = error.row, employee_id = %error.employee_id, "{error}");
        }

        RegistryBuild { registry, rejected }
    }

    pub fn get(&self, id: &StaffId) -> Option<&Staff> {
        self.index.get(id).map(|position| &self.staff[*position])
    }

    pub fn contains(&self, id: &StaffId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Staff> {
        self.staff.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &Staff> {
        self.staff.iter().filter(|member| member.is_active())
    }

    pub fn len(&self) -> usize {
        self.staff.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staff.is_empty()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Some(false),
        "true" | "yes" | "y" | "1" => Some(true),
        _ => None,
    }
}

fn is_plausible_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
            .unwrap_or(false)
}
