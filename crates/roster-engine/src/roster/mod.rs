//! Staff capability records, shift codes, and the monthly candidate roster.

pub mod import;
pub mod schedule;
pub mod shift;
pub mod staff;

pub use import::{export_registry, StaffCsvImporter, StaffImportError};
pub use schedule::{DraftDocument, PreScheduleRequest, RequestDocument, ScheduleDraft, ScheduleMonth};
pub use shift::{PackageType, ShiftClass, ShiftCode};
pub use staff::{
    RecordError, RecordFieldError, RegistryBuild, Staff, StaffId, StaffRecord, StaffRegistry,
    StaffStatus,
};
