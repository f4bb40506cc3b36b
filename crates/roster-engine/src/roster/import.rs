use std::io::{Read, Write};
use std::path::Path;

use super::staff::{RegistryBuild, Staff, StaffRecord, StaffRegistry};

#[derive(Debug)]
pub enum StaffImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for StaffImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaffImportError::Io(err) => write!(f, "failed to read staff export: {}", err),
            StaffImportError::Csv(err) => write!(f, "invalid staff CSV data: {}", err),
        }
    }
}

impl std::error::Error for StaffImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StaffImportError::Io(err) => Some(err),
            StaffImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StaffImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for StaffImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a staff registry from the flat CSV export format.
pub struct StaffCsvImporter;

impl StaffCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RegistryBuild, StaffImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<RegistryBuild, StaffImportError> {
        let records = parse_records(reader)?;
        Ok(StaffRegistry::build(records))
    }
}

pub fn parse_records<R: Read>(reader: R) -> Result<Vec<StaffRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<StaffRecord>().collect()
}

/// Write staff in import order; the header row uses the import field names.
pub fn write_records<'a, W, I>(writer: W, staff: I) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a Staff>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for member in staff {
        csv_writer.serialize(member.to_record())?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_registry(registry: &StaffRegistry) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, registry.iter())?;
    String::from_utf8(buffer).map_err(|err| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}
