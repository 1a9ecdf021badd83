//! Seed applicants from a CSV export of the applicant table.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::trainers::applicants::domain::ApplicantRecord;

#[derive(Debug)]
pub enum ApplicantImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidTimestamp { id: String, value: String },
}

impl std::fmt::Display for ApplicantImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicantImportError::Io(err) => write!(f, "failed to read applicant export: {}", err),
            ApplicantImportError::Csv(err) => write!(f, "invalid applicant CSV data: {}", err),
            ApplicantImportError::InvalidTimestamp { id, value } => write!(
                f,
                "applicant {} has an unreadable created_at value '{}'",
                id, value
            ),
        }
    }
}

impl std::error::Error for ApplicantImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApplicantImportError::Io(err) => Some(err),
            ApplicantImportError::Csv(err) => Some(err),
            ApplicantImportError::InvalidTimestamp { .. } => None,
        }
    }
}

impl From<std::io::Error> for ApplicantImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ApplicantImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct ApplicantCsvImporter;

impl ApplicantCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<ApplicantRecord>, ApplicantImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Records sorted newest first, matching the backend's fetch order.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ApplicantRecord>, ApplicantImportError> {
        let mut records = parser::parse_records(reader)?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}
