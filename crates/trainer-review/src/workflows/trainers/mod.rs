pub mod applicants;
pub mod import;
pub mod search;

pub use applicants::{ApplicantId, ApplicantRecord, ApplicantRow, ApplicantStatus};
pub use import::{ApplicantCsvImporter, ApplicantImportError};
pub use search::{apply_filters, parse_search, ApplicantFilter, SearchQuery, TraitFlag};
