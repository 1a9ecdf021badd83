//! Applicant review: the fetched snapshot, status updates, detail views and
//! signed CV links, behind backend seams so the service runs without a hosted
//! backend.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod signed_urls;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use domain::{
    format_display_date, ApplicantDetailView, ApplicantId, ApplicantListView, ApplicantRecord,
    ApplicantRow, ApplicantStatus, ApplicantSummaryView, MISSING_FIELD,
};
pub use repository::{ApplicantStore, AuthProvider, BackendError, CvStorage, Session};
pub use router::applicant_router;
pub use service::{ApplicantReviewService, ReviewServiceError};
pub use snapshot::{ApplicantSnapshot, RefreshTicket};
