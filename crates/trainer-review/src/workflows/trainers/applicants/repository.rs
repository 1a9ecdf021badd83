use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantId, ApplicantRecord, ApplicantStatus};

/// Authenticated operator session issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
}

/// Applicant table access so the service can be exercised in isolation.
pub trait ApplicantStore: Send + Sync {
    /// Newest applicants first, at most `limit` records.
    fn fetch_latest(&self, limit: usize) -> Result<Vec<ApplicantRecord>, BackendError>;
    fn update_status(&self, id: &ApplicantId, status: ApplicantStatus)
        -> Result<(), BackendError>;
}

/// Operator authentication and admin membership.
pub trait AuthProvider: Send + Sync {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError>;
    fn session(&self, access_token: &str) -> Result<Option<Session>, BackendError>;
    fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;
    fn is_admin(&self, user_id: &str) -> Result<bool, BackendError>;
}

/// Private object storage holding applicant CVs.
pub trait CvStorage: Send + Sync {
    /// Issue a time-limited link to `path`. `None` when the backend returned no URL.
    fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in: Duration,
    ) -> Result<Option<String>, BackendError>;
}

/// Error enumeration for backend failures.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("record not found")]
    NotFound,
    #[error("invalid login credentials")]
    InvalidCredentials,
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
