use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::domain::{
    ApplicantDetailView, ApplicantId, ApplicantListView, ApplicantRow, ApplicantStatus,
    ApplicantSummaryView,
};
use super::repository::{ApplicantStore, AuthProvider, BackendError, CvStorage, Session};
use super::signed_urls::SignedUrlCache;
use super::snapshot::ApplicantSnapshot;
use crate::config::ReviewConfig;
use crate::workflows::trainers::search::{apply_filters, ApplicantFilter};

/// Service composing the backend seams with the local snapshot and link cache.
pub struct ApplicantReviewService<S, A, C> {
    store: Arc<S>,
    auth: Arc<A>,
    storage: Arc<C>,
    snapshot: ApplicantSnapshot,
    signed_urls: SignedUrlCache,
    config: ReviewConfig,
}

impl<S, A, C> ApplicantReviewService<S, A, C>
where
    S: ApplicantStore + 'static,
    A: AuthProvider + 'static,
    C: CvStorage + 'static,
{
    pub fn new(store: Arc<S>, auth: Arc<A>, storage: Arc<C>, config: ReviewConfig) -> Self {
        let signed_urls =
            SignedUrlCache::new(Duration::seconds(config.signed_url_cache_secs as i64));
        Self {
            store,
            auth,
            storage,
            snapshot: ApplicantSnapshot::new(),
            signed_urls,
            config,
        }
    }

    pub fn snapshot(&self) -> &ApplicantSnapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Sign an operator in and require admin membership.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, ReviewServiceError> {
        let email = email.trim();
        let password = password.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ReviewServiceError::MissingCredentials);
        }

        let session = self.auth.sign_in(email, password)?;
        if !self.auth.is_admin(&session.user_id)? {
            if let Err(err) = self.auth.sign_out(&session.access_token) {
                warn!(error = %err, "failed to close non-admin session");
            }
            return Err(ReviewServiceError::NotAuthorized);
        }

        info!(user_id = %session.user_id, "operator signed in");
        Ok(session)
    }

    /// Resolve an access token to an admin session.
    pub fn authorize(&self, access_token: &str) -> Result<Session, ReviewServiceError> {
        let session = self
            .auth
            .session(access_token)?
            .ok_or(ReviewServiceError::Unauthenticated)?;

        if !self.auth.is_admin(&session.user_id)? {
            return Err(ReviewServiceError::NotAuthorized);
        }
        Ok(session)
    }

    /// End the session and drop every locally cached applicant and link.
    pub fn sign_out(&self, access_token: &str) -> Result<(), ReviewServiceError> {
        self.auth.sign_out(access_token)?;
        self.snapshot.clear();
        self.signed_urls.clear();
        info!("operator signed out; local caches cleared");
        Ok(())
    }

    /// Fetch the latest applicants and replace the snapshot.
    pub fn refresh(&self) -> Result<usize, ReviewServiceError> {
        let ticket = self.snapshot.begin_refresh();
        let records = self.store.fetch_latest(self.config.fetch_limit)?;
        let rows: Vec<ApplicantRow> = records.into_iter().map(ApplicantRow::new).collect();
        let count = rows.len();

        if !self.snapshot.commit(ticket, rows) {
            return Err(ReviewServiceError::Stale);
        }

        info!(count, sequence = ticket.sequence(), "applicant snapshot refreshed");
        Ok(count)
    }

    /// Refresh only when nothing has been fetched yet.
    ///
    /// Losing the race to a concurrent refresh is not an error here: the newer
    /// refresh owns the snapshot.
    pub fn ensure_loaded(&self) -> Result<(), ReviewServiceError> {
        if self.snapshot.is_loaded() {
            return Ok(());
        }
        match self.refresh() {
            Ok(_) => Ok(()),
            Err(ReviewServiceError::Stale) => {
                debug!("initial load superseded by a newer refresh");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    pub fn search(&self, filter: &ApplicantFilter) -> ApplicantListView {
        self.snapshot
            .with_rows(|rows| apply_filters(rows, filter).list_view())
    }

    /// Persist a status change, then patch the cached row.
    pub fn update_status(
        &self,
        id: &ApplicantId,
        status: ApplicantStatus,
    ) -> Result<Option<ApplicantSummaryView>, ReviewServiceError> {
        self.store.update_status(id, status)?;

        if !self.snapshot.set_status(id, status) {
            debug!(applicant = %id, "status updated for applicant outside the snapshot");
        }
        info!(applicant = %id, status = status.label(), "applicant status updated");

        Ok(self.snapshot.find(id).map(|row| row.summary_view()))
    }

    pub fn details(&self, id: &ApplicantId) -> Result<ApplicantDetailView, ReviewServiceError> {
        self.snapshot
            .find(id)
            .map(|row| row.detail_view())
            .ok_or_else(|| ReviewServiceError::NotCached(id.clone()))
    }

    /// Signed download link for a CV, reusing a cached link while it is fresh.
    pub fn cv_link(&self, path: &str, now: DateTime<Utc>) -> Result<String, ReviewServiceError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(ReviewServiceError::MissingCvPath);
        }

        if let Some(url) = self.signed_urls.get(path, now) {
            debug!(path, "signed url cache hit");
            return Ok(url);
        }

        let ttl = Duration::seconds(self.config.signed_url_ttl_secs as i64);
        let url = self
            .storage
            .create_signed_url(&self.config.cv_bucket, path, ttl)?
            .ok_or(ReviewServiceError::SignedUrlUnavailable)?;

        self.signed_urls.insert(path, url.clone(), now);
        Ok(url)
    }
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("no active session")]
    Unauthenticated,
    #[error("signed in, but the account is not an administrator")]
    NotAuthorized,
    #[error("applicant {0} is not in the local snapshot; refresh and try again")]
    NotCached(ApplicantId),
    #[error("a newer refresh superseded this one")]
    Stale,
    #[error("a cv path is required")]
    MissingCvPath,
    #[error("storage did not return a download link")]
    SignedUrlUnavailable,
    #[error(transparent)]
    Backend(#[from] BackendError),
}
