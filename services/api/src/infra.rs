use chrono::Duration;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use trainer_review::workflows::trainers::applicants::{
    ApplicantId, ApplicantRecord, ApplicantStatus, ApplicantStore, AuthProvider, BackendError,
    CvStorage, Session,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicantStore {
    records: Arc<Mutex<Vec<ApplicantRecord>>>,
}

impl InMemoryApplicantStore {
    pub(crate) fn seeded(records: Vec<ApplicantRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }
}

impl ApplicantStore for InMemoryApplicantStore {
    fn fetch_latest(&self, limit: usize) -> Result<Vec<ApplicantRecord>, BackendError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        let mut records = guard.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    fn update_status(
        &self,
        id: &ApplicantId,
        status: ApplicantStatus,
    ) -> Result<(), BackendError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        match guard.iter_mut().find(|record| &record.id == id) {
            Some(record) => {
                record.status = Some(status);
                Ok(())
            }
            None => Err(BackendError::NotFound),
        }
    }
}

/// Single-operator auth used when no hosted auth provider is wired in.
#[derive(Default)]
pub(crate) struct InMemoryAuthProvider {
    operator: Option<(String, String)>,
    sessions: Mutex<HashMap<String, Session>>,
    sequence: AtomicU64,
}

const OPERATOR_ID: &str = "operator";

impl InMemoryAuthProvider {
    pub(crate) fn with_operator(email: String, password: String) -> Self {
        Self {
            operator: Some((email, password)),
            ..Self::default()
        }
    }

    pub(crate) fn has_operator(&self) -> bool {
        self.operator.is_some()
    }
}

impl AuthProvider for InMemoryAuthProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        match &self.operator {
            Some((expected_email, expected_password))
                if expected_email.eq_ignore_ascii_case(email) && expected_password == password => {}
            _ => return Err(BackendError::InvalidCredentials),
        }

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let session = Session {
            user_id: OPERATOR_ID.to_string(),
            access_token: format!("session-{sequence:08}"),
        };
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(session.access_token.clone(), session.clone());
        Ok(session)
    }

    fn session(&self, access_token: &str) -> Result<Option<Session>, BackendError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(access_token).cloned())
    }

    fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.remove(access_token);
        Ok(())
    }

    fn is_admin(&self, user_id: &str) -> Result<bool, BackendError> {
        Ok(self.operator.is_some() && user_id == OPERATOR_ID)
    }
}

/// Issues local links in place of object-storage signed URLs.
#[derive(Default)]
pub(crate) struct InMemoryCvStorage {
    issued: AtomicU64,
}

impl CvStorage for InMemoryCvStorage {
    fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in: Duration,
    ) -> Result<Option<String>, BackendError> {
        let token = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(Some(format!(
            "memory://{bucket}/{path}?expires_in={}&token={token}",
            expires_in.num_seconds()
        )))
    }
}

pub(crate) fn parse_status(raw: &str) -> Result<ApplicantStatus, String> {
    ApplicantStatus::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = ApplicantStatus::ALL.iter().map(|s| s.label()).collect();
        format!("unknown status '{raw}' (expected one of {})", known.join(", "))
    })
}
