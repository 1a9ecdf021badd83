use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::config::ReviewConfig;
use crate::workflows::trainers::applicants::domain::{
    ApplicantId, ApplicantRecord, ApplicantStatus,
};
use crate::workflows::trainers::applicants::repository::{
    ApplicantStore, AuthProvider, BackendError, CvStorage, Session,
};
use crate::workflows::trainers::applicants::ApplicantReviewService;

pub(super) const ADMIN_EMAIL: &str = "admin@example.com";
pub(super) const STAFF_EMAIL: &str = "staff@example.com";
pub(super) const PASSWORD: &str = "correct-horse";

pub(super) fn created(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn record(
    id: &str,
    day: u32,
    cv_path: Option<&str>,
    years_experience: Option<u32>,
) -> ApplicantRecord {
    ApplicantRecord {
        id: ApplicantId(id.to_string()),
        created_at: created(day),
        full_name: Some(format!("Applicant {id}")),
        phone: Some(format!("05000000{day:02}")),
        email: Some(format!("{id}@example.com")),
        city: Some("Riyadh".to_string()),
        specialization: Some("Functional Training".to_string()),
        years_experience,
        cv_path: cv_path.map(str::to_string),
        linkedin_url: None,
        website_url: None,
        bio: Some("Certified coach".to_string()),
        status: None,
    }
}

/// Three applicants, newest first once fetched.
pub(super) fn roster() -> Vec<ApplicantRecord> {
    let mut with_links = record("r3", 3, Some("cvs/r3.pdf"), Some(9));
    with_links.linkedin_url = Some("https://linkedin.com/in/r3".to_string());
    with_links.city = Some("Jeddah".to_string());

    let mut contacted = record("r2", 2, None, Some(2));
    contacted.status = Some(ApplicantStatus::Contacted);

    vec![
        record("r1", 1, Some("cvs/r1.pdf"), Some(6)),
        contacted,
        with_links,
    ]
}

pub(super) fn review_config() -> ReviewConfig {
    ReviewConfig::default()
}

pub(super) type TestService = ApplicantReviewService<MemoryStore, MemoryAuth, MemoryStorage>;

pub(super) struct Harness {
    pub(super) store: Arc<MemoryStore>,
    pub(super) auth: Arc<MemoryAuth>,
    pub(super) storage: Arc<MemoryStorage>,
    pub(super) service: Arc<TestService>,
}

pub(super) fn harness() -> Harness {
    harness_with(MemoryStore::with_records(roster()), MemoryStorage::default())
}

pub(super) fn harness_with(store: MemoryStore, storage: MemoryStorage) -> Harness {
    let store = Arc::new(store);
    let auth = Arc::new(MemoryAuth::standard());
    let storage = Arc::new(storage);
    let service = Arc::new(ApplicantReviewService::new(
        store.clone(),
        auth.clone(),
        storage.clone(),
        review_config(),
    ));
    Harness {
        store,
        auth,
        storage,
        service,
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<Vec<ApplicantRecord>>,
    fetches: AtomicUsize,
}

impl MemoryStore {
    pub(super) fn with_records(records: Vec<ApplicantRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            fetches: AtomicUsize::new(0),
        }
    }

    pub(super) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(super) fn status_of(&self, id: &str) -> Option<ApplicantStatus> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .find(|record| record.id.0 == id)
            .and_then(|record| record.status)
    }
}

impl ApplicantStore for MemoryStore {
    fn fetch_latest(&self, limit: usize) -> Result<Vec<ApplicantRecord>, BackendError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().expect("store mutex poisoned").clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    fn update_status(
        &self,
        id: &ApplicantId,
        status: ApplicantStatus,
    ) -> Result<(), BackendError> {
        let mut records = self.records.lock().expect("store mutex poisoned");
        match records.iter_mut().find(|record| &record.id == id) {
            Some(record) => {
                record.status = Some(status);
                Ok(())
            }
            None => Err(BackendError::NotFound),
        }
    }
}

/// What happens to the service while an [`InterruptingStore`] fetch is running.
pub(super) enum Interruption {
    Refresh,
    SignOut(String),
}

pub(super) type InterruptedService =
    ApplicantReviewService<InterruptingStore, MemoryAuth, MemoryStorage>;

/// Store that re-enters the service in the middle of its next fetch, so the
/// outer refresh finishes after a newer one has started.
pub(super) struct InterruptingStore {
    inner: MemoryStore,
    service: OnceLock<Weak<InterruptedService>>,
    pending: Mutex<Option<Interruption>>,
}

impl InterruptingStore {
    pub(super) fn interrupt_next_fetch(&self, interruption: Interruption) {
        *self.pending.lock().expect("interruption mutex poisoned") = Some(interruption);
    }

    pub(super) fn fetches(&self) -> usize {
        self.inner.fetches()
    }
}

impl ApplicantStore for InterruptingStore {
    fn fetch_latest(&self, limit: usize) -> Result<Vec<ApplicantRecord>, BackendError> {
        let pending = self.pending.lock().expect("interruption mutex poisoned").take();
        let service = self.service.get().and_then(Weak::upgrade);
        if let (Some(interruption), Some(service)) = (pending, service) {
            match interruption {
                Interruption::Refresh => {
                    service.refresh().expect("nested refresh commits");
                }
                Interruption::SignOut(token) => {
                    service.sign_out(&token).expect("nested sign out succeeds");
                }
            }
        }
        self.inner.fetch_latest(limit)
    }

    fn update_status(
        &self,
        id: &ApplicantId,
        status: ApplicantStatus,
    ) -> Result<(), BackendError> {
        self.inner.update_status(id, status)
    }
}

pub(super) struct InterruptedHarness {
    pub(super) store: Arc<InterruptingStore>,
    pub(super) service: Arc<InterruptedService>,
}

pub(super) fn interrupted_harness() -> InterruptedHarness {
    let store = Arc::new(InterruptingStore {
        inner: MemoryStore::with_records(roster()),
        service: OnceLock::new(),
        pending: Mutex::new(None),
    });
    let service = Arc::new(ApplicantReviewService::new(
        store.clone(),
        Arc::new(MemoryAuth::standard()),
        Arc::new(MemoryStorage::default()),
        review_config(),
    ));
    let _ = store.service.set(Arc::downgrade(&service));
    InterruptedHarness { store, service }
}

pub(super) struct UnavailableStore;

impl ApplicantStore for UnavailableStore {
    fn fetch_latest(&self, _limit: usize) -> Result<Vec<ApplicantRecord>, BackendError> {
        Err(BackendError::Unavailable("database offline".to_string()))
    }

    fn update_status(
        &self,
        _id: &ApplicantId,
        _status: ApplicantStatus,
    ) -> Result<(), BackendError> {
        Err(BackendError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct MemoryAuth {
    users: HashMap<String, (String, String)>,
    admins: HashSet<String>,
    sessions: Mutex<HashMap<String, Session>>,
    issued: AtomicUsize,
}

impl MemoryAuth {
    /// One admin and one non-admin account sharing [`PASSWORD`].
    pub(super) fn standard() -> Self {
        let mut users = HashMap::new();
        users.insert(
            ADMIN_EMAIL.to_string(),
            (PASSWORD.to_string(), "user-admin".to_string()),
        );
        users.insert(
            STAFF_EMAIL.to_string(),
            (PASSWORD.to_string(), "user-staff".to_string()),
        );
        let admins = HashSet::from(["user-admin".to_string()]);

        Self {
            users,
            admins,
            sessions: Mutex::new(HashMap::new()),
            issued: AtomicUsize::new(0),
        }
    }

    pub(super) fn active_sessions(&self) -> usize {
        self.sessions.lock().expect("session mutex poisoned").len()
    }
}

impl AuthProvider for MemoryAuth {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let (expected, user_id) = self
            .users
            .get(email)
            .ok_or(BackendError::InvalidCredentials)?;
        if expected != password {
            return Err(BackendError::InvalidCredentials);
        }

        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let session = Session {
            user_id: user_id.clone(),
            access_token: format!("token-{n}"),
        };
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(session.access_token.clone(), session.clone());
        Ok(session)
    }

    fn session(&self, access_token: &str) -> Result<Option<Session>, BackendError> {
        Ok(self
            .sessions
            .lock()
            .expect("session mutex poisoned")
            .get(access_token)
            .cloned())
    }

    fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .remove(access_token);
        Ok(())
    }

    fn is_admin(&self, user_id: &str) -> Result<bool, BackendError> {
        Ok(self.admins.contains(user_id))
    }
}

#[derive(Default)]
pub(super) struct MemoryStorage {
    calls: AtomicUsize,
    refuse: bool,
}

impl MemoryStorage {
    pub(super) fn refusing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            refuse: true,
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CvStorage for MemoryStorage {
    fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        expires_in: Duration,
    ) -> Result<Option<String>, BackendError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.refuse {
            return Ok(None);
        }
        Ok(Some(format!(
            "https://storage.test/{bucket}/{path}?expires={}&sig={n}",
            expires_in.num_seconds()
        )))
    }
}
