use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::domain::{ApplicantId, ApplicantRow, ApplicantStatus};

/// Proof that a refresh was started; only the newest ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// The most recently fetched batch of applicant rows.
#[derive(Debug, Default)]
pub struct ApplicantSnapshot {
    rows: RwLock<Vec<ApplicantRow>>,
    last_request: AtomicU64,
}

impl ApplicantSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.last_request.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Replace the cached rows unless a newer refresh has started since the
    /// ticket was issued. Returns whether the rows were applied.
    pub fn commit(&self, ticket: RefreshTicket, rows: Vec<ApplicantRow>) -> bool {
        let mut guard = self.write();
        // Checked under the write lock so two commits cannot interleave.
        if ticket.0 != self.last_request.load(Ordering::Acquire) {
            debug!(
                ticket = ticket.0,
                latest = self.last_request.load(Ordering::Acquire),
                "discarding stale applicant fetch"
            );
            return false;
        }
        *guard = rows;
        true
    }

    pub fn is_loaded(&self) -> bool {
        !self.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn rows(&self) -> Vec<ApplicantRow> {
        self.read().clone()
    }

    /// Run `f` against the cached rows without cloning them.
    pub fn with_rows<T>(&self, f: impl FnOnce(&[ApplicantRow]) -> T) -> T {
        f(&self.read())
    }

    pub fn find(&self, id: &ApplicantId) -> Option<ApplicantRow> {
        self.read().iter().find(|row| row.id() == id).cloned()
    }

    /// Patch the status of a cached row. Returns false if the row is not cached.
    pub fn set_status(&self, id: &ApplicantId, status: ApplicantStatus) -> bool {
        match self.write().iter_mut().find(|row| row.id() == id) {
            Some(row) => {
                row.set_status(status);
                true
            }
            None => false,
        }
    }

    /// Drop the cached rows and invalidate every refresh still in flight.
    pub fn clear(&self) {
        let mut guard = self.write();
        self.last_request.fetch_add(1, Ordering::AcqRel);
        guard.clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<ApplicantRow>> {
        self.rows.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<ApplicantRow>> {
        self.rows.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
