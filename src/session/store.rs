use super::{Session, SessionRecord};
use crate::error::StoreError;
use crate::ids::SessionId;
use crate::storage::KvStore;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Session persistence plus the per-id lock table.
pub struct SessionStore {
    records: Arc<dyn KvStore<SessionRecord>>,
    locks: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl SessionStore {
    pub fn new(records: Arc<dyn KvStore<SessionRecord>>) -> Self {
        Self {
            records,
            locks: DashMap::new(),
        }
    }

    /// Load the session for `id_or_empty`, or mint a fresh one.
    ///
    /// A fresh session is not written until its first mutation.
    ///
    /// # Errors
    ///
    /// Returns the store error if the lookup fails.
    pub fn resolve(&self, id_or_empty: &str) -> Result<Session, StoreError> {
        match SessionId::from_cookie(Some(id_or_empty)) {
            Some(id) => self.load_or_mint(id),
            None => Ok(self.mint()),
        }
    }

    /// Fetch the stored record for `id` without binding a session.
    ///
    /// # Errors
    ///
    /// Returns the store error if the lookup fails.
    pub fn get(&self, id: SessionId) -> Result<Option<SessionRecord>, StoreError> {
        self.records.get(&id.to_string())
    }

    /// Resolve the session for a cookie value and run `f` while holding the
    /// lock for its id.
    ///
    /// The record is re-read after the lock is taken, so `f` always sees the
    /// latest committed state for that visitor.
    ///
    /// # Errors
    ///
    /// Returns the store error if resolving fails or the lock is poisoned.
    pub fn with_session<T>(
        &self,
        cookie: Option<&str>,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, StoreError> {
        let id = match SessionId::from_cookie(cookie) {
            Some(id) => id,
            None => return Ok(f(&mut self.mint())),
        };

        let lock = Arc::clone(self.locks.entry(id).or_default().value());
        let result = {
            let _guard = lock.lock().map_err(|_| StoreError::Poisoned)?;
            let mut session = self.load_or_mint(id)?;
            f(&mut session)
        };
        drop(lock);
        self.locks.remove_if(&id, |_, l| Arc::strong_count(l) == 1);
        Ok(result)
    }

    fn load_or_mint(&self, id: SessionId) -> Result<Session, StoreError> {
        match self.records.get(&id.to_string())? {
            Some(record) => {
                debug!(session_id = %id, record = ?record, "Session loaded");
                Ok(Session::new(id, record, Arc::clone(&self.records)))
            }
            None => {
                debug!(session_id = %id, "Unknown session id presented");
                Ok(self.mint())
            }
        }
    }

    fn mint(&self) -> Session {
        let id = SessionId::new();
        info!(session_id = %id, "Session created");
        Session::new(id, SessionRecord::default(), Arc::clone(&self.records))
    }
}
