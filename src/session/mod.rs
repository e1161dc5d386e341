//! # Session Module
//!
//! Per-visitor state keyed by an opaque [`SessionId`] carried in the `sid`
//! cookie.
//!
//! ## Lifecycle
//!
//! 1. The gateway hands the cookie value (or nothing) to
//!    [`SessionStore::resolve`].
//! 2. A known id loads its stored [`SessionRecord`]; an unknown, malformed
//!    or missing id mints a fresh id with default state
//!    (`viewed_count = 0`, not authenticated, `is_new = true`).
//! 3. A new session is persisted with [`Session::consume_new_flag`] before
//!    the handler runs, and its response carries the one `Set-Cookie`.
//! 4. Controllers mutate the [`Session`]. Every mutator writes the record
//!    through to the store before returning.
//!
//! Sessions never expire; pruning the store is left to whoever operates it.
//!
//! ## Concurrency
//!
//! [`SessionStore::with_session`] runs the whole read-modify-write span of a
//! request under a mutex keyed by session id, so two concurrent requests for
//! the same visitor cannot lose each other's updates.

mod store;

pub use store::SessionStore;

use crate::error::StoreError;
use crate::ids::SessionId;
use crate::storage::KvStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Persisted shape of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub viewed_count: u32,
    pub is_authenticated: bool,
    pub is_new: bool,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            viewed_count: 0,
            is_authenticated: false,
            is_new: true,
        }
    }
}

/// One visitor's session, bound to the store it persists into.
pub struct Session {
    id: SessionId,
    record: SessionRecord,
    store: Arc<dyn KvStore<SessionRecord>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub(crate) fn new(
        id: SessionId,
        record: SessionRecord,
        store: Arc<dyn KvStore<SessionRecord>>,
    ) -> Self {
        Self { id, record, store }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn viewed_count(&self) -> u32 {
        self.record.viewed_count
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.record.is_authenticated
    }

    /// True until the id has been sent to the client once.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.record.is_new
    }

    #[must_use]
    pub fn record(&self) -> SessionRecord {
        self.record
    }

    /// Count one more revealed item.
    ///
    /// # Errors
    ///
    /// Returns the store error if the write-through fails; the in-memory
    /// state is left unchanged in that case.
    pub fn increment_viewed(&mut self) -> Result<(), StoreError> {
        let mut next = self.record;
        next.viewed_count = next.viewed_count.saturating_add(1);
        self.commit(next)
    }

    /// Flip the authenticated flag. A second call logs the visitor out again.
    ///
    /// # Errors
    ///
    /// Returns the store error if the write-through fails.
    pub fn toggle_authenticated(&mut self) -> Result<(), StoreError> {
        let mut next = self.record;
        next.is_authenticated = !next.is_authenticated;
        self.commit(next)
    }

    /// Flip `is_new` once the id is due to be announced to the client.
    ///
    /// # Errors
    ///
    /// Returns the store error if the write-through fails.
    pub fn consume_new_flag(&mut self) -> Result<(), StoreError> {
        let mut next = self.record;
        next.is_new = !next.is_new;
        self.commit(next)
    }

    fn commit(&mut self, next: SessionRecord) -> Result<(), StoreError> {
        self.store.set(&self.id.to_string(), next)?;
        debug!(session_id = %self.id, record = ?next, "Session persisted");
        self.record = next;
        Ok(())
    }
}
