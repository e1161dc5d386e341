//! # Storage Module
//!
//! Key-value substrate shared by content and session storage.
//!
//! Two string-keyed record stores back the service: content-by-title and
//! session-by-id. Both sit behind the [`KvStore`] trait so the service can
//! run fully in memory (tests, throwaway demos) or persist to disk.
//!
//! - [`MemoryStore`] keeps records in a locked `HashMap`.
//! - [`JsonFileStore`] keeps the same map in memory and rewrites a JSON file
//!   after every mutation, so a write has reached disk before the call
//!   returns.
//!
//! Iteration order of [`KvStore::entries`] follows the underlying map and is
//! not stable across runs.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// String-keyed record store.
///
/// Every mutating call is durable when it returns `Ok`.
pub trait KvStore<V>: Send + Sync {
    /// Fetch a clone of the record stored under `key`.
    fn get(&self, key: &str) -> Result<Option<V>, StoreError>;

    /// Insert or overwrite the record under `key`.
    fn set(&self, key: &str, value: V) -> Result<(), StoreError>;

    /// Insert `value` only if `key` is vacant.
    ///
    /// Returns `false` without touching the store when the key exists. The
    /// check and the insert happen under a single lock acquisition.
    fn insert_new(&self, key: &str, value: V) -> Result<bool, StoreError>;

    /// Remove the record under `key`, returning whether one existed.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Snapshot of all records.
    fn entries(&self) -> Result<Vec<(String, V)>, StoreError>;

    /// Snapshot of all keys.
    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries()?.into_iter().map(|(k, _)| k).collect())
    }
}
