use super::KvStore;
use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

/// JSON-file backed store.
///
/// The whole map lives in memory; each mutation rewrites the file through a
/// sibling `.tmp` file and a rename while the write lock is held.
#[derive(Debug)]
pub struct JsonFileStore<V> {
    path: PathBuf,
    records: RwLock<HashMap<String, V>>,
}

impl<V: Serialize + DeserializeOwned> JsonFileStore<V> {
    /// Open the store at `path`, loading existing records if the file exists.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file cannot be read or the parent
    /// directory cannot be created, and [`StoreError::Serialization`] when
    /// the file is not a JSON object of records.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }
        }
        let records = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(io_error(&path, e)),
        };
        info!(path = %path.display(), records = records.len(), "Store opened");
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, records: &HashMap<String, V>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes).map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| io_error(&self.path, e))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Store flushed");
        Ok(())
    }
}

fn io_error(path: &Path, source: io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl<V> KvStore<V> for JsonFileStore<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Result<Option<V>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(key).cloned())
    }

    fn set(&self, key: &str, value: V) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.insert(key.to_string(), value);
        self.flush(&records)
    }

    fn insert_new(&self, key: &str, value: V) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        if records.contains_key(key) {
            return Ok(false);
        }
        records.insert(key.to_string(), value);
        self.flush(&records)?;
        Ok(true)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        if records.remove(key).is_none() {
            return Ok(false);
        }
        self.flush(&records)?;
        Ok(true)
    }

    fn entries(&self) -> Result<Vec<(String, V)>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
