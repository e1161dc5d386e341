use super::KvStore;
use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-process store. Nothing survives a restart.
#[derive(Debug)]
pub struct MemoryStore<V> {
    records: RwLock<HashMap<String, V>>,
}

impl<V> MemoryStore<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> KvStore<V> for MemoryStore<V> {
    fn get(&self, key: &str) -> Result<Option<V>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(key).cloned())
    }

    fn set(&self, key: &str, value: V) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.insert(key.to_string(), value);
        Ok(())
    }

    fn insert_new(&self, key: &str, value: V) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        if records.contains_key(key) {
            return Ok(false);
        }
        records.insert(key.to_string(), value);
        Ok(true)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        Ok(records.remove(key).is_some())
    }

    fn entries(&self) -> Result<Vec<(String, V)>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
