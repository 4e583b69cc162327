//! In-process [`RecordStore`] for tests and dry runs.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::store::RecordStore;
use crate::StoreError;

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    values: Mutex<BTreeMap<(i64, String), String>>,
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored `(label, value)` pairs for one order, sorted by label.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if a writer panicked while holding the lock.
    pub fn order_values(&self, order_id: i64) -> Result<Vec<(String, String)>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values
            .iter()
            .filter(|((id, _), _)| *id == order_id)
            .map(|((_, label), value)| (label.clone(), value.clone()))
            .collect())
    }

    /// Number of stored values across all orders.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if a writer panicked while holding the lock.
    pub fn value_count(&self) -> Result<usize, StoreError> {
        Ok(self.values.lock().map_err(|_| StoreError::Poisoned)?.len())
    }
}

impl RecordStore for MemoryRecordStore {
    async fn save(&self, order_id: i64, label: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.insert((order_id, label.to_string()), value.to_string());
        Ok(())
    }

    async fn load(&self, order_id: i64, label: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(&(order_id, label.to_string())).cloned())
    }
}
