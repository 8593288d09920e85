use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use super::{ItemStore, record_key};
use crate::{Record, ResultEngine};

type Inventories = BTreeMap<(String, String), BTreeMap<String, Record>>;

/// Keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inventories: Mutex<Inventories>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inventories> {
        self.inventories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn slot(username: &str, inventory: &str) -> (String, String) {
    (username.to_string(), inventory.to_string())
}

impl ItemStore for MemoryStore {
    async fn load(&self, username: &str, inventory: &str) -> ResultEngine<Vec<Record>> {
        Ok(self
            .lock()
            .get(&slot(username, inventory))
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn save(&self, username: &str, inventory: &str, records: &[Record]) -> ResultEngine<()> {
        let keyed = records
            .iter()
            .map(|record| -> ResultEngine<(String, Record)> {
                Ok((record_key(record)?.to_string(), record.clone()))
            })
            .collect::<ResultEngine<Vec<_>>>()?;
        if keyed.is_empty() {
            return Ok(());
        }

        self.lock()
            .entry(slot(username, inventory))
            .or_default()
            .extend(keyed);
        Ok(())
    }

    async fn delete(&self, username: &str, inventory: &str, key: &str) -> ResultEngine<()> {
        let mut inventories = self.lock();
        let slot = slot(username, inventory);
        if let Some(records) = inventories.get_mut(&slot) {
            records.remove(key);
            if records.is_empty() {
                inventories.remove(&slot);
            }
        }
        Ok(())
    }

    async fn remove_inventory(&self, username: &str, inventory: &str) -> ResultEngine<()> {
        self.lock().remove(&slot(username, inventory));
        Ok(())
    }

    async fn inventories(&self, username: &str) -> ResultEngine<Vec<String>> {
        Ok(self
            .lock()
            .keys()
            .filter(|(owner, _)| owner == username)
            .map(|(_, inventory)| inventory.clone())
            .collect())
    }
}
