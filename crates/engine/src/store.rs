//! The persistence side of the tracker.
//!
//! Items are exchanged as [`Record`]s, grouped per user and inventory name
//! and keyed by [`Item::store_key`](crate::Item::store_key). An inventory
//! exists in a store only while it holds at least one item.

use serde_json::Value;

use crate::{EngineError, Record, ResultEngine};

mod database;
mod memory;

pub use database::DatabaseStore;
pub use memory::MemoryStore;

/// Field of a record holding the key the record is stored under.
pub const KEY_FIELD: &str = "description";

/// Storage for the items of every user's inventories.
#[allow(async_fn_in_trait)]
pub trait ItemStore {
    /// Every record of an inventory, ordered by key.
    async fn load(&self, username: &str, inventory: &str) -> ResultEngine<Vec<Record>>;

    /// Insert or overwrite `records`.
    async fn save(&self, username: &str, inventory: &str, records: &[Record]) -> ResultEngine<()>;

    /// Delete the record stored under `key`. Missing keys are ignored.
    async fn delete(&self, username: &str, inventory: &str, key: &str) -> ResultEngine<()>;

    /// Delete every record of an inventory.
    async fn remove_inventory(&self, username: &str, inventory: &str) -> ResultEngine<()>;

    /// Names of the inventories holding items for `username`, sorted.
    async fn inventories(&self, username: &str) -> ResultEngine<Vec<String>>;
}

/// The key a record is stored under.
pub fn record_key(record: &Record) -> ResultEngine<&str> {
    match record.get(KEY_FIELD) {
        Some(Value::String(key)) if !key.is_empty() => Ok(key.as_str()),
        _ => Err(EngineError::InvalidItem(format!(
            "record has no \"{KEY_FIELD}\" to be stored under"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn key_comes_from_description() {
        let Value::Object(record) = json!({"description": "Laptop"}) else {
            unreachable!()
        };
        assert_eq!(record_key(&record).unwrap(), "Laptop");

        let Value::Object(record) = json!({"description": ""}) else {
            unreachable!()
        };
        assert!(record_key(&record).is_err());
        assert!(record_key(&Record::new()).is_err());
    }
}
