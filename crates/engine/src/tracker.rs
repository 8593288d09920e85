//! The `Tracker` ties the session to a store: inventories of the logged-in
//! user are loaded from the store on first use and every item mutation is
//! written back.
//!
//! In-memory state stays valid if a write fails: the mutation has already
//! been applied and the error is returned to the caller.

use uuid::Uuid;

use crate::{
    EngineError, Inventory, Item, ItemStore, Ledger, ResultEngine, User, store::record_key,
};

#[derive(Debug)]
pub struct Tracker<S> {
    store: S,
    ledger: Ledger,
}

impl<S: ItemStore> Tracker<S> {
    /// Return a builder for `Tracker`. Help to build the struct.
    pub fn builder() -> TrackerBuilder<S> {
        TrackerBuilder {
            store: None,
            ledger: Ledger::default(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn login(&mut self, user: User) -> ResultEngine<()> {
        self.ledger.set_user(Some(user))
    }

    pub fn logout(&mut self) {
        // Logging out never fails.
        let _ = self.ledger.set_user(None);
    }

    pub fn user(&self) -> ResultEngine<&User> {
        self.ledger.user().ok_or(EngineError::NoActiveUser)
    }

    fn user_mut(&mut self) -> ResultEngine<&mut User> {
        self.ledger.user_mut().ok_or(EngineError::NoActiveUser)
    }

    pub fn inventory(&self, id: Uuid) -> ResultEngine<&Inventory> {
        self.user()?.inventory(id).ok_or_else(|| missing(id))
    }

    /// Mutable access for setting filters and sorts. Item changes go through
    /// the tracker so they reach the store.
    pub fn inventory_mut(&mut self, id: Uuid) -> ResultEngine<&mut Inventory> {
        self.user_mut()?.inventory_mut(id).ok_or_else(|| missing(id))
    }

    /// Names of the active user's inventories known to the store.
    pub async fn stored_inventories(&self) -> ResultEngine<Vec<String>> {
        let username = &self.user()?.username;
        self.store.inventories(username).await
    }

    /// Return the id of the inventory called `name`, loading it from the
    /// store if the session does not track it yet.
    pub async fn open_inventory(&mut self, name: &str) -> ResultEngine<Uuid> {
        let user = self.user()?;
        if let Some(inventory) = user.inventory_named(name) {
            return Ok(inventory.id);
        }

        let records = self.store.load(&user.username, name).await?;
        let mut inventory = Inventory::new(name);
        inventory.load_records(records)?;
        tracing::info!(inventory = name, items = inventory.count(), "opened inventory");

        Ok(self.user_mut()?.add_inventory(inventory))
    }

    /// Add an item; see [`Inventory::add_item`].
    pub async fn add_item(&mut self, id: Uuid, item: Item) -> ResultEngine<()> {
        self.insert(id, item, Inventory::add_item).await
    }

    /// Add an item refusing duplicate serial numbers; see
    /// [`Inventory::import_item`].
    pub async fn import_item(&mut self, id: Uuid, item: Item) -> ResultEngine<()> {
        self.insert(id, item, Inventory::import_item).await
    }

    /// Replace the item at `index`, returning the previous one.
    pub async fn set_item(&mut self, id: Uuid, index: usize, item: Item) -> ResultEngine<Item> {
        let record = item.to_record()?;
        let key = record_key(&record)?.to_string();
        let (username, inventory) = self.names(id)?;
        let previous = self.inventory_mut(id)?.set(index, item)?;

        if previous.store_key() != key {
            self.sync_key(id, &username, &inventory, previous.store_key().to_string())
                .await?;
        }
        self.store.save(&username, &inventory, &[record]).await?;
        Ok(previous)
    }

    /// Remove the first item equal to `item`. Removing an absent item does
    /// nothing.
    pub async fn remove_item(&mut self, id: Uuid, item: &Item) -> ResultEngine<Option<Item>> {
        let (username, inventory) = self.names(id)?;
        let Some(removed) = self.inventory_mut(id)?.remove_item(item) else {
            return Ok(None);
        };

        self.sync_key(id, &username, &inventory, removed.store_key().to_string())
            .await?;
        Ok(Some(removed))
    }

    /// Stop tracking an inventory and delete its stored items.
    ///
    /// Deleting an untracked inventory does nothing.
    pub async fn delete_inventory(&mut self, id: Uuid) -> ResultEngine<Option<Inventory>> {
        let username = self.user()?.username.clone();
        let Some(inventory) = self.ledger.delete_inventory(id) else {
            return Ok(None);
        };

        self.store.remove_inventory(&username, &inventory.name).await?;
        tracing::info!(inventory = %inventory.name, "deleted inventory");
        Ok(Some(inventory))
    }

    async fn insert<F>(&mut self, id: Uuid, item: Item, insert: F) -> ResultEngine<()>
    where
        F: FnOnce(&mut Inventory, Item) -> ResultEngine<()>,
    {
        let record = item.to_record()?;
        record_key(&record)?;
        let (username, inventory) = self.names(id)?;
        insert(self.inventory_mut(id)?, item)?;

        self.store.save(&username, &inventory, &[record]).await
    }

    /// Bring the stored record under `key` in line with the inventory: if
    /// another item still uses the key it is written, otherwise the record
    /// is deleted.
    async fn sync_key(
        &self,
        id: Uuid,
        username: &str,
        inventory: &str,
        key: String,
    ) -> ResultEngine<()> {
        let remaining = self
            .inventory(id)?
            .items()
            .iter()
            .find(|item| item.store_key() == key)
            .map(Item::to_record)
            .transpose()?;

        match remaining {
            Some(record) => self.store.save(username, inventory, &[record]).await,
            None => self.store.delete(username, inventory, &key).await,
        }
    }

    fn names(&self, id: Uuid) -> ResultEngine<(String, String)> {
        let user = self.user()?;
        let inventory = user.inventory(id).ok_or_else(|| missing(id))?;
        Ok((user.username.clone(), inventory.name.clone()))
    }
}

fn missing(id: Uuid) -> EngineError {
    EngineError::KeyNotFound(format!("inventory {id}"))
}

/// The builder for `Tracker`
#[derive(Debug)]
pub struct TrackerBuilder<S> {
    store: Option<S>,
    ledger: Ledger,
}

impl<S: ItemStore> TrackerBuilder<S> {
    /// Pass the required store
    pub fn store(mut self, store: S) -> Self {
        self.store = Some(store);
        self
    }

    /// Start from an existing session
    pub fn ledger(mut self, ledger: Ledger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Construct `Tracker`
    pub fn build(self) -> ResultEngine<Tracker<S>> {
        let store = self
            .store
            .ok_or_else(|| EngineError::KeyNotFound("store".to_string()))?;
        Ok(Tracker {
            store,
            ledger: self.ledger,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{MemoryStore, Money};

    fn item(description: &str, serial: &str) -> Item {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        Item::new(date, description, "Make", "Model", serial, Money::new(100), "")
    }

    fn tracker() -> Tracker<MemoryStore> {
        let mut tracker = Tracker::builder().store(MemoryStore::new()).build().unwrap();
        tracker.login(User::new("user1", "John Doe", "pass123")).unwrap();
        tracker
    }

    #[test]
    #[should_panic(expected = "KeyNotFound(\"store\")")]
    fn builder_requires_store() {
        Tracker::<MemoryStore>::builder().build().unwrap();
    }

    #[tokio::test]
    async fn requires_active_user() {
        let mut tracker = tracker();
        tracker.logout();

        assert_eq!(tracker.user(), Err(EngineError::NoActiveUser));
        assert_eq!(
            tracker.open_inventory("Home").await,
            Err(EngineError::NoActiveUser)
        );
        assert_eq!(
            tracker.stored_inventories().await,
            Err(EngineError::NoActiveUser)
        );
    }

    #[tokio::test]
    async fn open_reuses_tracked_inventory() {
        let mut tracker = tracker();
        let first = tracker.open_inventory("Home").await.unwrap();
        let second = tracker.open_inventory("Home").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(tracker.ledger().inventories().len(), 1);
    }

    #[tokio::test]
    async fn writes_reach_the_store() {
        let mut tracker = tracker();
        let id = tracker.open_inventory("Home").await.unwrap();
        tracker.add_item(id, item("Laptop", "SN1")).await.unwrap();
        tracker.add_item(id, item("Phone", "SN2")).await.unwrap();

        let stored = tracker.store().load("user1", "Home").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(tracker.stored_inventories().await.unwrap(), ["Home"]);

        tracker.remove_item(id, &item("Laptop", "SN1")).await.unwrap();
        let stored = tracker.store().load("user1", "Home").await.unwrap();
        assert_eq!(stored, vec![item("Phone", "SN2").to_record().unwrap()]);
    }

    #[tokio::test]
    async fn import_refuses_duplicate_serial() {
        let mut tracker = tracker();
        let id = tracker.open_inventory("Home").await.unwrap();
        tracker.import_item(id, item("Laptop", "SN1")).await.unwrap();

        let err = tracker.import_item(id, item("Tablet", "SN1")).await;
        assert_eq!(err, Err(EngineError::ExistingKey("SN1".to_string())));
        assert_eq!(tracker.inventory(id).unwrap().count(), 1);
        assert_eq!(tracker.store().load("user1", "Home").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unkeyed_item_leaves_inventory_unchanged() {
        let mut tracker = tracker();
        let id = tracker.open_inventory("Home").await.unwrap();
        tracker.add_item(id, item("Laptop", "SN1")).await.unwrap();

        let err = tracker.add_item(id, item("", "SN2")).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidItem(_)));
        let err = tracker.import_item(id, item("", "SN3")).await.unwrap_err();
        assert!(err.is_invalid_argument());
        let err = tracker.set_item(id, 0, item("", "SN1")).await.unwrap_err();
        assert!(err.is_invalid_argument());

        let inventory = tracker.inventory(id).unwrap();
        assert_eq!(inventory.count(), 1);
        assert_eq!(inventory.value(), Money::new(100));
        assert_eq!(inventory.items(), [item("Laptop", "SN1")]);
        assert_eq!(inventory.displayed_items().len(), 1);
        assert_eq!(tracker.store().load("user1", "Home").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn removing_shared_key_keeps_remaining_record() {
        let mut tracker = tracker();
        let id = tracker.open_inventory("Home").await.unwrap();
        tracker.add_item(id, item("Chair", "A")).await.unwrap();
        tracker.add_item(id, item("Chair", "B")).await.unwrap();

        tracker.remove_item(id, &item("Chair", "B")).await.unwrap();

        let stored = tracker.store().load("user1", "Home").await.unwrap();
        assert_eq!(stored, vec![item("Chair", "A").to_record().unwrap()]);
    }

    #[tokio::test]
    async fn set_item_moves_record_key() {
        let mut tracker = tracker();
        let id = tracker.open_inventory("Home").await.unwrap();
        tracker.add_item(id, item("Desk", "SN1")).await.unwrap();

        let previous = tracker.set_item(id, 0, item("Standing desk", "SN1")).await.unwrap();
        assert_eq!(previous.description, "Desk");

        let stored = tracker.store().load("user1", "Home").await.unwrap();
        assert_eq!(stored, vec![item("Standing desk", "SN1").to_record().unwrap()]);
    }

    #[tokio::test]
    async fn reopening_loads_stored_items() {
        let mut tracker = tracker();
        let id = tracker.open_inventory("Home").await.unwrap();
        tracker.add_item(id, item("Laptop", "SN1")).await.unwrap();
        tracker.logout();

        tracker.login(User::new("user1", "John Doe", "pass123")).unwrap();
        assert!(tracker.ledger().inventories().is_empty());

        let id = tracker.open_inventory("Home").await.unwrap();
        let inventory = tracker.inventory(id).unwrap();
        assert_eq!(inventory.items(), [item("Laptop", "SN1")]);
        assert_eq!(inventory.value(), Money::new(100));
    }

    #[tokio::test]
    async fn delete_inventory_clears_store() {
        let mut tracker = tracker();
        let id = tracker.open_inventory("Home").await.unwrap();
        tracker.add_item(id, item("Laptop", "SN1")).await.unwrap();

        let deleted = tracker.delete_inventory(id).await.unwrap();
        assert_eq!(deleted.map(|inventory| inventory.name), Some("Home".to_string()));
        assert!(tracker.stored_inventories().await.unwrap().is_empty());
        assert_eq!(tracker.delete_inventory(id).await, Ok(None));
    }
}
