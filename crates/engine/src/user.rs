//! The module contains the `User` type, the owner of inventories.

use uuid::Uuid;

use crate::Inventory;

/// An account owning inventories.
///
/// The username identifies the user. Inventory names are not required to be
/// unique; inventories are addressed by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub name: String,
    pub password: String,
    inventories: Vec<Inventory>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            password: password.into(),
            inventories: Vec::new(),
        }
    }

    pub fn inventories(&self) -> &[Inventory] {
        &self.inventories
    }

    pub fn inventory(&self, id: Uuid) -> Option<&Inventory> {
        self.inventories.iter().find(|inventory| inventory.id == id)
    }

    pub fn inventory_mut(&mut self, id: Uuid) -> Option<&mut Inventory> {
        self.inventories.iter_mut().find(|inventory| inventory.id == id)
    }

    /// First inventory called `name`.
    pub fn inventory_named(&self, name: &str) -> Option<&Inventory> {
        self.inventories.iter().find(|inventory| inventory.name == name)
    }

    /// Add an inventory and return its id.
    pub fn add_inventory(&mut self, inventory: Inventory) -> Uuid {
        let id = inventory.id;
        self.inventories.push(inventory);
        id
    }

    /// Remove the inventory with `id`. Returns `None` if the user does not
    /// own it.
    pub fn remove_inventory(&mut self, id: Uuid) -> Option<Inventory> {
        let index = self.inventories.iter().position(|inventory| inventory.id == id)?;
        Some(self.inventories.remove(index))
    }
}
