//! The session: which user is currently logged in.
//!
//! A `Ledger` is an ordinary value owned by whoever drives the application.
//! It holds at most one active user. Switching users requires logging out
//! first; a login attempt by a different user while one is active is refused
//! and leaves the session as it was.
//!
//! The ledger is not synchronised. A multi-threaded host shares it behind a
//! `Mutex` so login and logout stay serialised.

use uuid::Uuid;

use crate::{EngineError, Inventory, ResultEngine, User};

#[derive(Debug, Default)]
pub struct Ledger {
    user: Option<User>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the active user; `None` logs out and always succeeds.
    ///
    /// Setting the user that is already active replaces its session record.
    /// Setting a different user while one is active fails with
    /// [`EngineError::UnsupportedOperation`].
    pub fn set_user(&mut self, user: Option<User>) -> ResultEngine<()> {
        let Some(user) = user else {
            if let Some(previous) = self.user.take() {
                tracing::info!(username = %previous.username, "logged out");
            }
            return Ok(());
        };

        if let Some(active) = &self.user
            && active.username != user.username
        {
            tracing::warn!(
                active = %active.username,
                requested = %user.username,
                "refusing second active user"
            );
            return Err(EngineError::UnsupportedOperation(format!(
                "{} is already logged in",
                active.username
            )));
        }

        tracing::info!(username = %user.username, "logged in");
        self.user = Some(user);
        Ok(())
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_mut(&mut self) -> Option<&mut User> {
        self.user.as_mut()
    }

    /// Inventories of the active user; empty when nobody is logged in.
    pub fn inventories(&self) -> &[Inventory] {
        match &self.user {
            Some(user) => user.inventories(),
            None => &[],
        }
    }

    /// Stop tracking the inventory with `id`. Does nothing if it is not
    /// tracked.
    pub fn delete_inventory(&mut self, id: Uuid) -> Option<Inventory> {
        self.user.as_mut()?.remove_inventory(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn john() -> User {
        User::new("user1", "John Doe", "pass123")
    }

    fn jane() -> User {
        User::new("user2", "Jane Doe", "pass456")
    }

    #[test]
    fn logout_always_succeeds() {
        let mut ledger = Ledger::new();
        ledger.set_user(None).unwrap();
        assert!(ledger.user().is_none());

        ledger.set_user(Some(john())).unwrap();
        assert_eq!(ledger.user(), Some(&john()));

        ledger.set_user(None).unwrap();
        assert!(ledger.user().is_none());
        ledger.set_user(None).unwrap();
    }

    #[test]
    #[should_panic(expected = "UnsupportedOperation(\"user1 is already logged in\")")]
    fn refuses_second_user() {
        let mut ledger = Ledger::new();
        ledger.set_user(Some(john())).unwrap();
        ledger.set_user(Some(jane())).unwrap();
    }

    #[test]
    fn refused_login_keeps_active_user() {
        let mut ledger = Ledger::new();
        ledger.set_user(Some(john())).unwrap();

        assert!(ledger.set_user(Some(jane())).is_err());
        assert_eq!(ledger.user().unwrap().username, "user1");

        ledger.set_user(None).unwrap();
        ledger.set_user(Some(jane())).unwrap();
        assert_eq!(ledger.user().unwrap().username, "user2");
    }

    #[test]
    fn same_user_refreshes_session() {
        let mut ledger = Ledger::new();
        ledger.set_user(Some(john())).unwrap();

        let mut renamed = john();
        renamed.name = "Johnny".to_string();
        ledger.set_user(Some(renamed)).unwrap();

        assert_eq!(ledger.user().unwrap().name, "Johnny");
    }

    #[test]
    fn delete_inventory_ignores_unknown() {
        let mut ledger = Ledger::new();
        let stray = Inventory::new("Test Inventory");

        assert!(ledger.delete_inventory(stray.id).is_none());
        assert!(!ledger.inventories().contains(&stray));

        let mut user = john();
        let id = user.add_inventory(Inventory::new("Home"));
        ledger.set_user(Some(user)).unwrap();

        assert!(ledger.delete_inventory(stray.id).is_none());
        assert_eq!(ledger.inventories().len(), 1);
        assert!(ledger.delete_inventory(id).is_some());
        assert!(ledger.inventories().is_empty());
    }
}
