//! The module contains the error the engine can throw.
//!
//! Most errors are invalid-argument conditions raised at the mutating entry
//! points of an [`Inventory`]; see [`EngineError::is_invalid_argument`].
//! [`UnsupportedOperation`] is raised by the [`Ledger`] when a second user
//! tries to log in while another one is active.
//!
//!  [`Inventory`]: super::inventory::Inventory
//!  [`Ledger`]: super::ledger::Ledger
//!  [`UnsupportedOperation`]: EngineError::UnsupportedOperation
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid item: {0}")]
    InvalidItem(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("No active user")]
    NoActiveUser,
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for errors caused by bad caller input.
    ///
    /// These are always recoverable and never leave an inventory partially
    /// updated.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidDate(_)
                | Self::InvalidAmount(_)
                | Self::InvalidItem(_)
                | Self::InvalidFilter(_)
                | Self::ExistingKey(_)
                | Self::KeyNotFound(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidItem(a), Self::InvalidItem(b)) => a == b,
            (Self::InvalidFilter(a), Self::InvalidFilter(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::UnsupportedOperation(a), Self::UnsupportedOperation(b)) => a == b,
            (Self::NoActiveUser, Self::NoActiveUser) => true,
            (Self::Serialization(a), Self::Serialization(b)) => a.to_string() == b.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_invalid_arguments() {
        assert!(EngineError::InvalidAmount("negative".to_string()).is_invalid_argument());
        assert!(EngineError::ExistingKey("SN1".to_string()).is_invalid_argument());
        assert!(!EngineError::UnsupportedOperation("login".to_string()).is_invalid_argument());
        assert!(!EngineError::NoActiveUser.is_invalid_argument());
    }
}
