//! Personal inventory tracking: items, the inventories holding them, the
//! filtered and sorted views over an inventory and the session of the user
//! that owns them.

pub use error::EngineError;
pub use filter::Filter;
pub use inventory::Inventory;
pub use item::{DATE_FORMAT, Item, ItemInput, today};
pub use ledger::Ledger;
pub use money::Money;
pub use record::Record;
pub use sort::{Sort, SortDirection, SortField};
pub use store::{DatabaseStore, ItemStore, MemoryStore, record_key};
pub use tracker::{Tracker, TrackerBuilder};
pub use user::User;

mod error;
mod filter;
mod inventory;
mod item;
mod ledger;
mod money;
mod record;
mod sort;
mod store;
mod tracker;
mod user;

pub type ResultEngine<T> = Result<T, EngineError>;
