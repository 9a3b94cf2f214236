//! Key-value persistence for settings and the best score.
//!
//! The engine only ever persists a handful of scalar values, each stored as a
//! string under a fixed key. Anything implementing [`KeyValueStore`] can back
//! them:
//!
//! - [`MemoryStore`]: process-lifetime map, used in tests and ephemeral hosts
//! - [`JsonFileStore`]: flat JSON object on disk, rewritten on every write
//!
//! Implementations serialize their own writes so a store can be shared across
//! threads behind an `Arc`.

pub mod errors;
pub mod json_file;
pub mod memory;

pub use errors::{StoreError, StoreResult};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Abstract string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Durably store `value` under `key`
    ///
    /// # Errors
    ///
    /// Returns error if the write could not be persisted
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}
