//! Key/value substrate abstraction.
//!
//! The store only ever needs get/set/remove of one serialized blob per key.
//! `Database` (SQLite) implements it for the app; `MemorySlots` backs tests
//! and ephemeral sessions.

mod memory;

pub use memory::MemorySlots;

use anyhow::Result;
use async_trait::async_trait;

/// Slot holding the serialized emotion history.
pub const EMOTION_HISTORY_KEY: &str = "emotionHistory";
/// Slot holding the user settings object.
pub const SETTINGS_KEY: &str = "appSettings";

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Raw blob stored under `key`, `None` when the slot is empty.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob under `key`.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Remove the slot. Removing an empty slot is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
