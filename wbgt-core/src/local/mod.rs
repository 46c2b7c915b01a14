//! Durable key-value storage on the client device.
//!
//! The sync engine keeps whole JSON values under a handful of fixed keys.
//! A key that was never written reads as `None`.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::WbgtResult;

#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> WbgtResult<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> WbgtResult<()>;
}
