pub mod file;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

pub use file::FileKvStore;
pub use memory::MemoryKvStore;

/// Durable string key-value store. Last write wins; no transactions.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
