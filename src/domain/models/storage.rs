use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

/// Key/value slots that survive between runs. The conversation keeps its
/// whole transcript in a single slot.
#[async_trait]
pub trait TranscriptStore {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deleting a slot that doesn't exist succeeds.
    async fn delete(&self, key: &str) -> Result<()>;
}

pub type TranscriptStoreBox = Arc<dyn TranscriptStore + Send + Sync>;
