use std::collections::HashMap;

use tokio::sync::RwLock;

use super::ReadingStore;
use crate::{
    error::AppResult,
    models::{BookId, ReadingState},
};

/// Process-local store, used when no Redis URL is configured and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<BookId, ReadingState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with entries
    pub fn with_entries(entries: HashMap<BookId, ReadingState>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait::async_trait]
impl ReadingStore for MemoryStore {
    async fn load_all(&self) -> AppResult<HashMap<BookId, ReadingState>> {
        Ok(self.entries.read().await.clone())
    }

    async fn save(&self, id: BookId, state: ReadingState) -> AppResult<()> {
        self.entries.write().await.insert(id, state);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
