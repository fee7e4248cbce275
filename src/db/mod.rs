use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{BookId, ReadingState},
};

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use self::redis::create_redis_client;
pub use self::redis::RedisStore;
pub use self::redis::StoreWriterHandle;

/// Persistence for the per-book reading state
///
/// Stores map a book id to its `{read, rating}` pair and nothing else. The library is the
/// source of truth while the service runs; stores are read once at startup and written after
/// every mutation.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReadingStore: Send + Sync {
    /// Loads every stored entry
    async fn load_all(&self) -> AppResult<HashMap<BookId, ReadingState>>;

    /// Stores the state of one book
    async fn save(&self, id: BookId, state: ReadingState) -> AppResult<()>;

    /// Removes all stored state
    async fn clear(&self) -> AppResult<()>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}
