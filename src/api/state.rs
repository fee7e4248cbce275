use std::sync::Arc;

use tokio::sync::RwLock;

use crate::db::{MemoryStore, ReadingStore};
use crate::services::{Library, ThemeVisuals};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Books with reading state. Mutations take the write lock, recommendation passes the
    /// read lock.
    pub library: Arc<RwLock<Library>>,
    pub store: Arc<dyn ReadingStore>,
    pub theme_visuals: Arc<ThemeVisuals>,
}

impl AppState {
    /// Creates application state around a loaded library
    pub fn new(library: Library, store: Arc<dyn ReadingStore>, theme_visuals: ThemeVisuals) -> Self {
        Self {
            library: Arc::new(RwLock::new(library)),
            store,
            theme_visuals: Arc::new(theme_visuals),
        }
    }

    /// In-memory state with the built-in theme visuals
    pub fn in_memory(library: Library) -> Self {
        Self::new(library, Arc::new(MemoryStore::new()), ThemeVisuals::default())
    }
}
