use std::collections::HashMap;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;
use tokio::sync::mpsc;

use crate::db::ReadingStore;
use crate::error::{AppError, AppResult};
use crate::models::{BookId, ReadingState};

/// Creates a Redis client for the reading store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Queued write, applied in submission order by the writer task
#[derive(Debug)]
enum StoreWrite {
    Save { id: BookId, value: String },
    Clear,
}

impl StoreWrite {
    fn book_id(&self) -> Option<BookId> {
        match self {
            StoreWrite::Save { id, .. } => Some(*id),
            StoreWrite::Clear => None,
        }
    }
}

/// Reading state kept in a single Redis hash: field = book id, value = JSON state
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    key: String,
    write_tx: mpsc::UnboundedSender<StoreWrite>,
}

/// Handle for gracefully shutting down the store writer
pub struct StoreWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl StoreWriterHandle {
    /// Signals the writer task and waits until every queued write has been applied
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Store writer shutdown signal sent");
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Store writer task failed");
        }
    }
}

impl RedisStore {
    /// Connects and creates a store writing to the hash at `key` through a background task
    ///
    /// Writes are queued on a channel so request handlers never wait on Redis, and a single
    /// consumer keeps them in order. The connection manager reconnects on its own, so one
    /// connection serves both the writer and reads.
    pub async fn new(redis_client: Client, key: String) -> AppResult<(Self, StoreWriterHandle)> {
        let conn = redis_client.get_connection_manager().await?;
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let writer_conn = conn.clone();
        let writer_key = key.clone();
        let task = tokio::spawn(async move {
            Self::writer_task(writer_conn, writer_key, write_rx, shutdown_rx).await;
        });

        let store = Self {
            conn,
            key,
            write_tx,
        };

        Ok((store, StoreWriterHandle { shutdown_tx, task }))
    }

    /// Applies queued writes until shutdown, then drains whatever is still queued
    async fn writer_task(
        mut conn: ConnectionManager,
        key: String,
        mut write_rx: mpsc::UnboundedReceiver<StoreWrite>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!(key = %key, "Store writer task started");
        let mut failed_writes: u64 = 0;

        loop {
            tokio::select! {
                Some(write) = write_rx.recv() => {
                    Self::apply_logged(&mut conn, &key, write, &mut failed_writes).await;
                }
                _ = shutdown_rx.recv() => {
                    let mut flushed = 0;
                    while let Ok(write) = write_rx.try_recv() {
                        if Self::apply_logged(&mut conn, &key, write, &mut failed_writes).await {
                            flushed += 1;
                        }
                    }

                    tracing::info!(flushed, failed_writes, "Store writer task stopped");
                    break;
                }
            }
        }
    }

    /// Applies one write, logging and counting a failure. Returns whether it landed.
    async fn apply_logged(
        conn: &mut ConnectionManager,
        key: &str,
        write: StoreWrite,
        failed_writes: &mut u64,
    ) -> bool {
        let book_id = write.book_id();
        match Self::apply(conn, key, write).await {
            Ok(()) => true,
            Err(e) => {
                *failed_writes += 1;
                match book_id {
                    Some(book_id) => tracing::error!(
                        book_id = %book_id,
                        failed_writes = *failed_writes,
                        error = %e,
                        "Failed to write reading state to Redis"
                    ),
                    None => tracing::error!(
                        failed_writes = *failed_writes,
                        error = %e,
                        "Failed to clear reading state in Redis"
                    ),
                }
                false
            }
        }
    }

    async fn apply(conn: &mut ConnectionManager, key: &str, write: StoreWrite) -> AppResult<()> {
        match write {
            StoreWrite::Save { id, value } => {
                let _: () = conn.hset(key, id.to_string(), value).await?;
            }
            StoreWrite::Clear => {
                let _: () = conn.del(key).await?;
            }
        }
        Ok(())
    }

    fn enqueue(&self, write: StoreWrite) -> AppResult<()> {
        self.write_tx
            .send(write)
            .map_err(|e| AppError::Internal(format!("Store writer is gone: {}", e)))
    }
}

#[async_trait::async_trait]
impl ReadingStore for RedisStore {
    async fn load_all(&self) -> AppResult<HashMap<BookId, ReadingState>> {
        let mut conn = self.conn.clone();
        let raw: HashMap<String, String> = conn.hgetall(&self.key).await.map_err(|e| {
            tracing::warn!(error = %e, "Redis hgetall failed");
            e
        })?;

        let entries = parse_entries(raw);
        tracing::info!(key = %self.key, entries = entries.len(), "Loaded reading state");
        Ok(entries)
    }

    async fn save(&self, id: BookId, state: ReadingState) -> AppResult<()> {
        let value = serde_json::to_string(&state)
            .map_err(|e| AppError::Internal(format!("Reading state serialization error: {}", e)))?;

        self.enqueue(StoreWrite::Save { id, value })
    }

    async fn clear(&self) -> AppResult<()> {
        self.enqueue(StoreWrite::Clear)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// Decodes hash fields, skipping entries that are not `id -> JSON state`
fn parse_entries(raw: HashMap<String, String>) -> HashMap<BookId, ReadingState> {
    raw.into_iter()
        .filter_map(|(field, value)| {
            let id = match field.parse::<u32>() {
                Ok(id) => BookId(id),
                Err(_) => {
                    tracing::warn!(field = %field, "Skipping reading state with non-numeric id");
                    return None;
                }
            };
            match serde_json::from_str::<ReadingState>(&value) {
                Ok(state) => Some((id, state)),
                Err(e) => {
                    tracing::warn!(book_id = %id, error = %e, "Skipping corrupt reading state");
                    None
                }
            }
        })
        .collect()
}
