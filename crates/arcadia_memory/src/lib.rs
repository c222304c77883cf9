use arcadia_core::prelude::*;
use bytes::Bytes;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Table {
    next_id: i64,
    last_created: Option<DateTime<Utc>>,
    rows: Vec<Game>,
}

/// A [`GameStore`] kept in process memory. Clones share the same table.
#[derive(Clone, Default)]
pub struct InMemoryGameStore {
    table: Arc<Mutex<Table>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent inserts and deletes fail, to simulate an unavailable database.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.table.lock().map(|t| t.rows.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Database("simulated write failure".into()))
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Table>, StoreError> {
        self.table
            .lock()
            .map_err(|_| StoreError::Generic("table mutex poisoned".into()))
    }
}

impl GameStore for InMemoryGameStore {
    async fn list_games(&self) -> Result<Vec<Game>, StoreError> {
        let mut games = self.lock()?.rows.clone();
        games.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(games)
    }

    async fn insert_game(&self, game: NewGame) -> Result<i64, StoreError> {
        self.check_writable()?;
        let mut table = self.lock()?;

        table.next_id += 1;
        let id = table.next_id;

        // Keep timestamps strictly increasing so insertion order is observable.
        let now = Utc::now();
        let created_at = match table.last_created {
            Some(last) if last >= now => last + TimeDelta::microseconds(1),
            _ => now,
        };
        table.last_created = Some(created_at);

        table.rows.push(game.into_game(id, created_at));
        Ok(id)
    }

    async fn delete_game(&self, id: i64) -> Result<(), StoreError> {
        self.check_writable()?;
        self.lock()?.rows.retain(|g| g.id != id);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// A [`CoverStorage`] kept in process memory. Clones share the same bucket.
#[derive(Clone, Default)]
pub struct InMemoryCoverStorage {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    fail_uploads: Arc<AtomicBool>,
}

impl InMemoryCoverStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().ok()?.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, StoredObject>>, StorageError> {
        self.objects
            .lock()
            .map_err(|_| StorageError::Generic("bucket mutex poisoned".into()))
    }
}

impl CoverStorage for InMemoryCoverStorage {
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Generic("simulated upload failure".into()));
        }
        self.lock()?.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("memory://covers/{key}")
    }
}
