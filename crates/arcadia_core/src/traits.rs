use crate::error::*;
use crate::game::{Game, NewGame};

use bytes::Bytes;

/// The relational store holding the catalog table.
pub trait GameStore: Send + Sync + 'static + Clone {
    /// All games, newest first.
    fn list_games(&self) -> impl Future<Output = Result<Vec<Game>, StoreError>> + Send;

    /// Inserts a game and returns the id the store assigned to it.
    fn insert_game(&self, game: NewGame) -> impl Future<Output = Result<i64, StoreError>> + Send;

    /// Deletes the game with `id`. Deleting a missing id is not an error.
    fn delete_game(&self, id: i64) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// The object storage holding cover images.
pub trait CoverStorage: Send + Sync + 'static + Clone {
    fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn delete_object(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// The URL clients use to fetch the object stored under `key`.
    fn public_url(&self, key: &str) -> String;

    /// Prefix under which new cover keys are generated.
    fn cover_prefix(&self) -> &str {
        crate::config::DEFAULT_COVER_PREFIX
    }
}
