use log::debug;
use thiserror::Error;
use uuid::Uuid;

use crate::mangadex::Manga;
use crate::storage::{KvStore, StorageError};

pub const FAVORITES_RECORD: &str = "manga-storage";

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("malformed favorites record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Set of favorited manga snapshots, unique by id, persisted under the
/// `manga-storage` record. Every mutation writes through to the store.
pub struct FavoritesStore<S: KvStore> {
    store: S,
    favorites: Vec<Manga>,
}

impl<S: KvStore> FavoritesStore<S> {
    pub fn load(store: S) -> Result<Self, FavoritesError> {
        let favorites = match store.read(FAVORITES_RECORD)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        Ok(Self { store, favorites })
    }

    /// Inserts unless the id is already present; repeated adds for the same
    /// manga never produce duplicates. Returns whether it inserted.
    pub fn add(&mut self, manga: Manga) -> Result<bool, FavoritesError> {
        if self.is_favorite(manga.id) {
            debug!("{} already favorited, skipping", manga.id);
            return Ok(false);
        }
        self.favorites.push(manga);
        self.persist()?;
        Ok(true)
    }

    /// Removes every entry with that id; returns whether anything changed.
    pub fn remove(&mut self, manga_id: Uuid) -> Result<bool, FavoritesError> {
        let before = self.favorites.len();
        self.favorites.retain(|m| m.id != manga_id);
        if self.favorites.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn is_favorite(&self, manga_id: Uuid) -> bool {
        self.favorites.iter().any(|m| m.id == manga_id)
    }

    pub fn all(&self) -> &[Manga] {
        &self.favorites
    }

    fn persist(&self) -> Result<(), FavoritesError> {
        let raw = serde_json::to_string(&self.favorites)?;
        self.store.write(FAVORITES_RECORD, &raw)?;
        Ok(())
    }
}
