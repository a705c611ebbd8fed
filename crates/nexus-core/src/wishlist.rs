use anyhow::Result;
use chrono::Utc;
use nexus_config::PathManager;
use nexus_models::{MediaType, NormalizedMedia, WishlistItem, LOCAL_USER_ID};
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;
use crate::storage::RecordFile;

/// Items the user plans to consume, at most one per `(external_id, type)`
pub struct WishlistStore {
    items: Vec<WishlistItem>,
    file: RecordFile,
}

impl WishlistStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let file = RecordFile::on_disk(path, "wishlist");
        let items = file.load()?;
        Ok(Self { items, file })
    }

    pub fn from_paths(path_manager: &PathManager) -> Result<Self> {
        Self::open(path_manager.wishlist_file())
    }

    pub fn in_memory() -> Self {
        Self {
            items: Vec::new(),
            file: RecordFile::in_memory("wishlist"),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Most recently added first
    pub fn list(&self) -> Vec<WishlistItem> {
        let mut items = self.items.clone();
        items.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        items
    }

    fn find_media(&self, external_id: &str, media_type: MediaType) -> Option<&WishlistItem> {
        self.items
            .iter()
            .find(|item| item.media.is_same_item(external_id, media_type))
    }

    /// Add `media`, or return the existing item untouched when it is already wished for
    pub fn add(&mut self, media: NormalizedMedia, priority: i32) -> Result<WishlistItem> {
        if let Some(existing) = self.find_media(&media.external_id, media.media_type) {
            debug!("'{}' already in wishlist ({})", media.title, existing.id);
            return Ok(existing.clone());
        }

        let item = WishlistItem {
            id: Uuid::new_v4().to_string(),
            user_id: LOCAL_USER_ID.to_string(),
            media,
            priority,
            added_at: Utc::now(),
        };

        self.items.push(item.clone());
        self.file.save(&self.items)?;
        info!("Added {} '{}' to wishlist", item.media.media_type, item.media.title);
        Ok(item)
    }

    pub fn remove(&mut self, id: &str) -> Result<bool> {
        self.retain_and_save(|item| item.id != id)
    }

    pub fn remove_by_media(&mut self, external_id: &str, media_type: MediaType) -> Result<bool> {
        self.retain_and_save(|item| !item.media.is_same_item(external_id, media_type))
    }

    fn retain_and_save<F>(&mut self, keep: F) -> Result<bool>
    where
        F: FnMut(&WishlistItem) -> bool,
    {
        let before = self.items.len();
        self.items.retain(keep);
        let removed = before - self.items.len();
        if removed == 0 {
            return Ok(false);
        }

        self.file.save(&self.items)?;
        info!("Removed {} wishlist item(s)", removed);
        Ok(true)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&WishlistItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn filter_by_type(&self, media_type: MediaType) -> Vec<WishlistItem> {
        self.list()
            .into_iter()
            .filter(|item| item.media.media_type == media_type)
            .collect()
    }

    pub fn is_in_wishlist(&self, external_id: &str, media_type: MediaType) -> bool {
        self.find_media(external_id, media_type).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> NormalizedMedia {
        NormalizedMedia::new("/works/OL893415W", MediaType::Book, "Dune")
    }

    #[test]
    fn test_double_add_keeps_first_item() {
        let mut store = WishlistStore::in_memory();
        let first = store.add(dune(), 2).unwrap();

        let mut renamed = dune();
        renamed.title = "Dune (édition collector)".to_string();
        let second = store.add(renamed, 5).unwrap();

        assert_eq!(second, first);
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].priority, 2);
        assert_eq!(store.list()[0].media.title, "Dune");
    }

    #[test]
    fn test_same_id_different_type_are_distinct() {
        let mut store = WishlistStore::in_memory();
        store.add(NormalizedMedia::new("42", MediaType::Movie, "A"), 0).unwrap();
        store.add(NormalizedMedia::new("42", MediaType::Game, "B"), 0).unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.is_in_wishlist("42", MediaType::Game));
        assert!(!store.is_in_wishlist("42", MediaType::Music));
        assert_eq!(store.filter_by_type(MediaType::Movie).len(), 1);
    }

    #[test]
    fn test_remove_by_id_and_by_media() {
        let mut store = WishlistStore::in_memory();
        let item = store.add(dune(), 0).unwrap();
        store.add(NormalizedMedia::new("3328", MediaType::Game, "The Witcher 3"), 0).unwrap();

        assert!(store.remove(&item.id).unwrap());
        assert!(!store.remove(&item.id).unwrap());
        assert!(store.remove_by_media("3328", MediaType::Game).unwrap());
        assert!(!store.remove_by_media("3328", MediaType::Game).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wishlist.json");

        let item = WishlistStore::open(path.clone()).unwrap().add(dune(), 1).unwrap();

        let reopened = WishlistStore::open(path).unwrap();
        assert_eq!(reopened.get_by_id(&item.id), Some(&item));
        assert!(reopened.is_in_wishlist("/works/OL893415W", MediaType::Book));
    }
}
