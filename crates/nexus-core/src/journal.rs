use anyhow::{anyhow, Result};
use chrono::Utc;
use nexus_config::PathManager;
use nexus_models::{
    normalize_tags, JournalEntry, JournalEntryDraft, JournalUpdate, MediaType, NormalizedMedia,
    LOCAL_USER_ID,
};
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;
use crate::storage::RecordFile;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

fn check_rating(rating: Option<u8>) -> Result<()> {
    match rating {
        Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => Err(anyhow!(
            "Rating must be between {} and {}, got {}",
            MIN_RATING,
            MAX_RATING,
            r
        )),
        _ => Ok(()),
    }
}

/// The user's consumption journal. Owns the canonical entry list and
/// persists it after every mutation.
pub struct JournalStore {
    entries: Vec<JournalEntry>,
    file: RecordFile,
}

impl JournalStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let file = RecordFile::on_disk(path, "journal");
        let entries = file.load()?;
        Ok(Self { entries, file })
    }

    pub fn from_paths(path_manager: &PathManager) -> Result<Self> {
        Self::open(path_manager.journal_file())
    }

    pub fn in_memory() -> Self {
        Self {
            entries: Vec::new(),
            file: RecordFile::in_memory("journal"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in storage order (as logged or imported)
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Most recently consumed first
    pub fn list(&self) -> Vec<JournalEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| {
            b.consumed_at
                .cmp(&a.consumed_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        entries
    }

    /// Log `media` with a snapshot copy of the record
    pub fn add(&mut self, media: NormalizedMedia, draft: JournalEntryDraft) -> Result<JournalEntry> {
        check_rating(draft.rating)?;

        let now = Utc::now();
        let entry = JournalEntry {
            id: Uuid::new_v4().to_string(),
            user_id: LOCAL_USER_ID.to_string(),
            media,
            consumed_at: draft.consumed_at,
            rating: draft.rating,
            note: draft.note,
            tags: normalize_tags(&draft.tags),
            is_rewatch: draft.is_rewatch,
            created_at: now,
            updated_at: now,
        };

        self.entries.push(entry.clone());
        self.file.save(&self.entries)?;
        info!("Logged {} '{}' ({})", entry.media.media_type, entry.media.title, entry.id);
        Ok(entry)
    }

    /// Apply a partial edit. `Ok(None)` when no entry has that id.
    pub fn update(&mut self, id: &str, update: &JournalUpdate) -> Result<Option<JournalEntry>> {
        if let Some(rating) = update.rating {
            check_rating(rating)?;
        }

        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            debug!("No journal entry {} to update", id);
            return Ok(None);
        };

        update.apply_to(entry, Utc::now());
        let updated = entry.clone();
        self.file.save(&self.entries)?;
        info!("Updated journal entry {}", id);
        Ok(Some(updated))
    }

    /// `Ok(false)` when no entry has that id
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return Ok(false);
        }

        self.file.save(&self.entries)?;
        info!("Deleted journal entry {}", id);
        Ok(true)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn filter_by_type(&self, media_type: MediaType) -> Vec<JournalEntry> {
        self.list()
            .into_iter()
            .filter(|e| e.media.media_type == media_type)
            .collect()
    }

    pub fn filter_by_tag(&self, tag: &str) -> Vec<JournalEntry> {
        self.list().into_iter().filter(|e| e.has_tag(tag)).collect()
    }

    /// Every tag in use, sorted and unique
    pub fn all_tags(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| e.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// All entries as a JSON array, the format `import_json` reads back
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.list())?)
    }

    /// Add entries whose id is not already present; returns how many were added
    pub fn import(&mut self, entries: Vec<JournalEntry>) -> Result<usize> {
        let mut known: HashSet<String> = self.entries.iter().map(|e| e.id.clone()).collect();
        let mut fresh = Vec::new();

        // Nothing is applied unless every new record is valid
        for entry in entries {
            if !known.insert(entry.id.clone()) {
                debug!("Skipping already imported entry {}", entry.id);
                continue;
            }
            check_rating(entry.rating)?;
            fresh.push(entry);
        }

        let added = fresh.len();
        if added > 0 {
            self.entries.extend(fresh);
            self.file.save(&self.entries)?;
        }
        info!("Imported {} journal entries", added);
        Ok(added)
    }

    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let entries: Vec<JournalEntry> = serde_json::from_str(json)
            .map_err(|e| anyhow!("Invalid journal export: {}", e))?;
        self.import(entries)
    }
}
