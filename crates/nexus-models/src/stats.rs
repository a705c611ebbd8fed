use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::journal::JournalEntry;
use crate::media::MediaType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthCount {
    pub month: String,
    pub count: usize,
}

/// "Cultural DNA": statistics derived from the journal.
///
/// Always computed from the current entries, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CulturalDnaStats {
    pub total_entries: usize,
    pub average_rating: f64,
    pub media_breakdown: BTreeMap<MediaType, usize>,
    pub top_genres: Vec<GenreCount>,
    pub entries_by_month: Vec<MonthCount>,
    pub most_active_month: Option<String>,
    pub favorite_type: Option<MediaType>,
    pub rating_distribution: BTreeMap<u8, usize>,
    pub top_entries: Vec<JournalEntry>,
}

impl CulturalDnaStats {
    /// Stats for an empty journal: zero counts for every type, empty lists
    pub fn empty() -> Self {
        Self {
            total_entries: 0,
            average_rating: 0.0,
            media_breakdown: MediaType::ALL.iter().map(|t| (*t, 0)).collect(),
            top_genres: Vec::new(),
            entries_by_month: Vec::new(),
            most_active_month: None,
            favorite_type: None,
            rating_distribution: BTreeMap::new(),
            top_entries: Vec::new(),
        }
    }

    pub fn count_for(&self, media_type: MediaType) -> usize {
        self.media_breakdown.get(&media_type).copied().unwrap_or(0)
    }
}

impl Default for CulturalDnaStats {
    fn default() -> Self {
        Self::empty()
    }
}
