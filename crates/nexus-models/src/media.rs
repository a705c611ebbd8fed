use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Adapter-specific fields attached to a media record (overview, cast, authors, ...)
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Kind of cultural item tracked by Nexus.
///
/// The declaration order is the canonical order used for iteration,
/// display and tie-breaks (movie, tv, book, game, music).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Book,
    Game,
    Music,
}

impl MediaType {
    pub const ALL: [MediaType; 5] = [
        MediaType::Movie,
        MediaType::Tv,
        MediaType::Book,
        MediaType::Game,
        MediaType::Music,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Book => "book",
            MediaType::Game => "game",
            MediaType::Music => "music",
        }
    }

    /// Human label shown in listings
    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Movie => "Film",
            MediaType::Tv => "Série",
            MediaType::Book => "Livre",
            MediaType::Game => "Jeu",
            MediaType::Music => "Musique",
        }
    }

    /// Verb used when logging an item ("Vu", "Lu", ...)
    pub fn verb(&self) -> &'static str {
        match self {
            MediaType::Movie | MediaType::Tv => "Vu",
            MediaType::Book => "Lu",
            MediaType::Game => "Joué",
            MediaType::Music => "Écouté",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "film" => Ok(MediaType::Movie),
            "tv" | "show" | "series" => Ok(MediaType::Tv),
            "book" => Ok(MediaType::Book),
            "game" => Ok(MediaType::Game),
            "music" | "album" => Ok(MediaType::Music),
            other => Err(format!(
                "Invalid media type: {}. Use one of movie, tv, book, game, music",
                other
            )),
        }
    }
}

/// Unified record every catalog adapter produces, whatever the source schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMedia {
    pub external_id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<String>,
    pub poster_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NormalizedMedia {
    pub fn new(external_id: impl Into<String>, media_type: MediaType, title: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            media_type,
            title: title.into(),
            year: None,
            poster_url: None,
            genres: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// True when `(external_id, media_type)` is this record's identity; other
    /// fields do not take part
    pub fn is_same_item(&self, external_id: &str, media_type: MediaType) -> bool {
        self.external_id == external_id && self.media_type == media_type
    }

    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str()).filter(|s| !s.is_empty())
    }

    pub fn metadata_list(&self, key: &str) -> Vec<String> {
        self.metadata
            .get(key)
            .and_then(|v| v.as_array())
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
