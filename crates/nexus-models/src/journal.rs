use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::media::NormalizedMedia;

/// A logged consumption of a media item.
///
/// `media` is a snapshot taken when the entry was logged; later catalog
/// changes never reach it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    pub media: NormalizedMedia,
    pub consumed_at: NaiveDate,
    pub rating: Option<u8>, // 1-10
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_rewatch: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User-supplied fields for a new journal entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryDraft {
    pub consumed_at: NaiveDate,
    pub rating: Option<u8>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_rewatch: bool,
}

/// Partial edit of a journal entry. `None` leaves the field as is.
///
/// `rating: Some(None)` clears the rating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalUpdate {
    pub consumed_at: Option<NaiveDate>,
    pub rating: Option<Option<u8>>,
    pub note: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_rewatch: Option<bool>,
}

impl JournalUpdate {
    pub fn is_empty(&self) -> bool {
        self.consumed_at.is_none()
            && self.rating.is_none()
            && self.note.is_none()
            && self.tags.is_none()
            && self.is_rewatch.is_none()
    }

    /// Apply the edit in place. Identity fields (id, user, media) are never touched.
    pub fn apply_to(&self, entry: &mut JournalEntry, now: DateTime<Utc>) {
        if let Some(consumed_at) = self.consumed_at {
            entry.consumed_at = consumed_at;
        }
        if let Some(rating) = self.rating {
            entry.rating = rating;
        }
        if let Some(ref note) = self.note {
            entry.note = note.clone();
        }
        if let Some(ref tags) = self.tags {
            entry.tags = normalize_tags(tags);
        }
        if let Some(is_rewatch) = self.is_rewatch {
            entry.is_rewatch = is_rewatch;
        }
        entry.updated_at = now;
    }
}

impl JournalEntry {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Trim tags, drop blanks and repeated tags, keep first-insertion order
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || normalized.iter().any(|t| t == tag) {
            continue;
        }
        normalized.push(tag.to_string());
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaType;
    use chrono::TimeZone;

    fn entry() -> JournalEntry {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        JournalEntry {
            id: "e1".to_string(),
            user_id: "local-user".to_string(),
            media: NormalizedMedia::new("/works/OL1W", MediaType::Book, "Dune"),
            consumed_at: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            rating: Some(8),
            note: String::new(),
            tags: vec!["sf".to_string()],
            is_rewatch: false,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_normalize_tags_keeps_insertion_order() {
        let tags = vec![
            " cosy ".to_string(),
            "sf".to_string(),
            "".to_string(),
            "cosy".to_string(),
            "classic".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["cosy", "sf", "classic"]);
    }

    #[test]
    fn test_update_applies_only_given_fields() {
        let mut e = entry();
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        let update = JournalUpdate {
            note: Some("Relu en VO".to_string()),
            rating: Some(None),
            ..JournalUpdate::default()
        };
        update.apply_to(&mut e, now);

        assert_eq!(e.note, "Relu en VO");
        assert_eq!(e.rating, None);
        assert_eq!(e.tags, vec!["sf"]);
        assert_eq!(e.media.title, "Dune");
        assert_eq!(e.updated_at, now);
        assert_ne!(e.created_at, now);
    }

    #[test]
    fn test_entry_json_is_camel_case() {
        let value = serde_json::to_value(entry()).unwrap();
        assert_eq!(value["consumedAt"], serde_json::json!("2024-03-01"));
        assert_eq!(value["isRewatch"], serde_json::json!(false));
        assert_eq!(value["media"]["type"], serde_json::json!("book"));
        assert!(entry().has_tag("sf"));
    }
}
