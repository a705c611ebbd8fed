//! Field normalization shared by the catalog adapters

use nexus_models::MediaType;
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on genres kept per media item
pub const MAX_GENRES: usize = 5;

static YEAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})\b").expect("year pattern is a valid regex"));

/// Pull a 4-digit year out of whatever date text a catalog returns.
///
/// Handles full dates ("1999-10-15"), bare years and prose ("March 3, 1965",
/// "c. 1890"). Returns `None` when no year is present.
pub fn extract_year(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    YEAR_PATTERN
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Order (name, count) pairs by descending count and keep the top `MAX_GENRES`.
/// Equal counts keep the catalog's order.
pub fn rank_by_count<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, i64)>,
{
    let mut tags: Vec<(String, i64)> = tags.into_iter().collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1));
    cap_genres(tags.into_iter().map(|(name, _)| name))
}

/// Drop blanks and repeats, keep at most `MAX_GENRES`
pub fn cap_genres<I>(genres: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut kept: Vec<String> = Vec::new();
    for genre in genres {
        let genre = genre.trim();
        if genre.is_empty() || kept.iter().any(|g| g == genre) {
            continue;
        }
        kept.push(genre.to_string());
        if kept.len() == MAX_GENRES {
            break;
        }
    }
    kept
}

/// The external id a catalog stores for a user-supplied id, so local lookups
/// match what search and details return
pub fn canonical_id(media_type: MediaType, id: &str) -> String {
    let id = id.trim();
    match media_type {
        MediaType::Book => format!("/works/{}", crate::openlibrary::api::work_key(id)),
        _ => id.to_string(),
    }
}

/// Treat empty strings from a catalog as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year_formats() {
        assert_eq!(extract_year(Some("1999-10-15")), Some("1999".to_string()));
        assert_eq!(extract_year(Some("2008")), Some("2008".to_string()));
        assert_eq!(extract_year(Some("March 3, 1965")), Some("1965".to_string()));
        assert_eq!(extract_year(Some("c. 1890")), Some("1890".to_string()));
        assert_eq!(extract_year(Some("1er janvier 2001")), Some("2001".to_string()));
    }

    #[test]
    fn test_extract_year_missing() {
        assert_eq!(extract_year(None), None);
        assert_eq!(extract_year(Some("")), None);
        assert_eq!(extract_year(Some("unknown")), None);
        assert_eq!(extract_year(Some("123456")), None);
    }

    #[test]
    fn test_rank_by_count() {
        let tags = vec![
            ("rock".to_string(), 3),
            ("pop".to_string(), 7),
            ("jazz".to_string(), 3),
            ("punk".to_string(), 1),
            ("blues".to_string(), 5),
            ("folk".to_string(), 2),
        ];
        assert_eq!(rank_by_count(tags), vec!["pop", "blues", "rock", "jazz", "folk"]);
    }

    #[test]
    fn test_canonical_id() {
        assert_eq!(canonical_id(MediaType::Book, "OL893415W"), "/works/OL893415W");
        assert_eq!(canonical_id(MediaType::Book, " /works/OL893415W "), "/works/OL893415W");
        assert_eq!(canonical_id(MediaType::Movie, " 550 "), "550");
    }

    #[test]
    fn test_cap_genres_dedupes() {
        let genres = vec!["Action", "Action", "", "RPG"].into_iter().map(String::from);
        assert_eq!(cap_genres(genres), vec!["Action", "RPG"]);
    }
}
