use nexus_models::{MediaType, Metadata, NormalizedMedia, PaginatedResult, PAGE_SIZE};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use crate::error::SourceError;
use crate::http::{fetch_json, path_segment};
use crate::normalize::{extract_year, rank_by_count};

pub(crate) const CATALOG: &str = "musicbrainz";

pub const API_BASE: &str = "https://musicbrainz.org/ws/2";
pub const COVER_ART_BASE: &str = "https://coverartarchive.org";

/// Cover Art Archive thumbnail sizes
pub(crate) const SEARCH_COVER_SIZE: u32 = 250;
pub(crate) const DETAILS_COVER_SIZE: u32 = 500;

#[derive(Debug, Serialize, Deserialize)]
struct ArtistCredit {
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Label {
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct LabelInfo {
    label: Option<Label>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CountedName {
    name: String,
    #[serde(default)]
    count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MusicBrainzRelease {
    id: String,
    #[serde(default)]
    title: String,
    date: Option<String>,
    #[serde(rename = "artist-credit", default)]
    artist_credit: Vec<ArtistCredit>,
    #[serde(rename = "label-info", default)]
    label_info: Vec<LabelInfo>,
    #[serde(default)]
    genres: Vec<CountedName>,
    #[serde(default)]
    tags: Vec<CountedName>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MusicBrainzSearchResponse {
    #[serde(default)]
    releases: Vec<MusicBrainzRelease>,
    #[serde(default)]
    count: u64,
}

/// Result offset of a 1-based page
pub(crate) fn search_offset(page: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(PAGE_SIZE)
}

pub(crate) async fn search(
    client: &Client,
    base_url: &str,
    user_agent: &str,
    query: &str,
    page: u32,
) -> Result<MusicBrainzSearchResponse, SourceError> {
    let offset = search_offset(page).to_string();
    let limit = PAGE_SIZE.to_string();
    let request = client
        .get(format!("{}/release", base_url))
        .header(USER_AGENT, user_agent)
        .query(&[
            ("query", query),
            ("fmt", "json"),
            ("limit", limit.as_str()),
            ("offset", offset.as_str()),
        ]);

    fetch_json(request, CATALOG, None).await
}

pub(crate) async fn get_release(
    client: &Client,
    base_url: &str,
    user_agent: &str,
    id: &str,
) -> Result<MusicBrainzRelease, SourceError> {
    let request = client
        .get(format!("{}/release/{}", base_url, path_segment(id)))
        .header(USER_AGENT, user_agent)
        .query(&[("fmt", "json"), ("inc", "artists+labels+recordings+genres+tags")]);

    fetch_json(request, CATALOG, Some(id)).await
}

pub(crate) fn normalize_search_response(
    response: MusicBrainzSearchResponse,
    page: u32,
    cover_base: &str,
) -> PaginatedResult {
    PaginatedResult {
        has_more: PaginatedResult::has_more_from_total(page, response.count),
        total_results: Some(response.count),
        results: response
            .releases
            .into_iter()
            .map(|release| normalize_release(release, cover_base, SEARCH_COVER_SIZE))
            .collect(),
    }
}

pub(crate) fn normalize_release(release: MusicBrainzRelease, cover_base: &str, cover_size: u32) -> NormalizedMedia {
    let artists: Vec<String> = release.artist_credit.into_iter().map(|a| a.name).collect();
    let label = release
        .label_info
        .into_iter()
        .next()
        .and_then(|info| info.label)
        .map(|l| l.name)
        .unwrap_or_default();

    // Curated genres first; community tags only when no genre is attached
    let ranked = if release.genres.is_empty() { release.tags } else { release.genres };
    let genres = rank_by_count(ranked.into_iter().map(|g| (g.name, g.count)));

    let mut metadata = Metadata::new();
    metadata.insert("artists".to_string(), json!(artists));
    metadata.insert("label".to_string(), json!(label));

    NormalizedMedia {
        poster_url: Some(format!("{}/release/{}/front-{}", cover_base, release.id, cover_size)),
        external_id: release.id,
        media_type: MediaType::Music,
        title: release.title,
        year: extract_year(release.date.as_deref()),
        genres,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release() -> MusicBrainzRelease {
        serde_json::from_value(json!({
            "id": "b84ee12a-09ef-421b-82de-0441a926375b",
            "title": "OK Computer",
            "date": "1997-05-21",
            "artist-credit": [{"name": "Radiohead"}],
            "label-info": [{"label": {"name": "Parlophone"}}, {"label": null}],
            "genres": [
                {"name": "art rock", "count": 4},
                {"name": "alternative rock", "count": 9},
                {"name": "electronic", "count": 1}
            ],
            "tags": [{"name": "90s", "count": 20}]
        }))
        .unwrap()
    }

    #[test]
    fn test_genres_ranked_by_count() {
        let media = normalize_release(release(), COVER_ART_BASE, SEARCH_COVER_SIZE);
        assert_eq!(media.genres, vec!["alternative rock", "art rock", "electronic"]);
        assert_eq!(media.year.as_deref(), Some("1997"));
        assert_eq!(media.metadata_list("artists"), vec!["Radiohead"]);
        assert_eq!(media.metadata_str("label"), Some("Parlophone"));
        assert_eq!(
            media.poster_url.as_deref(),
            Some("https://coverartarchive.org/release/b84ee12a-09ef-421b-82de-0441a926375b/front-250")
        );
    }

    #[test]
    fn test_tags_used_without_genres() {
        let release: MusicBrainzRelease = serde_json::from_value(json!({
            "id": "abc",
            "title": "Demo",
            "date": "2003",
            "tags": [
                {"name": "lo-fi", "count": 1},
                {"name": "indie", "count": 3},
                {"name": "bedroom pop", "count": 3},
                {"name": "folk", "count": 2},
                {"name": "acoustic", "count": 1},
                {"name": "demo", "count": 1}
            ]
        }))
        .unwrap();

        let media = normalize_release(release, COVER_ART_BASE, DETAILS_COVER_SIZE);
        assert_eq!(media.genres, vec!["indie", "bedroom pop", "folk", "lo-fi", "acoustic"]);
        assert!(media.poster_url.as_deref().unwrap().ends_with("/release/abc/front-500"));
        assert_eq!(media.metadata_str("label"), None);
    }

    #[test]
    fn test_search_offset_does_not_overflow() {
        assert_eq!(search_offset(1), 0);
        assert_eq!(search_offset(3), 40);
        assert_eq!(search_offset(u32::MAX), (u64::from(u32::MAX) - 1) * 20);
    }

    #[test]
    fn test_search_pagination() {
        let response: MusicBrainzSearchResponse =
            serde_json::from_value(json!({"count": 40, "offset": 20, "releases": []})).unwrap();
        let page = normalize_search_response(response, 2, COVER_ART_BASE);
        assert!(!page.has_more);
        assert_eq!(page.total_results, Some(40));
    }
}
