use nexus_models::{MediaType, Metadata, NormalizedMedia, PaginatedResult, PAGE_SIZE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use crate::error::SourceError;
use crate::http::{fetch_json, path_segment};
use crate::normalize::{cap_genres, extract_year, non_empty};

pub(crate) const CATALOG: &str = "rawg";

pub const API_BASE: &str = "https://api.rawg.io/api";

/// Platforms listed per game in search results
const SEARCH_PLATFORMS: usize = 5;

#[derive(Debug, Serialize, Deserialize)]
struct RawgNamed {
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawgPlatformEntry {
    platform: RawgNamed,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RawgGame {
    id: u64,
    #[serde(default)]
    name: String,
    released: Option<String>,
    background_image: Option<String>,
    #[serde(default)]
    genres: Vec<RawgNamed>,
    // RAWG sends `"platforms": null` for unreleased titles
    #[serde(default)]
    platforms: Option<Vec<RawgPlatformEntry>>,
    rating: Option<f64>,
    metacritic: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RawgSearchResponse {
    #[serde(default)]
    count: u64,
    next: Option<String>,
    #[serde(default)]
    results: Vec<RawgGame>,
}

pub(crate) async fn search(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
    page: u32,
) -> Result<RawgSearchResponse, SourceError> {
    let page = page.to_string();
    let page_size = PAGE_SIZE.to_string();
    let request = client.get(format!("{}/games", base_url)).query(&[
        ("key", api_key),
        ("search", query),
        ("page", page.as_str()),
        ("page_size", page_size.as_str()),
    ]);

    fetch_json(request, CATALOG, None).await
}

pub(crate) async fn get_game(
    client: &Client,
    base_url: &str,
    api_key: &str,
    id: &str,
) -> Result<RawgGame, SourceError> {
    let request = client
        .get(format!("{}/games/{}", base_url, path_segment(id)))
        .query(&[("key", api_key)]);

    fetch_json(request, CATALOG, Some(id)).await
}

pub(crate) fn normalize_search_response(response: RawgSearchResponse) -> PaginatedResult {
    PaginatedResult {
        has_more: response.next.is_some(),
        total_results: Some(response.count),
        results: response
            .results
            .into_iter()
            .map(|game| normalize_game(game, Some(SEARCH_PLATFORMS)))
            .collect(),
    }
}

/// `platform_limit` caps the platform list (search shows a short list, details the full one)
pub(crate) fn normalize_game(game: RawgGame, platform_limit: Option<usize>) -> NormalizedMedia {
    let platforms: Vec<String> = game
        .platforms
        .unwrap_or_default()
        .into_iter()
        .map(|p| p.platform.name)
        .take(platform_limit.unwrap_or(usize::MAX))
        .collect();

    // A zero rating means "not rated yet"
    let rating = game
        .rating
        .filter(|r| *r > 0.0)
        .map(|r| json!(r))
        .unwrap_or(Value::Null);
    let metacritic = game
        .metacritic
        .filter(|m| *m > 0)
        .map(|m| json!(m))
        .unwrap_or(Value::Null);

    let mut metadata = Metadata::new();
    metadata.insert("platforms".to_string(), json!(platforms));
    metadata.insert("rating".to_string(), rating);
    metadata.insert("metacritic".to_string(), metacritic);

    NormalizedMedia {
        external_id: game.id.to_string(),
        media_type: MediaType::Game,
        title: game.name,
        year: extract_year(game.released.as_deref()),
        poster_url: non_empty(game.background_image),
        genres: cap_genres(game.genres.into_iter().map(|g| g.name)),
        metadata,
    }
}
