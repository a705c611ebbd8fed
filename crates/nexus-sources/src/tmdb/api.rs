use nexus_models::{MediaType, Metadata, NormalizedMedia, PaginatedResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use crate::error::SourceError;
use crate::http::{fetch_json, path_segment};
use crate::normalize::{cap_genres, extract_year, non_empty};
use super::genres::GenreTable;

pub(crate) const CATALOG: &str = "tmdb";

// TMDB API base URL
pub const API_BASE: &str = "https://api.themoviedb.org/3";
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TmdbSearchResult {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    overview: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbSearchResult>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct TmdbGenre {
    id: u32,
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TmdbGenreList {
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TmdbCastMember {
    name: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct TmdbCredits {
    #[serde(default)]
    cast: Vec<TmdbCastMember>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TmdbDetailResponse {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    overview: Option<String>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    #[serde(default)]
    credits: TmdbCredits,
}

/// "movie" or "tv", the path segment TMDB uses for each kind
pub(crate) fn kind_segment(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Tv => "tv",
        _ => "movie",
    }
}

fn poster_url(image_base: &str, poster_path: Option<&str>) -> Option<String> {
    poster_path
        .filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", image_base, p))
}

/// Fetch the movie and tv genre lists together and merge them into one id -> name table
pub async fn fetch_genre_table(
    client: &Client,
    base_url: &str,
    api_key: &str,
    language: &str,
) -> Result<HashMap<u32, String>, SourceError> {
    let params = [("api_key", api_key), ("language", language)];
    let movie_request = client
        .get(format!("{}/genre/movie/list", base_url))
        .query(&params);
    let tv_request = client
        .get(format!("{}/genre/tv/list", base_url))
        .query(&params);

    let (movie_genres, tv_genres) = futures::try_join!(
        fetch_json::<TmdbGenreList>(movie_request, CATALOG, None),
        fetch_json::<TmdbGenreList>(tv_request, CATALOG, None),
    )?;

    Ok(movie_genres
        .genres
        .into_iter()
        .chain(tv_genres.genres)
        .map(|g| (g.id, g.name))
        .collect())
}

/// Search movies or shows, one TMDB page per Nexus page
pub(crate) async fn search(
    client: &Client,
    base_url: &str,
    api_key: &str,
    language: &str,
    media_type: MediaType,
    query: &str,
    page: u32,
) -> Result<TmdbSearchResponse, SourceError> {
    let url = format!("{}/search/{}", base_url, kind_segment(media_type));
    let page = page.to_string();
    let request = client.get(&url).query(&[
        ("api_key", api_key),
        ("query", query),
        ("page", page.as_str()),
        ("language", language),
    ]);

    fetch_json(request, CATALOG, None).await
}

/// Fetch one movie or show with its credits appended
pub(crate) async fn get_details(
    client: &Client,
    base_url: &str,
    api_key: &str,
    language: &str,
    media_type: MediaType,
    id: &str,
) -> Result<TmdbDetailResponse, SourceError> {
    let url = format!("{}/{}/{}", base_url, kind_segment(media_type), path_segment(id));
    let request = client.get(&url).query(&[
        ("api_key", api_key),
        ("language", language),
        ("append_to_response", "credits"),
    ]);

    fetch_json(request, CATALOG, Some(id)).await
}

pub(crate) fn normalize_search_response(
    response: TmdbSearchResponse,
    media_type: MediaType,
    page: u32,
    genres: &GenreTable,
    image_base: &str,
) -> PaginatedResult {
    PaginatedResult {
        has_more: page < response.total_pages,
        total_results: Some(response.total_results),
        results: response
            .results
            .into_iter()
            .map(|item| normalize_search_result(item, media_type, genres, image_base))
            .collect(),
    }
}

pub(crate) fn normalize_search_result(
    item: TmdbSearchResult,
    media_type: MediaType,
    genres: &GenreTable,
    image_base: &str,
) -> NormalizedMedia {
    // Movies carry title/release_date, shows carry name/first_air_date
    let title = non_empty(item.title).or(item.name).unwrap_or_default();
    let date = non_empty(item.release_date).or(item.first_air_date);

    let mut metadata = Metadata::new();
    metadata.insert("overview".to_string(), json!(item.overview.unwrap_or_default()));

    NormalizedMedia {
        external_id: item.id.to_string(),
        media_type,
        title,
        year: extract_year(date.as_deref()),
        poster_url: poster_url(image_base, item.poster_path.as_deref()),
        genres: cap_genres(item.genre_ids.iter().map(|id| genres.name_for(*id))),
        metadata,
    }
}

pub(crate) fn normalize_details(
    item: TmdbDetailResponse,
    media_type: MediaType,
    image_base: &str,
) -> NormalizedMedia {
    let (title, date) = match media_type {
        MediaType::Tv => (item.name.or(item.title), item.first_air_date),
        _ => (item.title.or(item.name), item.release_date),
    };
    let cast: Vec<String> = item.credits.cast.into_iter().take(5).map(|c| c.name).collect();

    let mut metadata = Metadata::new();
    metadata.insert("overview".to_string(), json!(item.overview.unwrap_or_default()));
    metadata.insert("cast".to_string(), json!(cast));

    NormalizedMedia {
        external_id: item.id.to_string(),
        media_type,
        title: title.unwrap_or_default(),
        year: extract_year(date.as_deref()),
        poster_url: poster_url(image_base, item.poster_path.as_deref()),
        genres: cap_genres(item.genres.into_iter().map(|g| g.name)),
        metadata,
    }
}
