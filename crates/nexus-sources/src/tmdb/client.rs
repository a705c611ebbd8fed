use crate::error::SourceError;
use crate::traits::{validate_id, validate_search, CatalogSource};
use crate::tmdb::api;
use crate::tmdb::genres::GenreTable;
use async_trait::async_trait;
use nexus_models::{MediaType, NormalizedMedia, PaginatedResult};
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

/// TMDB adapter. One instance serves movies, another serves tv; both share
/// the same genre table.
#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: Option<String>,
    language: String,
    base_url: String,
    image_base: String,
    media_type: MediaType,
    genres: Arc<GenreTable>,
}

impl TmdbClient {
    fn new(
        client: Arc<Client>,
        api_key: Option<String>,
        language: String,
        media_type: MediaType,
        genres: Arc<GenreTable>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            language,
            base_url: api::API_BASE.to_string(),
            image_base: api::IMAGE_BASE.to_string(),
            media_type,
            genres,
        }
    }

    pub fn movies(
        client: Arc<Client>,
        api_key: Option<String>,
        language: String,
        genres: Arc<GenreTable>,
    ) -> Self {
        Self::new(client, api_key, language, MediaType::Movie, genres)
    }

    pub fn tv(
        client: Arc<Client>,
        api_key: Option<String>,
        language: String,
        genres: Arc<GenreTable>,
    ) -> Self {
        Self::new(client, api_key, language, MediaType::Tv, genres)
    }

    /// Point the adapter at another API root (self-hosted proxy, test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn api_key(&self) -> Result<&str, SourceError> {
        self.api_key
            .as_deref()
            .ok_or(SourceError::MissingCredential { catalog: api::CATALOG })
    }

    async fn load_genres(&self, api_key: &str) {
        if self.genres.is_loaded() {
            return;
        }
        self.genres
            .ensure_loaded(|| api::fetch_genre_table(&self.client, &self.base_url, api_key, &self.language))
            .await;
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    fn source_name(&self) -> &'static str {
        api::CATALOG
    }

    fn media_type(&self) -> MediaType {
        self.media_type
    }

    async fn search(&self, query: &str, page: u32) -> Result<PaginatedResult, SourceError> {
        let query = validate_search(query, page)?;
        let api_key = self.api_key()?;

        self.load_genres(api_key).await;

        debug!("Searching TMDB {} for '{}' (page {})", api::kind_segment(self.media_type), query, page);
        let response = api::search(
            &self.client,
            &self.base_url,
            api_key,
            &self.language,
            self.media_type,
            query,
            page,
        )
        .await?;

        Ok(api::normalize_search_response(
            response,
            self.media_type,
            page,
            &self.genres,
            &self.image_base,
        ))
    }

    async fn get_details(&self, id: &str) -> Result<NormalizedMedia, SourceError> {
        let id = validate_id(id)?;
        let api_key = self.api_key()?;

        let details = api::get_details(
            &self.client,
            &self.base_url,
            api_key,
            &self.language,
            self.media_type,
            id,
        )
        .await?;

        Ok(api::normalize_details(details, self.media_type, &self.image_base))
    }
}
