use crate::error::SourceError;
use crate::rawg::api;
use crate::traits::{validate_id, validate_search, CatalogSource};
use async_trait::async_trait;
use nexus_models::{MediaType, NormalizedMedia, PaginatedResult};
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

/// RAWG adapter (video games). Requires an API key.
#[derive(Clone)]
pub struct RawgClient {
    client: Arc<Client>,
    api_key: Option<String>,
    base_url: String,
}

impl RawgClient {
    pub fn new(client: Arc<Client>, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: api::API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn api_key(&self) -> Result<&str, SourceError> {
        self.api_key
            .as_deref()
            .ok_or(SourceError::MissingCredential { catalog: api::CATALOG })
    }
}

#[async_trait]
impl CatalogSource for RawgClient {
    fn source_name(&self) -> &'static str {
        api::CATALOG
    }

    fn media_type(&self) -> MediaType {
        MediaType::Game
    }

    async fn search(&self, query: &str, page: u32) -> Result<PaginatedResult, SourceError> {
        let query = validate_search(query, page)?;
        let api_key = self.api_key()?;

        debug!("Searching RAWG for '{}' (page {})", query, page);
        let response = api::search(&self.client, &self.base_url, api_key, query, page).await?;
        Ok(api::normalize_search_response(response))
    }

    async fn get_details(&self, id: &str) -> Result<NormalizedMedia, SourceError> {
        let id = validate_id(id)?;
        let api_key = self.api_key()?;

        let game = api::get_game(&self.client, &self.base_url, api_key, id).await?;
        Ok(api::normalize_game(game, None))
    }
}
