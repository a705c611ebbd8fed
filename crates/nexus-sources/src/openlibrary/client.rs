use crate::error::SourceError;
use crate::openlibrary::api;
use crate::traits::{validate_id, validate_search, CatalogSource};
use async_trait::async_trait;
use nexus_models::{MediaType, NormalizedMedia, PaginatedResult};
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

/// Open Library adapter (books). No authentication.
#[derive(Clone)]
pub struct OpenLibraryClient {
    client: Arc<Client>,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            base_url: api::API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl CatalogSource for OpenLibraryClient {
    fn source_name(&self) -> &'static str {
        api::CATALOG
    }

    fn media_type(&self) -> MediaType {
        MediaType::Book
    }

    async fn search(&self, query: &str, page: u32) -> Result<PaginatedResult, SourceError> {
        let query = validate_search(query, page)?;

        debug!("Searching Open Library for '{}' (page {})", query, page);
        let response = api::search(&self.client, &self.base_url, query, page).await?;
        Ok(api::normalize_search_response(response, page))
    }

    async fn get_details(&self, id: &str) -> Result<NormalizedMedia, SourceError> {
        let id = validate_id(id)?;
        let work = api::get_work(&self.client, &self.base_url, id).await?;
        Ok(api::normalize_work(work, id))
    }
}
