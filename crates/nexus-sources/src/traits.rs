use async_trait::async_trait;
use nexus_models::{MediaType, NormalizedMedia, PaginatedResult};
use crate::error::SourceError;

/// One external catalog behind the uniform search/details contract.
///
/// Implementations share nothing but this trait: each one owns its HTTP
/// client, its pagination mapping and its normalization rules.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Catalog name used in logs ("tmdb", "openlibrary", ...)
    fn source_name(&self) -> &'static str;

    /// The bucket this adapter fills
    fn media_type(&self) -> MediaType;

    /// Search one page (1-based, 20 results per page)
    async fn search(&self, query: &str, page: u32) -> Result<PaginatedResult, SourceError>;

    /// Fetch the full record for a catalog id
    async fn get_details(&self, id: &str) -> Result<NormalizedMedia, SourceError>;
}

/// Reject blank queries and page 0 before anything touches the network.
///
/// Returns the trimmed query.
pub fn validate_search(query: &str, page: u32) -> Result<&str, SourceError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SourceError::Validation("search query cannot be empty".to_string()));
    }
    if page < 1 {
        return Err(SourceError::Validation(format!("page must be >= 1, got {}", page)));
    }
    Ok(query)
}

/// Reject blank ids before a details lookup
pub fn validate_id(id: &str) -> Result<&str, SourceError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(SourceError::Validation("media id cannot be empty".to_string()));
    }
    Ok(id)
}
