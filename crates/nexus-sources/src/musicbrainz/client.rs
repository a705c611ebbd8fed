use crate::error::SourceError;
use crate::musicbrainz::api;
use crate::throttle::RequestThrottle;
use crate::traits::{validate_id, validate_search, CatalogSource};
use async_trait::async_trait;
use nexus_models::{MediaType, NormalizedMedia, PaginatedResult};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// MusicBrainz adapter (album releases).
///
/// Every request goes through the throttle, so calls made through one
/// instance are spaced by at least `min_interval`.
#[derive(Clone)]
pub struct MusicBrainzClient {
    client: Arc<Client>,
    user_agent: String,
    base_url: String,
    cover_base: String,
    throttle: Arc<RequestThrottle>,
}

impl MusicBrainzClient {
    pub fn new(client: Arc<Client>, user_agent: String, min_interval: Duration) -> Self {
        Self {
            client,
            user_agent,
            base_url: api::API_BASE.to_string(),
            cover_base: api::COVER_ART_BASE.to_string(),
            throttle: Arc::new(RequestThrottle::new(min_interval)),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl CatalogSource for MusicBrainzClient {
    fn source_name(&self) -> &'static str {
        api::CATALOG
    }

    fn media_type(&self) -> MediaType {
        MediaType::Music
    }

    async fn search(&self, query: &str, page: u32) -> Result<PaginatedResult, SourceError> {
        let query = validate_search(query, page)?;

        self.throttle.wait().await;
        debug!("Searching MusicBrainz for '{}' (page {})", query, page);
        let response = api::search(&self.client, &self.base_url, &self.user_agent, query, page).await?;

        Ok(api::normalize_search_response(response, page, &self.cover_base))
    }

    async fn get_details(&self, id: &str) -> Result<NormalizedMedia, SourceError> {
        let id = validate_id(id)?;

        self.throttle.wait().await;
        let release = api::get_release(&self.client, &self.base_url, &self.user_agent, id).await?;

        Ok(api::normalize_release(release, &self.cover_base, api::DETAILS_COVER_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Instant;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UA: &str = "NexusTest/0.1 (tests@example.com)";

    fn client(server: &MockServer, min_interval: Duration) -> MusicBrainzClient {
        MusicBrainzClient::new(Arc::new(Client::new()), UA.to_string(), min_interval)
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_search_sends_user_agent_and_offset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/release"))
            .and(header("user-agent", UA))
            .and(query_param("query", "ok computer"))
            .and(query_param("offset", "20"))
            .and(query_param("limit", "20"))
            .and(query_param("fmt", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 55,
                "offset": 20,
                "releases": [{"id": "rel-1", "title": "OK Computer", "date": "1997"}]
            })))
            .mount(&server)
            .await;

        let page = client(&server, Duration::ZERO).search("ok computer", 2).await.unwrap();
        assert!(page.has_more);
        assert_eq!(page.results[0].external_id, "rel-1");
        assert_eq!(page.results[0].media_type, MediaType::Music);
    }

    #[tokio::test]
    async fn test_requests_are_spaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/release"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "releases": []})))
            .expect(3)
            .mount(&server)
            .await;

        let source = client(&server, Duration::from_millis(150));
        let started = Instant::now();
        let (a, b, c) = tokio::join!(
            source.search("a", 1),
            source.search("b", 1),
            source.search("c", 1)
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());

        // Three dispatches need at least two full intervals between them
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_details_use_large_cover() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/release/rel-1"))
            .and(query_param("inc", "artists+labels+recordings+genres+tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "rel-1",
                "title": "OK Computer",
                "artist-credit": [{"name": "Radiohead"}]
            })))
            .mount(&server)
            .await;

        let media = client(&server, Duration::ZERO).get_details("rel-1").await.unwrap();
        assert_eq!(
            media.poster_url.as_deref(),
            Some("https://coverartarchive.org/release/rel-1/front-500")
        );
        assert_eq!(media.metadata_list("artists"), vec!["Radiohead"]);
    }
}
