//! Registry mapping each media type to the adapter that serves it, built
//! from configuration and stored credentials.

use nexus_config::{Config, CredentialStore};
use nexus_models::MediaType;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use crate::http::create_client;
use crate::musicbrainz::MusicBrainzClient;
use crate::openlibrary::OpenLibraryClient;
use crate::rawg::RawgClient;
use crate::tmdb::{GenreTable, TmdbClient};
use crate::traits::CatalogSource;

/// Catalog that backs a media type
pub fn catalog_for(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Movie | MediaType::Tv => "tmdb",
        MediaType::Book => "openlibrary",
        MediaType::Game => "rawg",
        MediaType::Music => "musicbrainz",
    }
}

#[derive(Clone, Default)]
pub struct CatalogRegistry {
    sources: HashMap<MediaType, Arc<dyn CatalogSource>>,
}

impl CatalogRegistry {
    pub fn new() -> Self {
        Self { sources: HashMap::new() }
    }

    /// Register an adapter under the media type it reports; replaces any previous one
    pub fn register(&mut self, source: Arc<dyn CatalogSource>) {
        debug!("Registering {} adapter for {}", source.source_name(), source.media_type());
        self.sources.insert(source.media_type(), source);
    }

    /// Build every enabled adapter. Disabled catalogs are left out; a missing
    /// API key still registers the adapter, which then fails on use.
    pub fn from_config(config: &Config, credentials: &CredentialStore) -> Self {
        let mut registry = Self::new();
        let timeout = Duration::from_secs(config.http.timeout_secs);
        let user_agent = format!("Nexus/{}", env!("CARGO_PKG_VERSION"));

        if config.tmdb.enabled {
            let client = Arc::new(create_client(&user_agent, timeout));
            let genres = Arc::new(GenreTable::new());
            let api_key = credentials.get_tmdb_api_key();
            let language = config.tmdb.language.clone();

            let mut movies = TmdbClient::movies(client.clone(), api_key.clone(), language.clone(), genres.clone());
            let mut tv = TmdbClient::tv(client, api_key, language, genres);
            if let Some(base_url) = &config.tmdb.base_url {
                movies = movies.with_base_url(base_url.as_str());
                tv = tv.with_base_url(base_url.as_str());
            }
            registry.register(Arc::new(movies));
            registry.register(Arc::new(tv));
        }

        if config.open_library.enabled {
            let mut books = OpenLibraryClient::new(Arc::new(create_client(&user_agent, timeout)));
            if let Some(base_url) = &config.open_library.base_url {
                books = books.with_base_url(base_url.as_str());
            }
            registry.register(Arc::new(books));
        }

        if config.rawg.enabled {
            let mut games = RawgClient::new(
                Arc::new(create_client(&user_agent, timeout)),
                credentials.get_rawg_api_key(),
            );
            if let Some(base_url) = &config.rawg.base_url {
                games = games.with_base_url(base_url.as_str());
            }
            registry.register(Arc::new(games));
        }

        if config.musicbrainz.enabled {
            let mb = &config.musicbrainz;
            let mut music = MusicBrainzClient::new(
                Arc::new(create_client(&mb.user_agent, timeout)),
                mb.user_agent.clone(),
                Duration::from_millis(mb.min_interval_ms),
            );
            if let Some(base_url) = &mb.base_url {
                music = music.with_base_url(base_url.as_str());
            }
            registry.register(Arc::new(music));
        }

        info!(
            "Catalogs ready: {}",
            registry
                .media_types()
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        registry
    }

    pub fn get(&self, media_type: MediaType) -> Option<Arc<dyn CatalogSource>> {
        self.sources.get(&media_type).cloned()
    }

    /// Registered media types in canonical order
    pub fn media_types(&self) -> Vec<MediaType> {
        MediaType::ALL
            .into_iter()
            .filter(|t| self.sources.contains_key(t))
            .collect()
    }
}
