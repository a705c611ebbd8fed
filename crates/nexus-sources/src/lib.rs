pub mod traits;
pub mod error;
pub mod factory;
pub mod http;
pub mod normalize;
pub mod throttle;
pub mod tmdb;
pub mod openlibrary;
pub mod rawg;
pub mod musicbrainz;

pub use traits::{CatalogSource, validate_id, validate_search};
pub use normalize::canonical_id;
pub use factory::{CatalogRegistry, catalog_for};
pub use error::SourceError;
pub use throttle::RequestThrottle;
pub use tmdb::{GenreTable, TmdbClient};
pub use openlibrary::OpenLibraryClient;
pub use rawg::RawgClient;
pub use musicbrainz::MusicBrainzClient;
