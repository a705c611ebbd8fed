pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, DisplayConfig, HttpConfig, MusicBrainzConfig, OpenLibraryConfig, RawgConfig, TmdbConfig, default_musicbrainz_user_agent};
pub use credentials::CredentialStore;
pub use paths::{PathManager, container_base_path};
