use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub rawg: RawgConfig,
    #[serde(default)]
    pub open_library: OpenLibraryConfig,
    #[serde(default)]
    pub musicbrainz: MusicBrainzConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Film and TV catalog (themoviedb.org). The API key lives in the credential store.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TmdbConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_tmdb_language")]
    pub language: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Game catalog (rawg.io). The API key lives in the credential store.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RawgConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Book catalog (openlibrary.org), no authentication
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenLibraryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Music catalog (musicbrainz.org). Requires an identifying User-Agent and
/// at most one request per second.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MusicBrainzConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_musicbrainz_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    /// Locale used for month labels in the stats view (e.g. "fr_FR", "en_US")
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_true() -> bool {
    true
}

fn default_tmdb_language() -> String {
    "fr-FR".to_string()
}

pub fn default_musicbrainz_user_agent() -> String {
    format!("Nexus/{} (https://nexus.app)", env!("CARGO_PKG_VERSION"))
}

fn default_min_interval_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_locale() -> String {
    "fr_FR".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: default_tmdb_language(),
            base_url: None,
        }
    }
}

impl Default for RawgConfig {
    fn default() -> Self {
        Self { enabled: true, base_url: None }
    }
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self { enabled: true, base_url: None }
    }
}

impl Default for MusicBrainzConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            user_agent: default_musicbrainz_user_agent(),
            min_interval_ms: default_min_interval_ms(),
            base_url: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs() }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { locale: default_locale() }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults when it does not exist yet
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(anyhow::anyhow!("http.timeout_secs must be greater than zero"));
        }

        if self.musicbrainz.enabled && self.musicbrainz.user_agent.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "musicbrainz.user_agent is required: MusicBrainz rejects anonymous clients"
            ));
        }

        if self.tmdb.enabled && self.tmdb.language.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb.language cannot be empty"));
        }

        if self.display.locale.trim().is_empty() {
            return Err(anyhow::anyhow!("display.locale cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.tmdb.language = "en-US".to_string();
        config.rawg.enabled = false;
        config.musicbrainz.min_interval_ms = 1500;

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.tmdb.language, "en-US");
        assert_eq!(loaded.rawg.enabled, false);
        assert_eq!(loaded.musicbrainz.min_interval_ms, 1500);
        assert_eq!(loaded.display.locale, "fr_FR");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [musicbrainz]
            user_agent = "MyTracker/2.0 (me@example.com)"

            [display]
            locale = "en_US"
            "#,
        )
        .unwrap();

        assert!(config.tmdb.enabled);
        assert_eq!(config.tmdb.language, "fr-FR");
        assert_eq!(config.musicbrainz.user_agent, "MyTracker/2.0 (me@example.com)");
        assert_eq!(config.musicbrainz.min_interval_ms, 1000);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.display.locale, "en_US");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let config = Config::load_or_default(&path).unwrap();
        assert!(config.tmdb.enabled && config.open_library.enabled);
        assert!(config.rawg.enabled && config.musicbrainz.enabled);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.musicbrainz.user_agent = "  ".to_string();
        assert!(config.validate().is_err());

        config.musicbrainz.enabled = false;
        assert!(config.validate().is_ok());

        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
