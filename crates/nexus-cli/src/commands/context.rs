use chrono::Locale;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use nexus_config::{Config, CredentialStore, PathManager};
use nexus_core::{parse_locale, Aggregator, JournalStore, WishlistStore};
use nexus_sources::CatalogRegistry;

/// Everything a command needs from disk: paths, config and stored API keys
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        Self::from_paths(PathManager::default())
    }

    pub fn from_paths(paths: PathManager) -> Result<Self> {
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

        let credentials_file = paths.credentials_file();
        let mut credentials = CredentialStore::new(credentials_file.clone());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

        Ok(Self {
            paths,
            config,
            credentials,
        })
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(CatalogRegistry::from_config(&self.config, &self.credentials))
    }

    pub fn journal(&self) -> Result<JournalStore> {
        JournalStore::from_paths(&self.paths).map_err(|e| eyre!("Failed to open journal: {:#}", e))
    }

    pub fn wishlist(&self) -> Result<WishlistStore> {
        WishlistStore::from_paths(&self.paths).map_err(|e| eyre!("Failed to open wishlist: {:#}", e))
    }

    /// `override_locale` when given, else `display.locale` from the config
    pub fn locale(&self, override_locale: Option<&str>) -> Result<Locale> {
        let name = override_locale.unwrap_or(&self.config.display.locale);
        parse_locale(name).map_err(|e| eyre!("{}", e))
    }

    pub fn save_config(&self) -> Result<()> {
        let config_file = self.paths.config_file();
        self.config
            .save_to_file(&config_file)
            .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))
    }

    pub fn save_credentials(&self) -> Result<()> {
        self.credentials.save().map_err(|e| {
            eyre!(
                "Failed to save credentials to {}: {}",
                self.paths.credentials_file().display(),
                e
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_models::MediaType;

    #[test]
    fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::from_paths(PathManager::from_base(dir.path().to_path_buf())).unwrap();

        assert_eq!(ctx.config.display.locale, "fr_FR");
        assert_eq!(ctx.locale(None).unwrap(), Locale::fr_FR);
        assert_eq!(ctx.locale(Some("en_US")).unwrap(), Locale::en_US);
        assert!(ctx.locale(Some("klingon")).is_err());

        assert!(ctx.journal().unwrap().is_empty());
        assert!(ctx.wishlist().unwrap().is_empty());
        let registry = CatalogRegistry::from_config(&ctx.config, &ctx.credentials);
        assert_eq!(registry.media_types(), MediaType::ALL.to_vec());
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::from_base(dir.path().to_path_buf());
        std::fs::write(paths.config_file(), "[http]\ntimeout_secs = 0\n").unwrap();

        let err = AppContext::from_paths(paths).err().unwrap();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_path_buf();

        let mut ctx = AppContext::from_paths(PathManager::from_base(base.clone())).unwrap();
        ctx.config.display.locale = "en_US".to_string();
        ctx.config.rawg.enabled = false;
        ctx.save_config().unwrap();

        let reloaded = AppContext::from_paths(PathManager::from_base(base)).unwrap();
        assert_eq!(reloaded.locale(None).unwrap(), Locale::en_US);
        let registry = CatalogRegistry::from_config(&reloaded.config, &reloaded.credentials);
        assert!(!registry.media_types().contains(&MediaType::Game));
    }
}
