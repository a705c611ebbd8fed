use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

const TMDB_API_KEY: &str = "tmdb_api_key";
const RAWG_API_KEY: &str = "rawg_api_key";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Flat key/value secrets file (`credentials.toml`), kept apart from `config.toml`
pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    /// Stored value for `key`, overridden by the `env_var` environment variable when set
    fn get_with_env(&self, key: &str, env_var: &str) -> Option<String> {
        std::env::var(env_var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.get(key).cloned())
            .filter(|v| !v.trim().is_empty())
    }

    // Catalog API keys

    pub fn get_tmdb_api_key(&self) -> Option<String> {
        self.get_with_env(TMDB_API_KEY, "NEXUS_TMDB_API_KEY")
    }

    pub fn set_tmdb_api_key(&mut self, key: String) {
        self.set(TMDB_API_KEY.to_string(), key);
    }

    pub fn get_rawg_api_key(&self) -> Option<String> {
        self.get_with_env(RAWG_API_KEY, "NEXUS_RAWG_API_KEY")
    }

    pub fn set_rawg_api_key(&mut self, key: String) {
        self.set(RAWG_API_KEY.to_string(), key);
    }
}
