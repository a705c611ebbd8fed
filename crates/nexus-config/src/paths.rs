use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("NEXUS_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("nexus");

        Ok(Self::from_base(base_dir))
    }

    pub fn from_docker_env() -> Self {
        Self::from_base(container_base_path())
    }

    /// Config files at the base, records in a `data` subdirectory
    pub fn from_base(base: PathBuf) -> Self {
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    pub fn journal_file(&self) -> PathBuf {
        self.data_dir.join("journal.json")
    }

    pub fn wishlist_file(&self) -> PathBuf {
        self.data_dir.join("wishlist.json")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // The container image creates the base directory; its presence means we run in Docker
        let base = container_base_path();
        if base.exists() {
            return Self::from_docker_env();
        }

        // Otherwise, use platform-specific paths (e.g., ~/.config/nexus on Linux)
        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_base() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::from_base(dir.path().to_path_buf());

        assert_eq!(paths.config_file(), dir.path().join("config.toml"));
        assert_eq!(paths.journal_file(), dir.path().join("data").join("journal.json"));
        assert_eq!(paths.wishlist_file(), dir.path().join("data").join("wishlist.json"));

        paths.ensure_directories().unwrap();
        assert!(paths.config_dir().is_dir());
        assert!(paths.data_dir().is_dir());
    }
}
