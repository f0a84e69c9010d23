//! Loading and saving `catalog.toml`.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use pharmit_core::config::CatalogConfig;
use pharmit_core::error::{QueryError, Result};

use crate::paths::PharmitPaths;

/// Reads and writes the catalog configuration file.
///
/// A missing or empty file yields [`CatalogConfig::default`].
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_paths(paths: &PharmitPaths) -> Self {
        Self::new(paths.catalog_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates the catalog configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(CatalogConfig)`: Parsed file, or defaults if the file is missing or empty
    /// - `Err(QueryError::Config)`: The file parses but describes an unusable catalog
    /// - `Err(_)`: The file cannot be read or parsed
    pub fn load(&self) -> Result<CatalogConfig> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No catalog file, using defaults");
            return Ok(CatalogConfig::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            QueryError::io(format!(
                "Failed to read catalog file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(CatalogConfig::default());
        }

        let config: CatalogConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates and saves the configuration atomically (temp file, fsync, rename).
    pub fn save(&self, config: &CatalogConfig) -> Result<()> {
        config.validate()?;

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(config)?;

        let tmp_path = self.path.with_extension("toml.tmp");
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        info!(path = %self.path.display(), "Catalog saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = CatalogStore::new(temp_dir.path().join("catalog.toml"));
        assert_eq!(store.load().unwrap(), CatalogConfig::default());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.toml");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(CatalogStore::new(path).load().unwrap(), CatalogConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = CatalogStore::from_paths(&PharmitPaths::with_root(temp_dir.path().join("nested")));

        let mut config = CatalogConfig::default();
        config.vendors.push("CHEMBL".to_string());
        store.save(&config).unwrap();

        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.toml");
        std::fs::write(&path, "vendors = []\n").unwrap();

        let err = CatalogStore::new(&path).load().unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
    }
}
