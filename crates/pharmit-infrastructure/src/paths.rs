//! Path management for pharmit configuration and session files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/pharmit/           # Config directory (platform default)
//! ├── catalog.toml             # Style palette and vendor list
//! └── sessions/                # Saved query sessions
//!     └── <handle>.json
//! ```

use std::path::{Path, PathBuf};

use pharmit_core::error::{QueryError, Result};

const APP_DIR: &str = "pharmit";

/// Resolved locations of pharmit files.
///
/// Built either from the platform config directory or from an explicit root
/// (a `--data-dir` override, or a temp dir in tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PharmitPaths {
    root: PathBuf,
}

impl PharmitPaths {
    /// Uses `<platform config dir>/pharmit`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Config` when the platform has no config directory.
    pub fn platform_default() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| QueryError::config("Cannot determine the platform config directory"))?;
        Ok(Self::with_root(config_dir.join(APP_DIR)))
    }

    /// Uses `root` directly, or the platform default when `None`.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        match root {
            Some(root) => Ok(Self::with_root(root)),
            None => Self::platform_default(),
        }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog_file(&self) -> PathBuf {
        self.root.join("catalog.toml")
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.root.join("sessions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_root() {
        let paths = PharmitPaths::new(Some(PathBuf::from("/tmp/pharmit-test"))).unwrap();
        assert_eq!(paths.root(), Path::new("/tmp/pharmit-test"));
        assert_eq!(
            paths.catalog_file(),
            PathBuf::from("/tmp/pharmit-test/catalog.toml")
        );
        assert_eq!(
            paths.sessions_dir(),
            PathBuf::from("/tmp/pharmit-test/sessions")
        );
    }
}
