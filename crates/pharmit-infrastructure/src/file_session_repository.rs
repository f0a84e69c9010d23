//! File-backed SessionRepository implementation.
//!
//! Each session is one serialized document in the sessions directory:
//!
//! ```text
//! sessions/
//! ├── kinase.json
//! └── protease-v2.json
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use pharmit_core::error::{QueryError, Result};
use pharmit_core::session::SessionRepository;

use crate::paths::PharmitPaths;

/// Stores serialized sessions as `<handle>.json` files.
pub struct FileSessionRepository {
    sessions_dir: PathBuf,
}

impl FileSessionRepository {
    const EXTENSION: &'static str = "json";

    /// Creates a repository rooted at `sessions_dir`. The directory is created on first save.
    pub fn new(sessions_dir: impl Into<PathBuf>) -> Self {
        Self {
            sessions_dir: sessions_dir.into(),
        }
    }

    /// Creates a repository in the platform sessions directory.
    pub fn default_location(paths: &PharmitPaths) -> Self {
        Self::new(paths.sessions_dir())
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    /// Checks that a handle can be used as a file stem.
    ///
    /// Allowed: non-empty, `[A-Za-z0-9_.-]`, not starting with `.`.
    pub fn validate_handle(handle: &str) -> Result<()> {
        if handle.is_empty() {
            return Err(QueryError::config("Session handle must not be empty"));
        }
        if handle.starts_with('.') {
            return Err(QueryError::config(format!(
                "Session handle '{}' must not start with '.'",
                handle
            )));
        }
        if let Some(bad) = handle
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')))
        {
            return Err(QueryError::config(format!(
                "Session handle '{}' contains invalid character '{}'",
                handle, bad
            )));
        }
        Ok(())
    }

    async fn write_and_replace(tmp_path: &Path, path: &Path, serialized: &str) -> Result<()> {
        let mut tmp_file = fs::File::create(tmp_path).await.map_err(|e| {
            QueryError::io(format!(
                "Failed to create temp file '{}': {}",
                tmp_path.display(),
                e
            ))
        })?;
        tmp_file.write_all(serialized.as_bytes()).await.map_err(|e| {
            QueryError::io(format!(
                "Failed to write temp file '{}': {}",
                tmp_path.display(),
                e
            ))
        })?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        fs::rename(tmp_path, path).await.map_err(|e| {
            QueryError::io(format!(
                "Failed to move session into place '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn session_path(&self, handle: &str) -> Result<PathBuf> {
        Self::validate_handle(handle)?;
        Ok(self
            .sessions_dir
            .join(format!("{}.{}", handle, Self::EXTENSION)))
    }
}

#[async_trait]
impl SessionRepository for FileSessionRepository {
    async fn save(&self, handle: &str, serialized: &str) -> Result<()> {
        let path = self.session_path(handle)?;

        fs::create_dir_all(&self.sessions_dir).await.map_err(|e| {
            QueryError::io(format!(
                "Failed to create sessions directory '{}': {}",
                self.sessions_dir.display(),
                e
            ))
        })?;

        // Write to temporary file in the same directory, then rename over the target
        let tmp_path = path.with_extension("json.tmp");
        if let Err(e) = Self::write_and_replace(&tmp_path, &path, serialized).await {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(path = %tmp_path.display(), error = %cleanup, "Failed to remove temp file");
                }
            }
            return Err(e);
        }

        debug!(handle, path = %path.display(), "Session file written");
        Ok(())
    }

    async fn load(&self, handle: &str) -> Result<String> {
        let path = self.session_path(handle)?;

        match fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(QueryError::not_found("session", handle))
            }
            Err(e) => Err(QueryError::io(format!(
                "Failed to read session '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.sessions_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut handles = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(Self::EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if Self::validate_handle(stem).is_ok() {
                    handles.push(stem.to_string());
                }
            }
        }

        handles.sort();
        Ok(handles)
    }

    async fn delete(&self, handle: &str) -> Result<()> {
        let path = self.session_path(handle)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QueryError::io(format!(
                "Failed to delete session '{}': {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path().join("sessions"));

        repo.save("kinase", r#"{"version":"1.1.0"}"#).await.unwrap();
        let loaded = repo.load("kinase").await.unwrap();
        assert_eq!(loaded, r#"{"version":"1.1.0"}"#);

        // Overwrite
        repo.save("kinase", "{}").await.unwrap();
        assert_eq!(repo.load("kinase").await.unwrap(), "{}");
        assert!(!temp_dir.path().join("sessions/kinase.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path());

        // A non-empty directory at the target path makes the rename fail.
        let blocker = temp_dir.path().join("blocked.json");
        std::fs::create_dir_all(blocker.join("inner")).unwrap();

        let err = repo.save("blocked", "{}").await.unwrap_err();
        assert!(err.to_string().contains("blocked.json"));
        assert!(!temp_dir.path().join("blocked.json.tmp").exists());
        assert!(blocker.is_dir());
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path());

        let err = repo.load("nothing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_skips_other_files() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path());

        repo.save("zeta", "{}").await.unwrap();
        repo.save("alpha", "{}").await.unwrap();
        repo.save("m-1.2", "{}").await.unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(repo.list().await.unwrap(), vec!["alpha", "m-1.2", "zeta"]);
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path().join("absent"));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path());

        repo.save("gone", "{}").await.unwrap();
        repo.delete("gone").await.unwrap();
        assert!(repo.load("gone").await.unwrap_err().is_not_found());

        // Deleting again is not an error
        repo.delete("gone").await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_handles_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path());

        for handle in ["", ".hidden", "../escape", "a/b", "sp ace"] {
            let err = repo.save(handle, "{}").await.unwrap_err();
            assert!(matches!(err, QueryError::Config(_)), "handle {handle:?}");
        }
    }
}
