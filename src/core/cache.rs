use crate::domain::ports::CacheWriter;
use crate::utils::error::{Result, VsacError};
use std::path::{Path, PathBuf};

/// Writes downloads to the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCacheWriter;

impl CacheWriter for FsCacheWriter {
    async fn prepare(&self, dir: &Path, caching: bool) -> Result<()> {
        if !caching {
            return Ok(());
        }
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| VsacError::WriteError {
                path: dir.to_path_buf(),
                source,
            })
    }

    async fn write(&self, path: &Path, data: &[u8], caching: bool) -> Result<Option<PathBuf>> {
        if !caching {
            return Ok(None);
        }

        tracing::debug!(path = %path.display(), "Writing");
        match tokio::fs::write(path, data).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), bytes = data.len(), "Wrote file");
                Ok(Some(path.to_path_buf()))
            }
            Err(source) => {
                tracing::debug!(path = %path.display(), error = %source, "Error writing file");
                Err(VsacError::WriteError {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_when_caching() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("1.2.3.xml");

        let written = FsCacheWriter.write(&path, b"<ValueSet/>", true).await.unwrap();

        assert_eq!(written.as_deref(), Some(path.as_path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"<ValueSet/>");
    }

    #[tokio::test]
    async fn test_write_is_noop_without_caching() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("1.2.3.xml");

        let written = FsCacheWriter.write(&path, b"<ValueSet/>", false).await.unwrap();

        assert!(written.is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_prepare_creates_nested_dirs_idempotently() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("a").join("b");

        FsCacheWriter.prepare(&dir, true).await.unwrap();
        FsCacheWriter.prepare(&dir, true).await.unwrap();
        assert!(dir.is_dir());

        let skipped = temp_dir.path().join("skipped");
        FsCacheWriter.prepare(&skipped, false).await.unwrap();
        assert!(!skipped.exists());
    }

    #[tokio::test]
    async fn test_write_into_missing_dir_is_write_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("1.2.3.xml");

        let err = FsCacheWriter.write(&path, b"x", true).await.unwrap_err();
        assert!(matches!(err, VsacError::WriteError { path: ref p, .. } if p == &path));
    }
}
