//! Cover thumbnail storage.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

/// Directory of `{surname}_{isbn}.jpeg` thumbnails plus the fallback image
#[derive(Debug, Clone)]
pub struct ThumbnailStore {
    dir: PathBuf,
    placeholder: PathBuf,
}

impl ThumbnailStore {
    pub fn new(dir: impl Into<PathBuf>, placeholder: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            placeholder: placeholder.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn placeholder(&self) -> &Path {
        &self.placeholder
    }

    /// Path of `file_name` inside the store.
    ///
    /// Rejects anything but a single plain file name, so nothing is written
    /// outside the thumbnails directory.
    pub fn path_for(&self, file_name: &str) -> Result<PathBuf> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.dir.join(file_name)),
            _ => bail!("Not a plain thumbnail file name: {:?}", file_name),
        }
    }

    /// Write image bytes under `file_name`, replacing any existing file
    pub async fn write(&self, file_name: &str, bytes: Vec<u8>) -> Result<PathBuf> {
        let path = self.path_for(file_name)?;
        write_atomic(&path, bytes).await?;
        Ok(path)
    }

    /// Copy the placeholder image to `file_name`
    pub async fn copy_placeholder(&self, file_name: &str) -> Result<PathBuf> {
        let bytes = tokio::fs::read(&self.placeholder).await.with_context(|| {
            format!("Failed to read placeholder image: {}", self.placeholder.display())
        })?;
        self.write(file_name, bytes).await
    }
}

/// Replace `path` with `bytes` via a temp file in the same directory.
///
/// Creates the parent directory if needed. The filesystem work runs on the
/// blocking pool.
pub async fn write_atomic(path: &Path, bytes: Vec<u8>) -> Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || replace_file(&path, &bytes))
        .await
        .context("Atomic write task failed")?
}

fn replace_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("Failed to write temp file for {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to sync temp file for {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_directory() {
        let temp = TempDir::new().unwrap();
        let store = ThumbnailStore::new(temp.path().join("static/thumbnails"), "unused.jpg");

        let path = store.write("King_9781444720723.jpeg", b"abc".to_vec()).await.unwrap();
        assert_eq!(path, temp.path().join("static/thumbnails/King_9781444720723.jpeg"));
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
    }

    #[tokio::test]
    async fn test_write_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let store = ThumbnailStore::new(temp.path(), "unused.jpg");

        store.write("a.jpeg", b"old".to_vec()).await.unwrap();
        store.write("a.jpeg", b"new".to_vec()).await.unwrap();
        assert_eq!(std::fs::read(temp.path().join("a.jpeg")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_write_rejects_paths_outside_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a/b/thumbs");
        let store = ThumbnailStore::new(&dir, "unused.jpg");

        for name in ["../../../escaped_1.jpeg", "sub/x.jpeg", "..", ".", "", "/tmp/x.jpeg"] {
            assert!(store.write(name, b"x".to_vec()).await.is_err(), "{}", name);
        }
        assert!(!temp.path().join("escaped_1.jpeg").exists());
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_copy_placeholder() {
        let temp = TempDir::new().unwrap();
        let placeholder = temp.path().join("unknownCover.jpg");
        std::fs::write(&placeholder, b"\xff\xd8placeholder").unwrap();
        let store = ThumbnailStore::new(temp.path().join("thumbs"), &placeholder);

        let path = store.copy_placeholder("X_1234567890123.jpeg").await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), std::fs::read(placeholder).unwrap());
    }

    #[tokio::test]
    async fn test_copy_missing_placeholder_errors() {
        let temp = TempDir::new().unwrap();
        let store = ThumbnailStore::new(temp.path(), temp.path().join("nope.jpg"));
        assert!(store.copy_placeholder("a.jpeg").await.is_err());
        assert!(!temp.path().join("a.jpeg").exists());
    }

    #[tokio::test]
    async fn test_write_atomic_from_async_context() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/library.csv");

        write_atomic(&path, b"Jane Austen#Emma\n".to_vec()).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Jane Austen#Emma\n");
    }
}
