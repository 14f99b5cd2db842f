//! Rooted local filesystem content store with atomic writes.

use std::path::{Component, Path, PathBuf};
use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use depot_core::error::{AppError, ErrorKind};
use depot_core::result::AppResult;

use crate::sanitize::sanitize_filename;

/// A byte stream type used for reading and writing file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Content store mapping relative paths to raw bytes under one root
/// directory.
///
/// Every path handed to the store is relative; [`ContentStore::resolve`]
/// rejects anything that would land outside the root. Writes go to a
/// uniquely-named `.part` sibling and are renamed into place, so a reader
/// never observes a partially-written file at a final path and replacement
/// of existing content is atomic.
#[derive(Debug, Clone)]
pub struct ContentStore {
    /// Canonicalized root directory for all stored content.
    root: PathBuf,
}

impl ContentStore {
    /// Create a content store rooted at the given path, creating the
    /// directory if needed.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        fs::create_dir_all(root_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {root_path}"),
                e,
            )
        })?;
        let root = fs::canonicalize(root_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to canonicalize storage root: {root_path}"),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Build the versioned storage path for one file version:
    /// `user/<userId>/file/<fileId>/v<versionNumber>/<sanitizedName>`.
    pub fn version_path(user_id: Uuid, file_id: Uuid, version_number: i32, name: &str) -> String {
        format!(
            "user/{user_id}/file/{file_id}/v{version_number}/{}",
            sanitize_filename(name)
        )
    }

    /// Resolve a relative path to an absolute path within the root.
    ///
    /// Fails with [`ErrorKind::PathViolation`] if the path is absolute,
    /// contains a parent-directory component, or would otherwise escape
    /// the root.
    pub fn resolve(&self, rel: &str) -> AppResult<PathBuf> {
        let rel_path = Path::new(rel);
        let mut clean = PathBuf::new();
        for component in rel_path.components() {
            match component {
                Component::Normal(part) => clean.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(AppError::path_violation(format!(
                        "Path escapes storage root: {rel}"
                    )));
                }
            }
        }
        if clean.as_os_str().is_empty() {
            return Err(AppError::path_violation("Empty storage path"));
        }

        let abs = self.root.join(clean);
        if !abs.starts_with(&self.root) {
            return Err(AppError::path_violation(format!(
                "Path escapes storage root: {rel}"
            )));
        }
        Ok(abs)
    }

    /// Derive a uniquely-named temporary sibling path for the given final
    /// path. The sibling lives in the same directory so the final rename
    /// stays on one filesystem.
    pub fn temp_path(final_rel: &str) -> String {
        format!("{final_rel}.{}.part", Uuid::new_v4().simple())
    }

    /// Write a byte stream to the given relative path atomically.
    ///
    /// Returns the number of bytes written.
    pub async fn put_stream(&self, rel: &str, mut stream: ByteStream) -> AppResult<u64> {
        let final_abs = self.resolve(rel)?;
        let temp_rel = Self::temp_path(rel);
        let temp_abs = self.resolve(&temp_rel)?;
        self.ensure_parent(&temp_abs).await?;

        let mut file = fs::File::create(&temp_abs).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create temp file for: {rel}"),
                e,
            )
        })?;

        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Stream read error", e))?;
            total_bytes += chunk.len() as u64;
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write chunk", e)
            })?;
        }
        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush file", e))?;
        drop(file);

        fs::rename(&temp_abs, &final_abs).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to commit file: {rel}"),
                e,
            )
        })?;

        debug!(path = rel, bytes = total_bytes, "Wrote file");
        Ok(total_bytes)
    }

    /// Atomically rename a committed temp file into its final path.
    pub async fn promote(&self, temp_rel: &str, final_rel: &str) -> AppResult<()> {
        let temp_abs = self.resolve(temp_rel)?;
        let final_abs = self.resolve(final_rel)?;
        self.ensure_parent(&final_abs).await?;

        fs::rename(&temp_abs, &final_abs).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to promote {temp_rel} -> {final_rel}"),
                e,
            )
        })?;
        debug!(from = temp_rel, to = final_rel, "Promoted temp file");
        Ok(())
    }

    /// Remove a temp file that will not be promoted. Missing files are
    /// not an error.
    pub async fn discard(&self, temp_rel: &str) -> AppResult<()> {
        let abs = self.resolve(temp_rel)?;
        match fs::remove_file(&abs).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to discard temp file: {temp_rel}"),
                e,
            )),
        }
    }

    /// Check whether a file exists at the given relative path.
    pub async fn exists(&self, rel: &str) -> AppResult<bool> {
        let abs = self.resolve(rel)?;
        Ok(fs::try_exists(&abs).await.unwrap_or(false))
    }

    /// Open a file for streaming reads.
    pub async fn read_stream(&self, rel: &str) -> AppResult<ByteStream> {
        let abs = self.resolve(rel)?;
        let file = fs::File::open(&abs).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Stored file not found: {rel}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to open file: {rel}"), e)
            }
        })?;
        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream))
    }

    /// Read a file into memory as a complete byte vector.
    pub async fn read_bytes(&self, rel: &str) -> AppResult<Bytes> {
        let abs = self.resolve(rel)?;
        let data = fs::read(&abs).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Stored file not found: {rel}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to read file: {rel}"), e)
            }
        })?;
        Ok(Bytes::from(data))
    }

    /// Delete the file at the given relative path.
    ///
    /// A missing file is reported as a storage error so callers can decide
    /// whether to swallow it (physical deletes are best-effort in the
    /// delete path).
    pub async fn delete(&self, rel: &str) -> AppResult<()> {
        let abs = self.resolve(rel)?;
        fs::remove_file(&abs).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {rel}"),
                e,
            )
        })?;
        debug!(path = rel, "Deleted file");
        Ok(())
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::error::ErrorKind;
    use futures::stream;

    fn one_shot(data: &'static [u8]) -> ByteStream {
        Box::pin(stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from_static(data))]))
    }

    async fn store() -> (tempfile::TempDir, ContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::new(dir.path().to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_put_read_delete() {
        let (_dir, store) = store().await;

        let written = store.put_stream("a/b/c.txt", one_shot(b"hello")).await.unwrap();
        assert_eq!(written, 5);
        assert!(store.exists("a/b/c.txt").await.unwrap());

        let data = store.read_bytes("a/b/c.txt").await.unwrap();
        assert_eq!(&data[..], b"hello");

        store.delete("a/b/c.txt").await.unwrap();
        assert!(!store.exists("a/b/c.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_replaces_atomically() {
        let (_dir, store) = store().await;

        store.put_stream("f.txt", one_shot(b"old")).await.unwrap();
        store.put_stream("f.txt", one_shot(b"new content")).await.unwrap();

        let data = store.read_bytes("f.txt").await.unwrap();
        assert_eq!(&data[..], b"new content");
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let (_dir, store) = store().await;

        for bad in ["../escape", "a/../../b", "/etc/passwd", ""] {
            let err = store.resolve(bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::PathViolation, "path: {bad:?}");
        }
    }

    #[tokio::test]
    async fn test_resolve_allows_curdir() {
        let (_dir, store) = store().await;
        assert!(store.resolve("./a/b").is_ok());
    }

    #[tokio::test]
    async fn test_promote_and_discard() {
        let (_dir, store) = store().await;

        let temp = ContentStore::temp_path("u/f/v1/doc.txt");
        assert!(temp.ends_with(".part"));
        store.put_stream(&temp, one_shot(b"data")).await.unwrap();

        store.promote(&temp, "u/f/v1/doc.txt").await.unwrap();
        assert!(!store.exists(&temp).await.unwrap());
        assert!(store.exists("u/f/v1/doc.txt").await.unwrap());

        // Discarding a path that no longer exists is not an error.
        store.discard(&temp).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_read_is_not_found() {
        let (_dir, store) = store().await;
        let err = store.read_bytes("nope.bin").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_version_path_layout() {
        let uid = Uuid::nil();
        let fid = Uuid::nil();
        let path = ContentStore::version_path(uid, fid, 3, "my report.pdf");
        assert_eq!(
            path,
            format!("user/{uid}/file/{fid}/v3/my_report.pdf")
        );
    }
}
