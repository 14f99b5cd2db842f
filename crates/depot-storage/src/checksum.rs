//! Streaming checksum engine for uploads.
//!
//! Consumes an upload stream once, simultaneously writing every chunk to a
//! temporary content-store path and feeding a SHA-256 hasher, so the digest
//! and byte count come out of a single pass over the bytes.

use futures::stream::StreamExt;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use depot_core::error::{AppError, ErrorKind};
use depot_core::result::AppResult;

use crate::store::{ByteStream, ContentStore};

/// Result of streaming an upload through the checksum engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDigest {
    /// Total number of bytes consumed.
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 digest of the content.
    pub sha256_hex: String,
}

/// Streams upload bytes to a temp path while computing their digest,
/// enforcing the configured upload size cap.
#[derive(Debug, Clone)]
pub struct ChecksumEngine {
    /// Maximum accepted upload size in bytes.
    max_bytes: u64,
}

impl ChecksumEngine {
    /// Create an engine with the given size cap.
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Return the configured size cap.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Cheap pre-check against a declared size (e.g. `Content-Length`),
    /// so oversized uploads fail before a single byte is written.
    pub fn check_declared_size(&self, declared: Option<u64>) -> AppResult<()> {
        if let Some(size) = declared {
            if size > self.max_bytes {
                return Err(AppError::size_limit(format!(
                    "Upload of {size} bytes exceeds the {} byte limit",
                    self.max_bytes
                )));
            }
        }
        Ok(())
    }

    /// Consume `stream`, writing chunks to `temp_rel` inside `store` and
    /// hashing them as they pass through.
    ///
    /// On any failure (including the size cap tripping mid-stream) the
    /// partially-written temp file is removed before the error propagates,
    /// so an aborted upload leaves nothing behind at the temp path.
    pub async fn stream_to_temp(
        &self,
        store: &ContentStore,
        temp_rel: &str,
        mut stream: ByteStream,
    ) -> AppResult<StreamDigest> {
        let temp_abs = store.resolve(temp_rel)?;
        if let Some(parent) = temp_abs.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to create temp directory", e)
            })?;
        }

        let mut file = fs::File::create(&temp_abs).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create temp file: {temp_rel}"),
                e,
            )
        })?;

        let mut hasher = Sha256::new();
        let mut total_bytes = 0u64;

        let result: AppResult<()> = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Upload stream read error", e)
                })?;
                total_bytes += chunk.len() as u64;
                if total_bytes > self.max_bytes {
                    return Err(AppError::size_limit(format!(
                        "Upload exceeds the {} byte limit",
                        self.max_bytes
                    )));
                }
                hasher.update(&chunk);
                file.write_all(&chunk).await.map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Failed to write upload chunk", e)
                })?;
            }
            file.flush().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to flush upload", e)
            })?;
            Ok(())
        }
        .await;

        if let Err(e) = result {
            drop(file);
            let _ = fs::remove_file(&temp_abs).await;
            return Err(e);
        }

        let digest = StreamDigest {
            size_bytes: total_bytes,
            sha256_hex: format!("{:x}", hasher.finalize()),
        };
        debug!(
            path = temp_rel,
            bytes = digest.size_bytes,
            checksum = %digest.sha256_hex,
            "Streamed upload to temp path"
        );
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use depot_core::error::ErrorKind;
    use futures::stream;

    fn chunked(chunks: Vec<&'static [u8]>) -> ByteStream {
        Box::pin(stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, std::io::Error>(Bytes::from_static(c)))
                .collect::<Vec<_>>(),
        ))
    }

    async fn setup() -> (tempfile::TempDir, ContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::new(dir.path().to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_digest_matches_known_vector() {
        let (_dir, store) = setup().await;
        let engine = ChecksumEngine::new(1024);

        let digest = engine
            .stream_to_temp(&store, "t.part", chunked(vec![b"abc"]))
            .await
            .unwrap();

        assert_eq!(digest.size_bytes, 3);
        assert_eq!(
            digest.sha256_hex,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(&store.read_bytes("t.part").await.unwrap()[..], b"abc");
    }

    #[tokio::test]
    async fn test_chunking_does_not_change_digest() {
        let (_dir, store) = setup().await;
        let engine = ChecksumEngine::new(1024);

        let whole = engine
            .stream_to_temp(&store, "a.part", chunked(vec![b"hello world"]))
            .await
            .unwrap();
        let split = engine
            .stream_to_temp(&store, "b.part", chunked(vec![b"hello", b" ", b"world"]))
            .await
            .unwrap();

        assert_eq!(whole, split);
    }

    #[tokio::test]
    async fn test_declared_size_fails_fast() {
        let engine = ChecksumEngine::new(100);
        assert!(engine.check_declared_size(Some(100)).is_ok());
        assert!(engine.check_declared_size(None).is_ok());

        let err = engine.check_declared_size(Some(101)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SizeLimitExceeded);
    }

    #[tokio::test]
    async fn test_size_cap_mid_stream_cleans_temp() {
        let (_dir, store) = setup().await;
        let engine = ChecksumEngine::new(8);

        let err = engine
            .stream_to_temp(&store, "big.part", chunked(vec![b"12345", b"67890"]))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::SizeLimitExceeded);
        assert!(!store.exists("big.part").await.unwrap());
    }
}
