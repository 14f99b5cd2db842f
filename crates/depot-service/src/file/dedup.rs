//! Deduplication resolver.
//!
//! Decides whether a freshly-streamed upload can alias an existing
//! physical object or must be committed as new bytes. Checksum equality
//! alone is not sufficient: a prior version's physical file may have been
//! removed by the deletion of an unrelated logical file (version paths are
//! shared under deduplication), so every candidate is verified present on
//! disk before it is accepted as canonical.

use std::sync::Arc;

use tracing::debug;

use depot_core::result::AppResult;
use depot_database::repositories::VersionRepository;
use depot_storage::ContentStore;

/// Result of resolving one upload against existing content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupOutcome {
    /// Storage path the new version record should reference.
    pub storage_path: String,
    /// Size of the content at that path.
    pub size_bytes: i64,
    /// Whether an existing physical object was reused.
    pub was_deduplicated: bool,
}

/// Resolves upload content against the version ledger.
#[derive(Clone)]
pub struct DedupResolver {
    /// Version ledger lookups.
    version_repo: Arc<dyn VersionRepository>,
    /// Physical existence checks and temp-file promotion.
    store: Arc<ContentStore>,
}

impl std::fmt::Debug for DedupResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupResolver").finish()
    }
}

impl DedupResolver {
    /// Creates a new resolver.
    pub fn new(version_repo: Arc<dyn VersionRepository>, store: Arc<ContentStore>) -> Self {
        Self {
            version_repo,
            store,
        }
    }

    /// Resolve an upload: alias the first checksum-matching version whose
    /// content still exists on disk, discarding the temp file; otherwise
    /// promote the temp file to `final_rel` as the new canonical location
    /// for this checksum.
    ///
    /// Candidates are visited in ascending id order (ids are time-ordered)
    /// so the outcome is deterministic.
    pub async fn resolve(
        &self,
        checksum: &str,
        size_bytes: i64,
        temp_rel: &str,
        final_rel: &str,
    ) -> AppResult<DedupOutcome> {
        let candidates = self.version_repo.find_by_checksum(checksum).await?;

        for candidate in candidates {
            if self.store.exists(&candidate.storage_path).await? {
                self.store.discard(temp_rel).await?;
                debug!(
                    checksum,
                    path = %candidate.storage_path,
                    "Upload deduplicated against existing content"
                );
                return Ok(DedupOutcome {
                    storage_path: candidate.storage_path,
                    size_bytes: candidate.size_bytes,
                    was_deduplicated: true,
                });
            }
        }

        self.store.promote(temp_rel, final_rel).await?;
        Ok(DedupOutcome {
            storage_path: final_rel.to_string(),
            size_bytes,
            was_deduplicated: false,
        })
    }
}
