//! On-disk cache of finished reports.
//!
//! Reports are only reused when the corpus and the configuration that shaped
//! them are unchanged; anything else is discarded and rebuilt.

use crate::config::base_dir;
use crate::error::Result;
use crate::util::unix_now;
use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use widgetscope_api::{DocumentQuery, WidgetUsageIndex};
use xxhash_rust::xxh3::{Xxh3, xxh3_64};

pub const CURRENT_VERSION: u32 = 1;

/// Derives the cache key for a report over a given corpus state.
pub fn cache_key(corpus_fingerprint: u64, config_fingerprint: u64, query: &DocumentQuery) -> u64 {
    let mut hasher = Xxh3::new();
    hasher.write_u32(CURRENT_VERSION);
    hasher.write_u64(corpus_fingerprint);
    hasher.write_u64(config_fingerprint);
    hasher.write(query.marker.as_deref().unwrap_or("").as_bytes());
    for post_type in &query.post_types {
        hasher.write(b"\0type:");
        hasher.write(post_type.as_bytes());
    }
    for status in &query.statuses {
        hasher.write(b"\0status:");
        hasher.write(status.as_bytes());
    }
    hasher.finish()
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedReport {
    version: u32,
    key: u64,
    root: String,
    created_at: u64,
    index: WidgetUsageIndex,
}

#[derive(Debug, Clone)]
pub struct ReportCache {
    dir: PathBuf,
}

impl ReportCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The cache under the widgetscope base directory.
    pub fn default_location() -> Self {
        Self::new(base_dir().join("reports"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, root: &Path) -> PathBuf {
        let abs_path = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let hash = xxh3_64(abs_path.to_string_lossy().as_bytes());
        self.dir.join(format!("{:016x}.json", hash))
    }

    /// Loads the cached report for `root` if it was built under `key`.
    /// Stale or undecodable entries are removed.
    pub fn load(&self, root: &Path, key: u64) -> Option<WidgetUsageIndex> {
        let path = self.entry_path(root);
        let content = std::fs::read_to_string(&path).ok()?;

        match serde_json::from_str::<CachedReport>(&content) {
            Ok(cached) if cached.version == CURRENT_VERSION && cached.key == key => {
                tracing::debug!("Reusing cached report from {}", path.display());
                Some(cached.index)
            }
            Ok(_) => {
                tracing::info!("Cached report at {} is stale, rebuilding", path.display());
                let _ = std::fs::remove_file(&path);
                None
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse cached report at {}: {}. Discarding it.",
                    path.display(),
                    e
                );
                let _ = std::fs::remove_file(&path);
                None
            }
        }
    }

    pub fn store(&self, root: &Path, key: u64, index: &WidgetUsageIndex) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let cached = CachedReport {
            version: CURRENT_VERSION,
            key,
            root: root.display().to_string(),
            created_at: unix_now(),
            index: index.clone(),
        };
        let path = self.entry_path(root);
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), &cached)?;
        Ok(())
    }

    /// Drops the cached report for `root`. Returns whether one existed.
    pub fn invalidate(&self, root: &Path) -> Result<bool> {
        let path = self.entry_path(root);
        if path.exists() {
            std::fs::remove_file(path)?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn clear_all(&self) -> Result<()> {
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}
