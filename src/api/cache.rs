use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::shots::RawTable;

const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    key: String,
    fetched_at: String,
    table: RawTable,
}

/// One JSON file per request fingerprint. No expiry.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: Option<PathBuf>,
    enabled: bool,
}

impl ResponseCache {
    pub fn new(dir: Option<PathBuf>, enabled: bool) -> Self {
        if enabled {
            if let Some(dir) = dir.as_ref() {
                fs::create_dir_all(dir).ok();
            }
        }
        Self { dir, enabled }
    }

    pub fn disabled() -> Self {
        Self {
            dir: None,
            enabled: false,
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn path_for(&self, key: &str) -> Option<PathBuf> {
        let safe = key.replace(['/', ':'], "_");
        self.dir.as_ref().map(|d| d.join(format!("{safe}.json")))
    }

    /// Cached table for `key`; unreadable or stale-format files are misses.
    pub fn load(&self, key: &str) -> Option<RawTable> {
        if !self.enabled {
            return None;
        }
        let path = self.path_for(key)?;
        let raw = fs::read_to_string(&path).ok()?;
        let Ok(file) = serde_json::from_str::<CacheFile>(&raw) else {
            debug!(path = %path.display(), "ignoring unreadable cache file");
            return None;
        };
        if file.version != CACHE_VERSION {
            return None;
        }
        debug!(key, fetched_at = %file.fetched_at, "stats cache hit");
        Some(file.table)
    }

    /// Writes `table` under `key`. Failures are logged, never raised.
    pub fn store(&self, key: &str, table: &RawTable) {
        if !self.enabled {
            return;
        }
        if let Err(err) = self.write(key, table) {
            warn!(key, "stats cache write failed: {err:#}");
        }
    }

    fn write(&self, key: &str, table: &RawTable) -> Result<()> {
        let Some(path) = self.path_for(key) else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("create cache dir")?;
        }
        let file = CacheFile {
            version: CACHE_VERSION,
            key: key.to_string(),
            fetched_at: Utc::now().to_rfc3339(),
            table: table.clone(),
        };
        let json = serde_json::to_string(&file).context("serialize cache entry")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).context("write cache entry")?;
        fs::rename(&tmp, &path).context("swap cache entry")?;
        Ok(())
    }

    /// Deletes every cache file, returning how many were removed.
    pub fn clear(&self) -> usize {
        let Some(dir) = self.dir.as_ref() else {
            return 0;
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return 0;
        };
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .filter(|p| fs::remove_file(p).is_ok())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseCache;
    use crate::shots::{RawTable, RawValue};

    #[test]
    fn fingerprint_separators_are_flattened() {
        let cache = ResponseCache::new(Some("/tmp/x".into()), false);
        let path = cache.path_for("game_shots_a/b:c_all").unwrap();
        assert!(path.ends_with("game_shots_a_b_c_all.json"));
    }

    #[test]
    fn disabled_cache_never_hits() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(Some(dir.path().to_path_buf()), false);
        let table = RawTable::new(vec!["a".into()], vec![vec![RawValue::Int(1)]]);
        cache.store("k", &table);
        assert!(cache.load("k").is_none());
        assert!(!dir.path().join("k.json").exists());
    }
}
