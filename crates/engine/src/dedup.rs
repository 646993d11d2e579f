//! Dedup cache — file-backed record of victims already notified per region.
//!
//! Once a victim id is marked for a region it is never reported for that
//! region again, including across restarts. The whole cache is rewritten on
//! every save (temp file + rename) so a reader never sees a half-written file.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use leakwatch_common::error::AppError;
use leakwatch_common::types::VictimRecord;

/// Region display name → ids already notified, in insertion order.
type SeenIds = BTreeMap<String, Vec<Value>>;

/// File-backed per-region set of notified victim ids.
#[derive(Debug)]
pub struct DedupCache {
    path: PathBuf,
    seen: SeenIds,
}

impl DedupCache {
    /// An empty cache that will be saved to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seen: SeenIds::new(),
        }
    }

    /// Load the cache from `path`.
    ///
    /// A missing file yields an empty cache. So does an unreadable or corrupt
    /// one, after logging a warning; the next save replaces it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No victim cache found, starting empty");
                return Self::empty(path);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read victim cache, starting empty");
                return Self::empty(path);
            }
        };

        match serde_json::from_str::<SeenIds>(&contents) {
            Ok(seen) => {
                tracing::info!(
                    path = %path.display(),
                    regions = seen.len(),
                    "Loaded victim cache"
                );
                Self { path, seen }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Victim cache is corrupt, starting empty");
                Self::empty(path)
            }
        }
    }

    /// Whether `record` has not yet been notified for `region`.
    pub fn is_new(&self, region: &str, record: &VictimRecord) -> bool {
        self.seen
            .get(region)
            .is_none_or(|ids| !ids.contains(&record.id))
    }

    /// Record that `record` has been notified for `region`.
    pub fn mark_seen(&mut self, region: &str, record: &VictimRecord) {
        let ids = self.seen.entry(region.to_string()).or_default();
        if !ids.contains(&record.id) {
            ids.push(record.id.clone());
        }
    }

    /// The records not yet notified for `region`, in order.
    ///
    /// Two records sharing an id within one batch count once.
    pub fn select_new(&self, region: &str, records: Vec<VictimRecord>) -> Vec<VictimRecord> {
        let mut batch_ids: HashSet<String> = HashSet::new();

        records
            .into_iter()
            .filter(|record| self.is_new(region, record))
            .filter(|record| batch_ids.insert(record.id.to_string()))
            .collect()
    }

    /// Number of ids stored for `region`.
    pub fn seen_count(&self, region: &str) -> usize {
        self.seen.get(region).map_or(0, Vec::len)
    }

    /// Write the whole cache to disk.
    pub fn save(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "victim_cache.json".into());
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        let json = serde_json::to_string(&self.seen)?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), regions = self.seen.len(), "Saved victim cache");
        Ok(())
    }
}
