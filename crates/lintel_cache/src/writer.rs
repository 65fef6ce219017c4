//! Building and persisting the next cache snapshot.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use lintel_plugin::FileSystem;
use tracing::{info, warn};

use crate::{CacheError, CacheSnapshot, FileCacheEntry, codec, manifest_sentinel};

/// Builds the next snapshot.
///
/// Fresh entries win over carried-over ones. Carried-over entries keep their
/// original timestamp and are only kept for files still in `all_file_paths`.
/// The config file and package manifest are stamped with `now`.
pub fn build_snapshot(
    now: u64,
    config_path: &Path,
    all_file_paths: &BTreeSet<PathBuf>,
    cached: Option<&HashMap<PathBuf, FileCacheEntry>>,
    fresh: impl IntoIterator<Item = (PathBuf, FileCacheEntry)>,
) -> CacheSnapshot {
    let mut snapshot = CacheSnapshot::new();
    snapshot.configs.insert(config_path.to_path_buf(), now);
    snapshot.configs.insert(manifest_sentinel(config_path), now);

    if let Some(cached) = cached {
        snapshot.files.extend(
            cached
                .iter()
                .filter(|(path, _)| all_file_paths.contains(*path))
                .map(|(path, entry)| (path.clone(), entry.clone())),
        );
    }
    snapshot.files.extend(fresh);
    snapshot
}

/// Encodes and writes a snapshot.
pub fn save_cache(
    fs: &dyn FileSystem,
    cache_path: &Path,
    snapshot: &CacheSnapshot,
) -> Result<(), CacheError> {
    let payload = codec::encode(snapshot)?;
    fs.write_file_text(cache_path, &payload)?;
    info!(
        "Saved {} cache entries to {}",
        snapshot.len(),
        cache_path.display()
    );
    Ok(())
}

/// Writes a snapshot, logging instead of failing.
///
/// Returns true if the cache was written.
pub fn write_cache(fs: &dyn FileSystem, cache_path: &Path, snapshot: &CacheSnapshot) -> bool {
    match save_cache(fs, cache_path, snapshot) {
        Ok(()) => true,
        Err(e) => {
            warn!("Skipping cache write to {}: {}", cache_path.display(), e);
            false
        }
    }
}
