//! Loading and validating the persisted cache.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use lintel_plugin::FileSystem;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{CacheSnapshot, FileCacheEntry, codec, manifest_sentinel};

/// Loads the cache and returns the entries that are still valid.
///
/// Returns `None` when there is no usable cache at all: the file is missing or
/// undecodable, or the config file or package manifest changed since it was
/// written. Otherwise every file in `all_file_paths` that is missing from the
/// returned map needs fresh analysis.
///
/// An entry is valid when its file is not newer than the entry, every declared
/// dependency is still part of `all_file_paths`, and no dependency is itself
/// invalid. Entries for files outside `all_file_paths` are dropped.
pub fn load_cache(
    fs: &dyn FileSystem,
    cache_path: &Path,
    all_file_paths: &BTreeSet<PathBuf>,
    config_path: &Path,
) -> Option<HashMap<PathBuf, FileCacheEntry>> {
    load_cache_excluding(fs, cache_path, all_file_paths, config_path, &BTreeSet::new())
}

/// Like [`load_cache`], but also treats every path in `modified` as invalid.
///
/// Used when the caller itself rewrote files since the cache was saved. Their
/// mtimes may not be newer than the entries when both fall in the same clock
/// tick. Files depending on them are invalidated transitively.
pub fn load_cache_excluding(
    fs: &dyn FileSystem,
    cache_path: &Path,
    all_file_paths: &BTreeSet<PathBuf>,
    config_path: &Path,
    modified: &BTreeSet<PathBuf>,
) -> Option<HashMap<PathBuf, FileCacheEntry>> {
    let Some(payload) = fs.read_file_text(cache_path) else {
        debug!("No cache file found at {}", cache_path.display());
        return None;
    };

    let snapshot = match codec::decode(&payload) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Ignoring cache at {}: {}", cache_path.display(), e);
            return None;
        }
    };

    let sentinel = manifest_sentinel(config_path);
    for path in [config_path, sentinel.as_path()] {
        if !is_config_fresh(fs, &snapshot, path) {
            info!("{} changed, discarding the whole cache", path.display());
            return None;
        }
    }

    let valid = validate_entries(fs, snapshot, all_file_paths, modified);
    info!("Loaded {} valid cache entries", valid.len());
    Some(valid)
}

fn is_config_fresh(fs: &dyn FileSystem, snapshot: &CacheSnapshot, path: &Path) -> bool {
    let Some(&stored) = snapshot.configs.get(path) else {
        debug!("{} is not recorded in the cache", path.display());
        return false;
    };
    // A config that cannot be stat'ed, such as an absent package manifest,
    // counts as unchanged.
    fs.last_modified(path)
        .is_none_or(|modified| modified <= stored)
}

fn validate_entries(
    fs: &dyn FileSystem,
    snapshot: CacheSnapshot,
    all_file_paths: &BTreeSet<PathBuf>,
    rewritten: &BTreeSet<PathBuf>,
) -> HashMap<PathBuf, FileCacheEntry> {
    let mut files: HashMap<PathBuf, FileCacheEntry> = snapshot.files.into_iter().collect();

    let modified: HashMap<&Path, Option<u64>> = all_file_paths
        .par_iter()
        .filter(|path| files.contains_key(*path))
        .map(|path| (path.as_path(), fs.last_modified(path)))
        .collect();

    let mut invalidated: HashSet<PathBuf> = HashSet::new();
    let mut worklist: Vec<PathBuf> = Vec::new();

    for path in all_file_paths {
        let valid = !rewritten.contains(path)
            && files.get(path).is_some_and(|entry| {
                entry
                    .dependencies()
                    .all(|dependency| all_file_paths.contains(dependency))
                    && modified
                        .get(path.as_path())
                        .copied()
                        .flatten()
                        .is_some_and(|modified| !entry.is_stale(modified))
            });

        if !valid {
            files.remove(path);
            invalidated.insert(path.clone());
            worklist.push(path.clone());
        }
    }

    let dependents = dependents_graph(&files);

    while let Some(path) = worklist.pop() {
        let Some(paths) = dependents.get(&path) else {
            continue;
        };
        for dependent in paths {
            if invalidated.insert(dependent.clone()) {
                debug!(
                    "{} invalidated through its dependency on {}",
                    dependent.display(),
                    path.display()
                );
                files.remove(dependent);
                worklist.push(dependent.clone());
            }
        }
    }

    files.retain(|path, _| all_file_paths.contains(path));
    files
}

/// Maps each dependency to the files that declare it.
fn dependents_graph(files: &HashMap<PathBuf, FileCacheEntry>) -> HashMap<PathBuf, Vec<PathBuf>> {
    let mut dependents: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();
    for (path, entry) in files {
        for dependency in entry.dependencies() {
            dependents
                .entry(dependency.to_path_buf())
                .or_default()
                .push(path.clone());
        }
    }
    dependents
}
