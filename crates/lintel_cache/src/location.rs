//! Cache file location.

use std::path::{Path, PathBuf};

/// File name appended to a directory override.
pub const CACHE_FILE_NAME: &str = "cache.json";

/// Location used when no override is configured.
pub const DEFAULT_CACHE_LOCATION: &str = "node_modules/.cache/lintel/cache.json";

/// Package manifest whose changes invalidate the whole cache.
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Resolves the cache file path from an optional override.
///
/// An override ending in `.json` (in any case) names the file itself; any
/// other override is treated as a directory.
pub fn resolve_cache_location(location: Option<&Path>) -> PathBuf {
    match location {
        Some(path) if has_json_extension(path) => path.to_path_buf(),
        Some(dir) => dir.join(CACHE_FILE_NAME),
        None => PathBuf::from(DEFAULT_CACHE_LOCATION),
    }
}

/// Returns the package manifest next to a config file.
pub fn manifest_sentinel(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map_or_else(|| PathBuf::from(PACKAGE_MANIFEST), |dir| dir.join(PACKAGE_MANIFEST))
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
