//! # lintel_cache
//!
//! Dependency-aware result cache for Lintel.
//!
//! The cache is a single JSON file mapping each linted file to the results of
//! its last analysis. An entry is reused only while its file, every file it
//! depends on, the config file and the package manifest are unchanged.
//!
//! - [`codec`]: JSON encoding and schema checking
//! - [`load_cache`]: validity check with transitive invalidation
//! - [`build_snapshot`] / [`write_cache`]: persisting the next snapshot

pub mod codec;
mod entry;
mod error;
mod loader;
mod location;
mod writer;

pub use entry::{CacheSnapshot, FileCacheEntry};
pub use error::CacheError;
pub use loader::{load_cache, load_cache_excluding};
pub use location::{
    CACHE_FILE_NAME, DEFAULT_CACHE_LOCATION, PACKAGE_MANIFEST, manifest_sentinel,
    resolve_cache_location,
};
pub use writer::{build_snapshot, save_cache, write_cache};
