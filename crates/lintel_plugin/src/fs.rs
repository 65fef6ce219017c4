//! File system access used by the linter and the cache.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

/// Host file system.
pub trait FileSystem: Sync {
    /// Reads a file as UTF-8 text. Returns `None` if it cannot be read.
    fn read_file_text(&self, path: &Path) -> Option<String>;

    /// Returns the last modification time in milliseconds since the epoch.
    fn last_modified(&self, path: &Path) -> Option<u64>;

    /// Writes a file, creating parent directories as needed.
    fn write_file_text(&self, path: &Path, text: &str) -> io::Result<()>;

    /// Returns the current time in milliseconds since the epoch.
    fn now_millis(&self) -> u64;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileSystem;

impl FileSystem for NativeFileSystem {
    fn read_file_text(&self, path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("Could not read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn last_modified(&self, path: &Path) -> Option<u64> {
        let modified = fs::metadata(path).ok()?.modified().ok()?;
        millis_since_epoch(modified)
    }

    fn write_file_text(&self, path: &Path, text: &str) -> io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)
    }

    fn now_millis(&self) -> u64 {
        millis_since_epoch(SystemTime::now()).unwrap_or(0)
    }
}

fn millis_since_epoch(time: SystemTime) -> Option<u64> {
    let elapsed = time.duration_since(UNIX_EPOCH).ok()?;
    u64::try_from(elapsed.as_millis()).ok()
}
