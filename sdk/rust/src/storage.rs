//! Where the client keeps its premium entitlement between runs.
//!
//! The only value written is the signed premium token under
//! [`keys::PREMIUM_TOKEN`]. It proves nothing locally: `restore()` always
//! re-submits it to the server. [`keys::LEGACY_PREMIUM_FLAG`] is only ever
//! read to be deleted.

use std::collections::HashMap;
#[cfg(feature = "native-storage")]
use std::io;
#[cfg(feature = "native-storage")]
use std::path::PathBuf;
use std::sync::RwLock;

/// Storage keys, shared with the browser planner's local storage namespace
pub mod keys {
    pub const PREMIUM_TOKEN: &str = concat!("ps365_", "premiumToken");
    /// Old builds stored a bare boolean here. It is never trusted.
    pub const LEGACY_PREMIUM_FLAG: &str = concat!("ps365_", "isPremium");
}

/// Storage adapter trait for custom storage implementations
pub trait StorageAdapter: Send + Sync {
    /// Get a value by key
    fn get(&self, key: &str) -> Option<String>;

    /// Set a value by key
    fn set(&self, key: &str, value: &str);

    /// Remove a value by key
    fn remove(&self, key: &str);
}

/// In-memory storage (lost when the process exits)
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(key);
        }
    }
}

/// Entitlement file on disk, a flat JSON object of storage keys.
///
/// Every change rewrites the whole file through a sibling temp file and a
/// rename, so a crash mid-write leaves the previous token in place.
#[cfg(feature = "native-storage")]
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

#[cfg(feature = "native-storage")]
impl FileStorage {
    /// Open (or start) the entitlement file at `path`, creating missing
    /// parent directories.
    ///
    /// A file that is not a JSON object of strings is treated as empty and
    /// replaced on the next write; the client then simply has no token.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e),
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn update(&self, change: impl FnOnce(&mut HashMap<String, String>)) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        change(&mut entries);

        if let Err(e) = self.persist(&entries) {
            tracing::warn!("Failed to persist {}: {}", self.path.display(), e);
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) -> io::Result<()> {
        let contents = serde_json::to_vec_pretty(entries)?;
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, contents)?;
        std::fs::rename(&staging, &self.path)
    }
}

#[cfg(feature = "native-storage")]
impl StorageAdapter for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        self.update(|entries| {
            entries.remove(key);
        });
    }
}

#[cfg(feature = "native-storage")]
impl std::fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
