use std::collections::HashMap;
use std::sync::Arc;

use log::{error, warn};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Unified data-access trait. Every persistence operation goes through here.
/// Implementations: `SqliteStore` (wraps rusqlite/r2d2) and `MemoryStore`.
pub trait Store: Send + Sync {
    // ── Lifecycle ───────────────────────────────────────────────────
    fn run_migrations(&self) -> Result<(), String>;
    fn seed_defaults(&self) -> Result<(), String>;

    // ── Settings ────────────────────────────────────────────────────
    fn setting_get(&self, key: &str) -> Option<String>;
    fn setting_get_or(&self, key: &str, default: &str) -> String {
        self.setting_get(key).unwrap_or_else(|| default.to_string())
    }
    fn setting_get_i64(&self, key: &str) -> i64 {
        self.setting_get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }
    #[cfg(test)]
    fn setting_set(&self, key: &str, value: &str) -> Result<(), String>;
    fn setting_all(&self) -> HashMap<String, String>;

    // ── Visitor storage ─────────────────────────────────────────────
    // `scope` partitions entries per visitor; see `crate::visitor`.
    fn storage_get(&self, scope: &str, key: &str) -> Result<Option<String>, String>;
    fn storage_set(&self, scope: &str, key: &str, value: &str) -> Result<(), String>;
    fn storage_remove(&self, scope: &str, key: &str) -> Result<(), String>;
    /// Bytes used by a scope (key + value lengths).
    fn storage_usage(&self, scope: &str) -> Result<usize, String>;
}

/// Open the SQLite store at `path`, migrated and seeded.
/// Falls back to an in-memory store so the site stays up when the
/// database cannot be opened; visitor data then lives only as long as
/// the process.
pub fn open(path: &str) -> Arc<dyn Store> {
    let sqlite = SqliteStore::new_at(path).and_then(|s| {
        s.run_migrations()?;
        s.seed_defaults()?;
        Ok(s)
    });

    match sqlite {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Database unavailable at {}: {}", path, e);
            warn!("Continuing with in-memory storage; visitor data will not survive a restart");
            Arc::new(MemoryStore::seeded())
        }
    }
}
