use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::db::DEFAULT_SETTINGS;

use super::Store;

/// In-process implementation of the Store trait.
/// Used when the database cannot be opened, and by tests.
pub struct MemoryStore {
    settings: Mutex<HashMap<String, String>>,
    entries: Mutex<HashMap<(String, String), String>>,
    writes_disabled: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            settings: Mutex::new(HashMap::new()),
            entries: Mutex::new(HashMap::new()),
            writes_disabled: AtomicBool::new(false),
        }
    }

    /// A store with the default settings already applied.
    pub fn seeded() -> Self {
        let store = Self::new();
        let _ = store.seed_defaults();
        store
    }

    /// Make every visitor-storage write fail, like a browser with storage disabled.
    #[cfg(test)]
    pub fn disable_writes(&self) {
        self.writes_disabled.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), String> {
        if self.writes_disabled.load(Ordering::SeqCst) {
            Err("storage is disabled".to_string())
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn run_migrations(&self) -> Result<(), String> {
        Ok(())
    }

    fn seed_defaults(&self) -> Result<(), String> {
        let mut map = self.settings.lock().map_err(|e| e.to_string())?;
        for (key, value) in DEFAULT_SETTINGS {
            map.entry(key.to_string()).or_insert_with(|| value.to_string());
        }
        Ok(())
    }

    fn setting_get(&self, key: &str) -> Option<String> {
        self.settings.lock().ok()?.get(key).cloned()
    }

    #[cfg(test)]
    fn setting_set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut map = self.settings.lock().map_err(|e| e.to_string())?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn setting_all(&self) -> HashMap<String, String> {
        self.settings
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    fn storage_get(&self, scope: &str, key: &str) -> Result<Option<String>, String> {
        let map = self.entries.lock().map_err(|e| e.to_string())?;
        Ok(map.get(&(scope.to_string(), key.to_string())).cloned())
    }

    fn storage_set(&self, scope: &str, key: &str, value: &str) -> Result<(), String> {
        self.check_writable()?;
        let mut map = self.entries.lock().map_err(|e| e.to_string())?;
        map.insert((scope.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    fn storage_remove(&self, scope: &str, key: &str) -> Result<(), String> {
        self.check_writable()?;
        let mut map = self.entries.lock().map_err(|e| e.to_string())?;
        map.remove(&(scope.to_string(), key.to_string()));
        Ok(())
    }

    fn storage_usage(&self, scope: &str) -> Result<usize, String> {
        let map = self.entries.lock().map_err(|e| e.to_string())?;
        Ok(map
            .iter()
            .filter(|((s, _), _)| s == scope)
            .map(|((_, k), v)| k.len() + v.len())
            .sum())
    }
}
