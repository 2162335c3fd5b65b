use crate::store::Store;

/// Browser localStorage keeps about 5 MB per origin; mirror that by default.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// One visitor's private key-value partition.
///
/// Semantics follow `window.localStorage`: string keys, string values,
/// whole-value writes, and a per-partition quota. A write that would push
/// the partition past its quota fails and leaves the old value in place.
pub struct LocalStorage<'a> {
    store: &'a dyn Store,
    scope: String,
    quota: usize,
}

impl<'a> LocalStorage<'a> {
    /// Quota comes from the `storage_quota_bytes` setting.
    pub fn new(store: &'a dyn Store, scope: &str) -> Self {
        let quota = match store.setting_get_i64("storage_quota_bytes") {
            q if q > 0 => q as usize,
            _ => DEFAULT_QUOTA_BYTES,
        };
        Self::with_quota(store, scope, quota)
    }

    pub fn with_quota(store: &'a dyn Store, scope: &str, quota: usize) -> Self {
        LocalStorage {
            store,
            scope: scope.to_string(),
            quota,
        }
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        self.store.storage_get(&self.scope, key)
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        let used = self.store.storage_usage(&self.scope)?;
        let replaced = self
            .store
            .storage_get(&self.scope, key)?
            .map(|old| key.len() + old.len())
            .unwrap_or(0);
        let needed = used.saturating_sub(replaced) + key.len() + value.len();
        if needed > self.quota {
            return Err(format!(
                "quota exceeded: {} bytes needed, {} allowed",
                needed, self.quota
            ));
        }
        self.store.storage_set(&self.scope, key, value)
    }

    pub fn remove_item(&self, key: &str) -> Result<(), String> {
        self.store.storage_remove(&self.scope, key)
    }
}
