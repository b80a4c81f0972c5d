//! Shared installation-context store.
//!
//! The installer shares decisions between the interactive steps and the
//! provisioning jobs through a flat key/value store. This crate only consumes
//! it through [`ContextStore`]; two implementations are provided.

mod file;

pub use file::JsonFileContext;

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// `true` for an online install, `false` for offline.
pub const INSTALL_TYPE_KEY: &str = "isOnlineInstall";
/// Whether the provisioning phase rewrites the target mirror list.
pub const UPDATE_MIRROR_LIST_KEY: &str = "updateMirrorList";
pub const MIRROR_REGION_KEY: &str = "selectedMirrorRegion";
/// Canonical URL of the selected server.
pub const MIRROR_SERVER_KEY: &str = "selectedMirrorServer";

pub trait ContextStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn insert(&self, key: &str, value: Value);

    /// Inserts all entries so that no reader observes a partial update.
    fn insert_many(&self, entries: &[(&str, Value)]) {
        for (key, value) in entries {
            self.insert(key, value.clone());
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Reads a boolean entry. Missing or non-boolean values read as `false`.
    fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    /// Reads a string entry. Missing or non-string values read as empty.
    fn get_string(&self, key: &str) -> String {
        self.get(key)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct MemoryContext {
    values: Mutex<BTreeMap<String, Value>>,
}

impl MemoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        lock(&self.values).clone()
    }
}

impl ContextStore for MemoryContext {
    fn get(&self, key: &str) -> Option<Value> {
        lock(&self.values).get(key).cloned()
    }

    fn insert(&self, key: &str, value: Value) {
        lock(&self.values).insert(key.to_string(), value);
    }

    fn insert_many(&self, entries: &[(&str, Value)]) {
        let mut values = lock(&self.values);
        for (key, value) in entries {
            values.insert(key.to_string(), value.clone());
        }
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_context_roundtrip() {
        let ctx = MemoryContext::new();
        assert!(!ctx.contains(INSTALL_TYPE_KEY));
        ctx.insert(INSTALL_TYPE_KEY, json!(true));
        assert_eq!(ctx.get(INSTALL_TYPE_KEY), Some(json!(true)));
        assert!(ctx.get_bool(INSTALL_TYPE_KEY));
    }

    #[test]
    fn typed_getters_default_on_mismatch() {
        let ctx = MemoryContext::new();
        ctx.insert(UPDATE_MIRROR_LIST_KEY, json!("yes"));
        ctx.insert(MIRROR_REGION_KEY, json!(3));
        assert!(!ctx.get_bool(UPDATE_MIRROR_LIST_KEY));
        assert_eq!(ctx.get_string(MIRROR_REGION_KEY), "");
        assert_eq!(ctx.get_string(MIRROR_SERVER_KEY), "");
    }

    #[test]
    fn insert_many_sets_all_entries() {
        let ctx = MemoryContext::new();
        ctx.insert_many(&[
            (MIRROR_REGION_KEY, json!("Austria")),
            (MIRROR_SERVER_KEY, json!("https://mirror.easyname.at/archlinux")),
        ]);
        let snapshot = ctx.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[MIRROR_REGION_KEY], json!("Austria"));
    }
}
