use super::{lock, ContextStore};
use crate::atomic::write_atomic;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Context store backed by a JSON object on disk.
///
/// Entries live in memory; [`JsonFileContext::flush`] persists them. This is
/// how the interactive phase hands its decisions to a later provisioning run.
#[derive(Debug)]
pub struct JsonFileContext {
    path: PathBuf,
    values: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileContext {
    /// Opens the store at `path`, starting empty when the file does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read context file: {}", path.display()))?;
            serde_json::from_str(&content).context("Failed to parse context file")?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(&self) -> Result<()> {
        let payload = {
            let values = lock(&self.values);
            serde_json::to_string_pretty(&*values).context("Failed to serialize context")?
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create context directory: {}", parent.display())
            })?;
        }
        write_atomic(&self.path, payload.as_bytes()).with_context(|| {
            format!(
                "Failed to atomically replace context file: {}",
                self.path.display()
            )
        })
    }
}

impl ContextStore for JsonFileContext {
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
