use crate::persistence::files::{atomic_write, read_file};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Well-known store keys. Together they are the whole persisted schema.
pub const KEY_USER_ID: &str = "userId";
pub const KEY_USER_PW: &str = "userPw";
pub const KEY_STUDY_DATA: &str = "studyData";
pub const KEY_PERSISTENT_TIMERS: &str = "persistentTimers";
pub const KEY_TODO_DATA: &str = "todoData";

/// A process-wide key-value store of JSON documents. Writes are synchronous
/// full-snapshot overwrites, last-writer-wins; absent keys read as None.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// Read a key and deserialize it into a typed document
pub fn get_typed<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(value) => {
            let typed = serde_json::from_value(value)
                .with_context(|| format!("Malformed document under key \"{}\"", key))?;
            Ok(Some(typed))
        }
        None => Ok(None),
    }
}

/// Serialize a typed document and write it under a key
pub fn set_typed<S: KeyValueStore, T: Serialize>(store: &mut S, key: &str, value: &T) -> Result<()> {
    let value = serde_json::to_value(value)
        .with_context(|| format!("Failed to serialize document for key \"{}\"", key))?;
    store.set(key, value)
}

/// Store backed by one JSON file per key inside the data directory
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Open the store over the resolved swot data directory
    pub fn open_default() -> Result<Self> {
        let dir = crate::persistence::files::ensure_data_dir()?;
        Ok(Self::new(dir))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let content = read_file(self.key_path(key))?;
        if content.is_empty() {
            return Ok(None);
        }
        let value = serde_json::from_str(&content)
            .with_context(|| format!("Malformed JSON under key \"{}\"", key))?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let content = serde_json::to_string_pretty(&value)
            .with_context(|| format!("Failed to serialize value for key \"{}\"", key))?;
        atomic_write(self.key_path(key), &content)
    }
}

/// In-memory store for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
