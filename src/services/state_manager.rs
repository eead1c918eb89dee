// StateManager Service
// Durable key-value state shared by the shell services

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use serde_json::{Map, Value};

const STATE_FILE_NAME: &str = "storage.json";
const APP_DIR_NAME: &str = "theme-background";
const DATA_DIR_ENV: &str = "THEME_BACKGROUND_DATA_DIR";

/// String-valued key-value store that survives restarts.
///
/// Reads and writes are infallible from the caller's side; implementations
/// deal with their own I/O failures.
pub trait StateStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str);

    fn remove_item(&self, key: &str);

    /// Read a key, substituting `default` when it is absent
    fn get_item_or(&self, key: &str, default: &str) -> String {
        self.get_item(key).unwrap_or_else(|| default.to_string())
    }
}

/// Resolve the app data directory.
///
/// `THEME_BACKGROUND_DATA_DIR` wins when set, otherwise the platform data dir is used.
pub fn resolve_app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    dirs_next::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(APP_DIR_NAME))
}

/// JSON file backed state store
pub struct StateManager {
    state_path: PathBuf,
    cache: RwLock<Option<Map<String, Value>>>,
}

impl StateManager {
    /// Create a new StateManager storing its file in the given app data directory
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            state_path: app_data_dir.join(STATE_FILE_NAME),
            cache: RwLock::new(None),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Drop the cache and re-read the state file
    pub fn reload(&self) -> Result<(), String> {
        let state = self.read_from_disk()?;
        *self.cache_guard() = Some(state);
        Ok(())
    }

    /// Write the cached state to disk
    pub fn flush(&self) -> Result<(), String> {
        let mut cache = self.cache_guard();
        let state = cache.get_or_insert_with(|| self.load_or_empty());
        self.save_internal(state)
    }

    fn cache_guard(&self) -> RwLockWriteGuard<'_, Option<Map<String, Value>>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_or_empty(&self) -> Map<String, Value> {
        self.read_from_disk().unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable state file {:?}: {e}", self.state_path);
            Map::new()
        })
    }

    fn lookup(&self, key: &str) -> Option<String> {
        if let Ok(cache) = self.cache.read() {
            if let Some(ref state) = *cache {
                return string_value(state, key);
            }
        }

        let mut cache = self.cache_guard();
        let state = cache.get_or_insert_with(|| self.load_or_empty());
        string_value(state, key)
    }

    fn read_from_disk(&self) -> Result<Map<String, Value>, String> {
        if !self.state_path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.state_path)
            .map_err(|e| format!("Failed to read state: {e}"))?;

        match serde_json::from_str::<Value>(&content)
            .map_err(|e| format!("Failed to parse state: {e}"))?
        {
            Value::Object(map) => Ok(map),
            _ => Err("Failed to parse state: top-level value is not an object".to_string()),
        }
    }

    // Load, mutate and save under one write guard so concurrent writers never
    // start from the same stale copy
    fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let mut cache = self.cache_guard();
        let state = cache.get_or_insert_with(|| self.load_or_empty());
        mutate(state);

        if let Err(e) = self.save_internal(state) {
            log::warn!("{e}");
        }
    }

    fn save_internal(&self, state: &Map<String, Value>) -> Result<(), String> {
        if let Some(parent) = self.state_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create state directory: {e}"))?;
        }

        let content = serde_json::to_string_pretty(state)
            .map_err(|e| format!("Failed to serialize state: {e}"))?;

        std::fs::write(&self.state_path, content)
            .map_err(|e| format!("Failed to write state: {e}"))
    }
}

impl StateStore for StateManager {
    fn get_item(&self, key: &str) -> Option<String> {
        self.lookup(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        self.update(|state| {
            state.insert(key.to_string(), Value::String(value.to_string()));
        });
    }

    fn remove_item(&self, key: &str) {
        self.update(|state| {
            state.remove(key);
        });
    }
}

fn string_value(state: &Map<String, Value>, key: &str) -> Option<String> {
    match state.get(key) {
        Some(Value::String(value)) => Some(value.clone()),
        _ => None,
    }
}

/// Non-durable state store for tests and headless hosts
#[derive(Default)]
pub struct MemoryStateStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Ok(mut items) = self.items.write() {
            items.insert(key.to_string(), value.to_string());
        }
    }

    fn remove_item(&self, key: &str) {
        if let Ok(mut items) = self.items.write() {
            items.remove(key);
        }
    }
}
