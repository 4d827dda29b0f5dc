//! Key-value persistence for user preferences.
//!
//! Values are stored as JSON so the same keys and encodings work for any
//! backend: `recentSearches` holds an array of city names and
//! `temperatureUnit` holds a boolean (`true` for Celsius).

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

pub const RECENT_SEARCHES_KEY: &str = "recentSearches";
pub const TEMPERATURE_UNIT_KEY: &str = "temperatureUnit";

pub trait PreferenceStore: Send + Debug {
    /// Stored value for `key`, or `None` if nothing usable is stored.
    fn load(&self, key: &str) -> Option<Value>;

    fn save(&mut self, key: &str, value: &Value) -> Result<()>;
}

/// Process-local store, lost on exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: Value) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<()> {
        self.values.insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// Store backed by one JSON object file, rewritten on every save.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl FileStore {
    /// Open the store at `path`. A missing or unreadable file starts an empty store.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = read_values(&path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "ignoring stored preferences");
            Map::new()
        });

        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_values(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read preferences file: {}", path.display()))?;

    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse preferences file: {}", path.display()))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Preferences file is not a JSON object: {}", path.display()),
    }
}

impl PreferenceStore for FileStore {
    fn load(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<()> {
        self.values.insert(key.to_string(), value.clone());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&self.values)
            .context("Failed to serialize preferences to JSON")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences file: {}", self.path.display()))?;

        Ok(())
    }
}
