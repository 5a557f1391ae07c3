use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// JSON-file-backed key/value store for editor preferences. Mutations are
/// written through immediately; a failing write is reported but never
/// stops the editor.
pub struct EditorPrefs {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl EditorPrefs {
    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = Self::load_values(&path);
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), Value::Bool(value));
        self.persist();
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string())
    }

    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), Value::String(value.into()));
        self.persist();
    }

    pub fn delete_key(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.persist();
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn load_values(path: &Path) -> BTreeMap<String, Value> {
        if !path.exists() {
            return BTreeMap::new();
        }
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => {
                eprintln!("[prefs] failed to read {}: {err}", path.display());
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&data) {
            Ok(values) => values,
            Err(err) => {
                eprintln!("[prefs] failed to parse {}: {err}", path.display());
                BTreeMap::new()
            }
        }
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(err) = fs::create_dir_all(parent) {
                    eprintln!("[prefs] failed to create {}: {err}", parent.display());
                    return;
                }
            }
        }
        let data = match serde_json::to_string_pretty(&self.values) {
            Ok(data) => data,
            Err(err) => {
                eprintln!("[prefs] failed to serialize preferences: {err}");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, data) {
            eprintln!("[prefs] failed to write {}: {err}", self.path.display());
        }
    }
}
