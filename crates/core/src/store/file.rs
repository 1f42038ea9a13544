//! File-backed option store (`~/.config/licman/options.json`)

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};

use super::OptionStore;
use crate::error::{LicenseError, LicenseResult};

const OPTIONS_FILENAME: &str = "options.json";

/// Returns `~/.config/licman/`, creating it if needed.
pub fn config_dir() -> Option<PathBuf> {
    let dir = dirs::config_dir()?.join("licman");
    if !dir.exists() {
        std::fs::create_dir_all(&dir).ok()?;
    }
    Some(dir)
}

/// All options in a single JSON object file.
///
/// Every read goes to disk and every write rewrites the file.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at the default location in the user's config directory.
    pub fn default_location() -> LicenseResult<Self> {
        let dir = config_dir()
            .ok_or_else(|| LicenseError::Store("could not determine config directory".to_string()))?;
        Ok(Self::new(dir.join(OPTIONS_FILENAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> LicenseResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| LicenseError::Store(format!("read {}: {e}", self.path.display())))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(LicenseError::Store(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_all(&self, options: &Map<String, Value>) -> LicenseResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| LicenseError::Store(format!("create {}: {e}", parent.display())))?;
            }
        }
        let json = serde_json::to_string_pretty(options)?;
        std::fs::write(&self.path, json)
            .map_err(|e| LicenseError::Store(format!("write {}: {e}", self.path.display())))
    }
}

impl OptionStore for JsonFileStore {
    fn get(&self, name: &str) -> LicenseResult<Option<Value>> {
        Ok(self.read_all()?.remove(name))
    }

    fn set(&self, name: &str, value: Value) -> LicenseResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| LicenseError::Store(format!("lock poisoned: {e}")))?;
        let mut options = self.read_all()?;
        options.insert(name.to_string(), value);
        self.write_all(&options)
    }
}
