//! In-memory option store

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::OptionStore;
use crate::error::{LicenseError, LicenseResult};

/// In-memory option store backed by `HashMap<String, Value>`
pub struct MemoryStore {
    options: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create a new empty MemoryStore
    pub fn new() -> Self {
        Self {
            options: RwLock::new(HashMap::new()),
        }
    }

    /// Number of options written so far
    pub fn len(&self) -> usize {
        self.options.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionStore for MemoryStore {
    fn get(&self, name: &str) -> LicenseResult<Option<Value>> {
        let options = self
            .options
            .read()
            .map_err(|e| LicenseError::Store(format!("lock poisoned: {e}")))?;
        Ok(options.get(name).cloned())
    }

    fn set(&self, name: &str, value: Value) -> LicenseResult<()> {
        let mut options = self
            .options
            .write()
            .map_err(|e| LicenseError::Store(format!("lock poisoned: {e}")))?;
        options.insert(name.to_string(), value);
        Ok(())
    }
}
