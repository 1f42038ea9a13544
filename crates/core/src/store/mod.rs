//! Option storage abstraction layer
//!
//! Provides an `OptionStore` trait that decouples the license manager from
//! wherever the host keeps its settings. Two implementations:
//! - `MemoryStore`: in-memory map (tests, embedding)
//! - `JsonFileStore`: one JSON object file holding every option

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::LicenseResult;
use crate::types::{LicenseRecord, LicenseStatus};
use serde_json::Value;

/// Namespaced key-value persistence.
///
/// Writes are persisted immediately; there is no batching or transaction.
pub trait OptionStore: Send + Sync {
    /// Get an option by name, `None` if it was never written
    fn get(&self, name: &str) -> LicenseResult<Option<Value>>;

    /// Overwrite an option in place
    fn set(&self, name: &str, value: Value) -> LicenseResult<()>;
}

impl<T: OptionStore + ?Sized> OptionStore for Box<T> {
    fn get(&self, name: &str) -> LicenseResult<Option<Value>> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: Value) -> LicenseResult<()> {
        (**self).set(name, value)
    }
}

impl<T: OptionStore + ?Sized> OptionStore for std::sync::Arc<T> {
    fn get(&self, name: &str) -> LicenseResult<Option<Value>> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: Value) -> LicenseResult<()> {
        (**self).set(name, value)
    }
}

/// Load the license bundle stored under `name`, merged over the defaults.
///
/// Fields that are missing or not strings fall back to their defaults.
pub fn load_record<S: OptionStore + ?Sized>(store: &S, name: &str) -> LicenseResult<LicenseRecord> {
    match store.get(name)? {
        Some(Value::Object(map)) => Ok(LicenseRecord {
            key: map
                .get("key")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            status: map
                .get("status")
                .and_then(Value::as_str)
                .map(LicenseStatus::from)
                .unwrap_or_default(),
        }),
        _ => Ok(LicenseRecord::default()),
    }
}

/// Persist the license bundle under `name`.
pub fn save_record<S: OptionStore + ?Sized>(
    store: &S,
    name: &str,
    record: &LicenseRecord,
) -> LicenseResult<()> {
    store.set(name, serde_json::to_value(record)?)
}
