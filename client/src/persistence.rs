use std::collections::HashMap;

use thiserror::Error;

pub const STORAGE_KEY: &str = "canvasState";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage error: {0}")]
    Backend(String),
}

pub trait SnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod local {
    use js_sys::Reflect;
    use wasm_bindgen::JsValue;
    use web_sys::{Storage, Window};

    use super::{SnapshotStore, StorageError};

    pub struct LocalStorageStore {
        storage: Storage,
    }

    impl LocalStorageStore {
        pub fn open(window: &Window) -> Result<Self, StorageError> {
            match window.local_storage() {
                Ok(Some(storage)) => Ok(Self { storage }),
                Ok(None) => Err(StorageError::Unavailable("no localStorage".into())),
                Err(error) => Err(StorageError::Unavailable(describe(&error))),
            }
        }
    }

    impl SnapshotStore for LocalStorageStore {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.storage
                .get_item(key)
                .map_err(|error| StorageError::Backend(describe(&error)))
        }

        fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.storage.set_item(key, value).map_err(|error| {
                if error_name(&error).as_deref() == Some("QuotaExceededError") {
                    StorageError::QuotaExceeded
                } else {
                    StorageError::Backend(describe(&error))
                }
            })
        }
    }

    fn error_name(error: &JsValue) -> Option<String> {
        Reflect::get(error, &JsValue::from_str("name"))
            .ok()?
            .as_string()
    }

    fn describe(error: &JsValue) -> String {
        error
            .as_string()
            .or_else(|| error_name(error))
            .unwrap_or_else(|| format!("{error:?}"))
    }
}
