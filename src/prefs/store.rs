use std::cell::RefCell;
use std::collections::HashMap;

use log::warn;
use web_sys::Storage;

use crate::prefs::value::PreferenceError;

/// Durable key-value slot for preferences.
pub trait PreferenceStore {
    fn load(&self, key: &'static str) -> Option<String>;
    fn save(&self, key: &'static str, value: &str) -> Result<(), PreferenceError>;
}

/// Browser `localStorage`.
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    /// `None` when storage is disabled (private browsing, blocked cookies).
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl PreferenceStore for LocalStore {
    fn load(&self, key: &'static str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn save(&self, key: &'static str, value: &str) -> Result<(), PreferenceError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PreferenceError::Storage {
                key,
                reason: format!("{:?}", e),
            })
    }
}

/// Session-only store, used when `localStorage` is unavailable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<&'static str, String>>,
}

impl MemoryStore {
    pub fn with(items: &[(&'static str, &str)]) -> Self {
        Self {
            items: RefCell::new(items.iter().map(|(k, v)| (*k, v.to_string())).collect()),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &'static str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn save(&self, key: &'static str, value: &str) -> Result<(), PreferenceError> {
        self.items.borrow_mut().insert(key, value.to_string());
        Ok(())
    }
}

/// `localStorage` if it can be opened, memory otherwise.
pub fn browser_store() -> Box<dyn PreferenceStore> {
    match LocalStore::open() {
        Some(store) => Box::new(store),
        None => {
            warn!("localStorage unavailable, preferences last for this session only");
            Box::new(MemoryStore::default())
        }
    }
}
