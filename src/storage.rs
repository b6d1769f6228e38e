//! `localStorage` adapter for the core key-value seam

use std::rc::Rc;

use workload_core::{KeyValueStore, MemoryStorage};

pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            log::warn!("localStorage rejected write of {}", key);
        }
    }

    fn remove(&self, key: &str) {
        let _ = self.storage.remove_item(key);
    }
}

/// `localStorage` when the browser allows it, otherwise an in-memory store
pub fn browser_storage() -> Rc<dyn KeyValueStore> {
    match web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        Some(storage) => Rc::new(BrowserStorage { storage }),
        None => {
            log::warn!("localStorage unavailable; session will not survive reloads");
            Rc::new(MemoryStorage::new())
        }
    }
}
