use std::collections::BTreeMap;

use action_primitives::{CookieJar, KeyValueStore};
use parking_lot::Mutex;

/// Frame-local key-value storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.items.lock().clone()
    }
}

impl KeyValueStore for MemoryStorage {
    fn keys(&self) -> Vec<String> {
        self.items.lock().keys().cloned().collect()
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items.lock().insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.lock().remove(key);
    }
}

/// Cookies of the authoring page.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<BTreeMap<String, String>>,
}

impl MemoryCookieJar {
    pub fn set(&self, name: &str, value: &str) {
        self.cookies
            .lock()
            .insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.cookies.lock().get(name).cloned()
    }
}

impl CookieJar for MemoryCookieJar {
    fn names(&self) -> Vec<String> {
        self.cookies.lock().keys().cloned().collect()
    }

    fn remove(&self, name: &str) {
        self.cookies.lock().remove(name);
    }
}
