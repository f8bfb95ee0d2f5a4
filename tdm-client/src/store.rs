use std::collections::HashMap;

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};

pub mod keys {
    pub const SESSION: &str = "disaster-map-user";
    pub const ACCOUNTS: &str = "disaster-map-users";
    pub const COMMENTS: &str = "tdm-comments";
    pub const USER_DISASTERS: &str = "tdm-user-disasters";
    pub const STORY_ADDITIONS: &str = "tdm-disaster-story-additions";
}

/// String-keyed storage of raw JSON strings
pub trait Store {
    fn get_raw(&self, key: &str) -> Option<String>;
    fn set_raw(&mut self, key: &str, value: String) -> anyhow::Result<()>;
    fn delete(&mut self, key: &str) -> anyhow::Result<()>;
}

pub trait StoreExt: Store {
    /// Decodes the entry at `key`, returning `fallback` if it is absent or malformed
    fn get_or<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T;

    /// Decodes the entry at `key`, clearing it from the store if it is malformed
    fn take_valid<T: DeserializeOwned>(&mut self, key: &str) -> Option<T>;

    /// Writes are fire-and-forget: failures are logged and otherwise ignored
    fn set<T: Serialize>(&mut self, key: &str, value: &T);

    fn remove(&mut self, key: &str);
}

impl<S: Store + ?Sized> StoreExt for S {
    fn get_or<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match self.get_raw(key) {
            None => fallback,
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(v) => v,
                Err(err) => {
                    tracing::warn!(key, ?err, "ignoring malformed stored entry");
                    fallback
                }
            },
        }
    }

    fn take_valid<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(key, ?err, "clearing malformed stored entry");
                self.remove(key);
                None
            }
        }
    }

    fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        let res = serde_json::to_string(value)
            .context("serializing value")
            .and_then(|raw| self.set_raw(key, raw));
        if let Err(err) = res {
            tracing::error!(key, ?err, "failed persisting entry");
        }
    }

    fn remove(&mut self, key: &str) {
        if let Err(err) = self.delete(key) {
            tracing::error!(key, ?err, "failed removing entry");
        }
    }
}

/// Store that only lives as long as the process
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryStore(HashMap<String, String>);

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore(HashMap::new())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

impl Store for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        self.0.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> anyhow::Result<()> {
        self.0.remove(key);
        Ok(())
    }
}

#[cfg(feature = "web")]
pub use browser::BrowserStore;

#[cfg(feature = "web")]
mod browser {
    use anyhow::anyhow;
    use gloo_storage::{LocalStorage, Storage};

    use super::Store;

    /// The browser's local storage
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserStore;

    impl Store for BrowserStore {
        fn get_raw(&self, key: &str) -> Option<String> {
            match LocalStorage::raw().get_item(key) {
                Ok(v) => v,
                Err(err) => {
                    tracing::warn!(key, ?err, "failed reading from local storage");
                    None
                }
            }
        }

        fn set_raw(&mut self, key: &str, value: String) -> anyhow::Result<()> {
            LocalStorage::raw()
                .set_item(key, &value)
                .map_err(|err| anyhow!("writing {key:?} to local storage: {err:?}"))
        }

        fn delete(&mut self, key: &str) -> anyhow::Result<()> {
            LocalStorage::delete(key);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_malformed_fall_back() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_or("k", vec![1u32]), vec![1]);
        store.set_raw("k", String::from("{not json")).unwrap();
        assert_eq!(store.get_or("k", vec![1u32]), vec![1]);
        // get_or leaves the entry alone
        assert!(store.contains("k"));
    }

    #[test]
    fn take_valid_clears_malformed() {
        let mut store = MemoryStore::new();
        store.set_raw("k", String::from("[1, 2")).unwrap();
        assert_eq!(store.take_valid::<Vec<u32>>("k"), None);
        assert!(!store.contains("k"));

        store.set("k", &vec![1u32, 2]);
        assert_eq!(store.take_valid::<Vec<u32>>("k"), Some(vec![1, 2]));
        assert!(store.contains("k"));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let mut store = MemoryStore::new();
        store.set("k", &"a string");
        assert_eq!(store.get_or::<Vec<u32>>("k", Vec::new()), Vec::<u32>::new());
    }
}
