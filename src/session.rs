use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::model::EntityId;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const THEME_KEY: &str = "theme";

/// Persistent string key/value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`. Storage exceptions (quota, privacy mode) are logged
/// and otherwise treated as a missing value.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            leptos::logging::error!("failed to persist '{}' to local storage", key);
        }
    }

    fn remove(&self, key: &str) {
        if self.storage.remove_item(key).is_err() {
            leptos::logging::error!("failed to remove '{}' from local storage", key);
        }
    }
}

/// In-memory store; used in tests and when local storage is unavailable.
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

/// The signed-in user as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(alias = "username", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Profile {
    /// Upper-cased first letter of the name, for the avatar badge.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

/// Auth token and profile held in persistent storage.
#[derive(Clone)]
pub struct SessionStore {
    store: Rc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn browser() -> Self {
        match LocalStorage::open() {
            Some(storage) => Self::new(Rc::new(storage)),
            None => {
                leptos::logging::warn!("local storage unavailable, session will not persist");
                Self::new(Rc::new(MemoryStore::default()))
            }
        }
    }

    pub fn has_session(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<Profile> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                leptos::logging::warn!("stored user profile is unreadable: {}", e);
                None
            }
        }
    }

    pub fn save(&self, token: &str, user: &Profile) {
        match serde_json::to_string(user) {
            Ok(json) => self.store.set(USER_KEY, &json),
            Err(e) => leptos::logging::error!("failed to serialize user profile: {}", e),
        }
        self.store.set(TOKEN_KEY, token);
    }

    /// Token goes first; a profile without a token is not a session.
    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
    }

    pub fn store(&self) -> Rc<dyn KeyValueStore> {
        Rc::clone(&self.store)
    }
}
