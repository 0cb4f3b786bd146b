//! Auth token lifecycle across two tiers.
//!
//! # Design
//! The durable tier lives in an injected `KeyValueStore` (the host's
//! preferences storage) and survives restarts; the ephemeral tier lives in
//! this process only. At most one tier holds a token: writing one clears the
//! other. A single mutex serializes every access, and `login`/`logout`
//! write token and profile under one acquisition, so a login racing a
//! logout resolves to one of the two outcomes and never a mix.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::AccountType;

const TOKEN_KEY: &str = "auth_token";
const NAME_KEY: &str = "user_name";
const EMAIL_KEY: &str = "user_email";
const ACCOUNT_TYPE_KEY: &str = "user_type";

/// Host-provided key-value storage (get/set/remove by key).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory `KeyValueStore`. Shared through an `Arc`, it stands in for
/// durable storage across simulated restarts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// Display fields persisted next to the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub account_type: AccountType,
}

pub struct SessionStore {
    durable: Arc<dyn KeyValueStore>,
    ephemeral: Mutex<Option<String>>,
}

impl SessionStore {
    pub fn new(durable: Arc<dyn KeyValueStore>) -> Self {
        Self {
            durable,
            ephemeral: Mutex::new(None),
        }
    }

    /// Session backed by a fresh `MemoryStore`.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Ephemeral token if present, else the durable one.
    pub fn get(&self) -> Option<String> {
        let ephemeral = self.ephemeral.lock();
        ephemeral.clone().or_else(|| self.durable.get(TOKEN_KEY))
    }

    /// Store `token` in exactly one tier, clearing the other.
    pub fn set(&self, token: &str, durable: bool) {
        let mut ephemeral = self.ephemeral.lock();
        self.write_token(&mut ephemeral, token, durable);
    }

    /// Remove the token from both tiers.
    pub fn clear(&self) {
        let mut ephemeral = self.ephemeral.lock();
        self.remove_token(&mut ephemeral);
    }

    /// Token and profile in one critical section.
    pub fn login(&self, token: &str, durable: bool, profile: &UserProfile) {
        let mut ephemeral = self.ephemeral.lock();
        self.write_token(&mut ephemeral, token, durable);
        self.write_profile(profile);
    }

    /// Drop token and profile in one critical section.
    pub fn logout(&self) {
        let mut ephemeral = self.ephemeral.lock();
        self.remove_token(&mut ephemeral);
        self.remove_profile();
    }

    pub fn is_logged_in(&self) -> bool {
        self.get().is_some()
    }

    pub fn store_profile(&self, profile: &UserProfile) {
        let _guard = self.ephemeral.lock();
        self.write_profile(profile);
    }

    /// The stored profile, if every field is present and well-formed.
    pub fn profile(&self) -> Option<UserProfile> {
        let _guard = self.ephemeral.lock();
        Some(UserProfile {
            name: self.durable.get(NAME_KEY)?,
            email: self.durable.get(EMAIL_KEY)?,
            account_type: AccountType::parse(&self.durable.get(ACCOUNT_TYPE_KEY)?)?,
        })
    }

    pub fn clear_profile(&self) {
        let _guard = self.ephemeral.lock();
        self.remove_profile();
    }

    // Callers hold the `ephemeral` lock.

    fn write_token(&self, ephemeral: &mut Option<String>, token: &str, durable: bool) {
        if durable {
            self.durable.set(TOKEN_KEY, token);
            *ephemeral = None;
        } else {
            // A non-remembered login must not be revivable from an older
            // remembered one.
            self.durable.remove(TOKEN_KEY);
            *ephemeral = Some(token.to_string());
        }
        tracing::debug!(durable, "session token stored");
    }

    fn remove_token(&self, ephemeral: &mut Option<String>) {
        *ephemeral = None;
        self.durable.remove(TOKEN_KEY);
        tracing::debug!("session token cleared");
    }

    fn write_profile(&self, profile: &UserProfile) {
        self.durable.set(NAME_KEY, &profile.name);
        self.durable.set(EMAIL_KEY, &profile.email);
        self.durable.set(ACCOUNT_TYPE_KEY, profile.account_type.as_str());
    }

    fn remove_profile(&self) {
        for key in [NAME_KEY, EMAIL_KEY, ACCOUNT_TYPE_KEY] {
            self.durable.remove(key);
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}
