//! Shared storage of bridge credentials.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Process-wide mapping from bridge mac to the username issued by that
/// bridge.
///
/// Cloning yields another handle to the same underlying map, so one store can
/// back any number of finders and sessions. Contention is limited to rare
/// registration events, so a plain mutex is enough.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    usernames: Arc<Mutex<HashMap<String, String>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a username for a bridge. Upserts; registering the same mac
    /// twice keeps the latest username.
    pub fn add(&self, mac: &str, username: &str) {
        self.usernames
            .lock()
            .expect("credential store poisoned")
            .insert(mac.to_string(), username.to_string());
    }

    /// Look up the username for a bridge.
    pub fn get(&self, mac: &str) -> Option<String> {
        self.usernames
            .lock()
            .expect("credential store poisoned")
            .get(mac)
            .cloned()
    }

    /// Snapshot of every known credential. Mutating the returned map does not
    /// affect the store.
    pub fn all(&self) -> HashMap<String, String> {
        self.usernames
            .lock()
            .expect("credential store poisoned")
            .clone()
    }
}
