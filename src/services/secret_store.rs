// src/services/secret_store.rs
//! Key-value store with per-key expiry for short-lived secrets
//!
//! Entries are expired lazily: an expired entry is removed on the next read.
//! All operations take the single map lock, so each key behaves atomically
//! with respect to concurrent readers and writers.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct StoredSecret {
    value: String,
    expires_at: Instant,
}

pub struct SecretStore {
    entries: Mutex<HashMap<String, StoredSecret>>,
}

impl SecretStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store a value under `key`, replacing any existing entry
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            StoredSecret {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Fetch the live value for `key`, removing it first if it has expired
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(secret) if secret.expires_at > Instant::now() => Some(secret.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Remove the entry for `key` if present
    pub async fn delete(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
    }
}

impl Default for SecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = SecretStore::new();
        store.set("otp:a@b.com", "ABC123", Duration::from_secs(60)).await;
        assert_eq!(store.get("otp:a@b.com").await, Some("ABC123".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = SecretStore::new();
        assert_eq!(store.get("otp:nobody@b.com").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_removed() {
        let store = SecretStore::new();
        store.set("otp:a@b.com", "ABC123", Duration::from_millis(10)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.get("otp:a@b.com").await, None);
        // A second read must still be absent, not resurrect the value
        assert_eq!(store.get("otp:a@b.com").await, None);
    }

    #[tokio::test]
    async fn test_set_replaces_existing_value() {
        let store = SecretStore::new();
        store.set("otp:a@b.com", "OLD111", Duration::from_secs(60)).await;
        store.set("otp:a@b.com", "NEW222", Duration::from_secs(60)).await;
        assert_eq!(store.get("otp:a@b.com").await, Some("NEW222".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = SecretStore::new();
        store.set("otp:a@b.com", "ABC123", Duration::from_secs(60)).await;
        store.delete("otp:a@b.com").await;
        assert_eq!(store.get("otp:a@b.com").await, None);
    }
}
