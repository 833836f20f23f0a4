//! Short-lived store for rendered documents awaiting download.
//!
//! Each entry is keyed by a random token, handed out once, and removed on
//! its first download. Entries older than the TTL are purged on every access,
//! and the store never holds more than `capacity` entries.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A rendered document waiting for its download.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    /// Name offered to the client in `Content-Disposition`.
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    created: Instant,
}

#[derive(Debug)]
pub struct DocumentStore {
    entries: Mutex<HashMap<String, StoredDocument>>,
    ttl: Duration,
    capacity: usize,
}

impl DocumentStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Store a document and return the one-shot token that retrieves it.
    pub fn insert(
        &self,
        filename: impl Into<String>,
        content_type: &'static str,
        bytes: Vec<u8>,
    ) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let mut entries = self.lock();
        self.purge_expired(&mut entries);

        while entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, doc)| doc.created)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    log::warn!("Download store full, dropping {}", key);
                    entries.remove(&key);
                }
                None => break,
            }
        }

        entries.insert(
            token.clone(),
            StoredDocument {
                filename: filename.into(),
                content_type,
                bytes,
                created: Instant::now(),
            },
        );
        token
    }

    /// Remove and return the document for `token`, if it is still live.
    pub fn take(&self, token: &str) -> Option<StoredDocument> {
        let mut entries = self.lock();
        self.purge_expired(&mut entries);
        entries.remove(token)
    }

    /// Number of documents currently waiting.
    pub fn len(&self) -> usize {
        let mut entries = self.lock();
        self.purge_expired(&mut entries);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge_expired(&self, entries: &mut HashMap<String, StoredDocument>) {
        let before = entries.len();
        entries.retain(|_, doc| doc.created.elapsed() < self.ttl);
        let purged = before - entries.len();
        if purged > 0 {
            log::debug!("Purged {} expired documents", purged);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredDocument>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
