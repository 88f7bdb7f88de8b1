//! Transient store for password-recovery verification codes.
//!
//! Codes live only in process memory with a TTL; they are never persisted
//! (the invitation flow is the one that persists its code, on the person
//! row). Keys are lowercased e-mail addresses.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

struct ResetEntry {
    codigo: String,
    expires_at: Instant,
}

/// In-memory map of pending recovery codes.
pub struct ResetCodeStore {
    entries: RwLock<HashMap<String, ResetEntry>>,
    ttl: Duration,
}

impl ResetCodeStore {
    /// Create a store whose codes expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Register a fresh code for the given e-mail, replacing any pending one.
    pub async fn insert(&self, e_mail: &str, codigo: String) {
        let mut entries = self.entries.write().await;
        entries.insert(
            e_mail.trim().to_lowercase(),
            ResetEntry {
                codigo,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Verify and consume the pending code for the given e-mail.
    ///
    /// Returns `true` only when a non-expired code matches; the entry is
    /// removed on success and on expiry, so each code is single-use.
    pub async fn consume(&self, e_mail: &str, codigo: &str) -> bool {
        let chave = e_mail.trim().to_lowercase();
        let mut entries = self.entries.write().await;

        let Some(entry) = entries.get(&chave) else {
            return false;
        };

        if entry.expires_at < Instant::now() {
            entries.remove(&chave);
            return false;
        }

        if entry.codigo != codigo {
            return false;
        }

        entries.remove(&chave);
        true
    }
}
