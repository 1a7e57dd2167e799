//! Single-use export handle store.
//!
//! Each generated forecast parks its CSV-serializable tables here under a
//! fresh UUID. A handle is read-once: consuming it removes the entry, so
//! a second download of the same id fails. Entries expire after the
//! configured TTL and a periodic sweep clears them out.

use crate::types::ExportTable;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

struct StoredExport {
    table: ExportTable,
    expires_at: Instant,
}

/// Thread-safe store of pending CSV exports keyed by handle.
pub struct ExportStore {
    entries: DashMap<String, StoredExport>,
    ttl: Duration,
}

impl ExportStore {
    /// Create a new store whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            entries: DashMap::new(),
            ttl,
        })
    }

    /// Park a table and return its fresh handle.
    pub fn insert(&self, table: ExportTable) -> String {
        let id = Uuid::new_v4().to_string();
        self.entries.insert(
            id.clone(),
            StoredExport {
                table,
                expires_at: Instant::now() + self.ttl,
            },
        );
        id
    }

    /// Take a table out of the store. Returns `None` for unknown, expired
    /// or already-consumed handles. The entry is gone afterwards either
    /// way.
    pub fn consume(&self, id: &str) -> Option<ExportTable> {
        let (_, stored) = self.entries.remove(id)?;
        if stored.expires_at > Instant::now() {
            Some(stored.table)
        } else {
            None
        }
    }

    /// Remove all expired entries.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Swept {} expired export entries", removed);
        }
    }

    /// Number of pending exports (including expired, until swept).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
