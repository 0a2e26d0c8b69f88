//! Suppresses repeat alerts for the same hazard within a time window.

use crate::types::hazard::Hazard;
use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Key identifying a hazard for de-duplication: its name plus its kind.
pub fn dedup_key<H: Hazard + ?Sized>(hazard: &H) -> String {
    format!("{}|{}", hazard.name(), hazard.kind())
}

/// In-memory "last notified" cache.
///
/// Entries are never evicted and nothing is persisted; the hazard set is small and
/// the cache lives as long as the process.
#[derive(Debug)]
pub struct NotificationDeduplicator {
    window: TimeDelta,
    last_notified: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl NotificationDeduplicator {
    pub fn new(window: Duration) -> Self {
        Self {
            window: TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX),
            last_notified: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` (and records `now`) if `key` was never notified or its last
    /// notification is at least one window old. Otherwise returns `false` and leaves
    /// the recorded time alone.
    pub fn should_notify(&self, key: &str, now: DateTime<Utc>) -> bool {
        let mut last_notified = self.last_notified.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(last) = last_notified.get(key) {
            if now.signed_duration_since(*last) < self.window {
                debug!("Suppressing repeat notification for {}", key);
                return false;
            }
        }
        last_notified.insert(key.to_string(), now);
        true
    }

    pub fn last_notified(&self, key: &str) -> Option<DateTime<Utc>> {
        self.last_notified
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.last_notified
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every key, e.g. on sign-out.
    pub fn clear(&self) {
        self.last_notified
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
