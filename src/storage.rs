//! Per-session working copies for document editing
//!
//! Edits arrive as full replacements of the working-copy bytes, which makes
//! them idempotent and safe to retry. Two writers on the same session id
//! resolve last-write-wins; an advisory lock with a short timeout lets the
//! second writer be warned instead of silently clobbered. No merge logic.

use crate::config::SESSION_LOCK_TIMEOUT_SECS;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockStatus {
    Acquired,
    /// Another writer holds the advisory lock; writes still succeed.
    HeldBy(String),
}

struct WorkingCopy {
    bytes: Vec<u8>,
}

struct AdvisoryLock {
    owner: String,
    acquired_at: Instant,
}

#[derive(Default)]
struct StoreInner {
    copies: HashMap<String, WorkingCopy>,
    locks: HashMap<String, AdvisoryLock>,
}

pub struct SessionStore {
    inner: Mutex<StoreInner>,
    lock_timeout: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_lock_timeout(Duration::from_secs(SESSION_LOCK_TIMEOUT_SECS))
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            lock_timeout,
        }
    }

    /// Replace the session's working copy. Last write wins.
    pub fn put(&self, session_id: &str, bytes: Vec<u8>) {
        let mut inner = self.inner.lock().expect("session store poisoned");
        inner
            .copies
            .insert(session_id.to_string(), WorkingCopy { bytes });
    }

    pub fn get(&self, session_id: &str) -> Option<Vec<u8>> {
        let inner = self.inner.lock().expect("session store poisoned");
        inner.copies.get(session_id).map(|c| c.bytes.clone())
    }

    pub fn remove(&self, session_id: &str) {
        let mut inner = self.inner.lock().expect("session store poisoned");
        inner.copies.remove(session_id);
        inner.locks.remove(session_id);
    }

    /// Try to take the advisory lock for `owner`. An expired lock is
    /// treated as free.
    pub fn acquire_lock(&self, session_id: &str, owner: &str) -> LockStatus {
        let mut inner = self.inner.lock().expect("session store poisoned");
        if let Some(existing) = inner.locks.get(session_id) {
            if existing.owner != owner && existing.acquired_at.elapsed() < self.lock_timeout {
                return LockStatus::HeldBy(existing.owner.clone());
            }
        }
        inner.locks.insert(
            session_id.to_string(),
            AdvisoryLock {
                owner: owner.to_string(),
                acquired_at: Instant::now(),
            },
        );
        LockStatus::Acquired
    }

    pub fn release_lock(&self, session_id: &str, owner: &str) {
        let mut inner = self.inner.lock().expect("session store poisoned");
        if inner
            .locks
            .get(session_id)
            .map(|l| l.owner == owner)
            .unwrap_or(false)
        {
            inner.locks.remove(session_id);
        }
    }

    pub fn session_count(&self) -> usize {
        self.inner.lock().expect("session store poisoned").copies.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let store = SessionStore::new();
        store.put("s1", b"first".to_vec());
        store.put("s1", b"second".to_vec());
        assert_eq!(store.get("s1").unwrap(), b"second");
    }

    #[test]
    fn test_advisory_lock_warns_second_writer() {
        let store = SessionStore::new();
        assert_eq!(store.acquire_lock("s1", "tab-a"), LockStatus::Acquired);
        assert_eq!(
            store.acquire_lock("s1", "tab-b"),
            LockStatus::HeldBy("tab-a".to_string())
        );
        // Re-acquiring your own lock refreshes it.
        assert_eq!(store.acquire_lock("s1", "tab-a"), LockStatus::Acquired);
    }

    #[test]
    fn test_lock_expires() {
        let store = SessionStore::with_lock_timeout(Duration::from_millis(0));
        assert_eq!(store.acquire_lock("s1", "tab-a"), LockStatus::Acquired);
        assert_eq!(store.acquire_lock("s1", "tab-b"), LockStatus::Acquired);
    }

    #[test]
    fn test_release_requires_owner() {
        let store = SessionStore::new();
        store.acquire_lock("s1", "tab-a");
        store.release_lock("s1", "tab-b");
        assert_eq!(
            store.acquire_lock("s1", "tab-b"),
            LockStatus::HeldBy("tab-a".to_string())
        );
        store.release_lock("s1", "tab-a");
        assert_eq!(store.acquire_lock("s1", "tab-b"), LockStatus::Acquired);
    }
}
