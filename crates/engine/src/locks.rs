//! Per-account exclusive sections.
//!
//! Every read-modify-write of a wallet runs while holding the lock of its
//! account key, so two mutations of the same wallet never interleave.
//! Mutations of different wallets proceed in parallel.

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Dead entries are swept once the map grows past this size.
const SWEEP_THRESHOLD: usize = 1024;

pub(crate) type KeyGuard = OwnedMutexGuard<()>;

#[derive(Debug, Default)]
pub(crate) struct KeyLocks {
    locks: Mutex<HashMap<String, Weak<Mutex<()>>>>,
}

impl KeyLocks {
    async fn slot(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        if let Some(lock) = locks.get(key).and_then(Weak::upgrade) {
            return lock;
        }

        if locks.len() >= SWEEP_THRESHOLD {
            locks.retain(|_, lock| lock.strong_count() > 0);
        }

        let lock = Arc::new(Mutex::new(()));
        locks.insert(key.to_string(), Arc::downgrade(&lock));
        lock
    }

    /// Wait for the exclusive section of `key`.
    pub(crate) async fn lock(&self, key: &str) -> KeyGuard {
        self.slot(key).await.lock_owned().await
    }

    /// Lock two keys, always in the same global order.
    pub(crate) async fn lock_pair(&self, first: &str, second: &str) -> Vec<KeyGuard> {
        if first == second {
            return vec![self.lock(first).await];
        }

        let (low, high) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        let low = self.lock(low).await;
        let high = self.lock(high).await;
        vec![low, high]
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
