//! In-process per-user serialisation

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per user id, created on first use
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl UserLocks {
    /// Empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and hold the user's lock until the guard drops.
    pub async fn lock_owned(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(user_id.to_string()).or_default().clone();
        lock.lock_owned().await
    }
}
