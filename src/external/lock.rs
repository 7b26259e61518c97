//! Cluster-wide mutual exclusion for the scheduled run.
//!
//! The scheduled recompute must run on exactly one instance at a time.
//! Deployments back [`ClusterLock`] with a database advisory lock or an
//! equivalent distributed primitive; [`LocalClusterLock`] is the
//! in-process implementation for single-node deployments and tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::PayrollResult;

/// A held cluster lock. Releasing (or dropping) it frees the name for the
/// next acquirer.
#[async_trait]
pub trait LockLease: Send {
    /// Releases the lock.
    async fn release(self: Box<Self>);
}

/// A named, cluster-wide try-lock.
#[async_trait]
pub trait ClusterLock: Send + Sync {
    /// Attempts to acquire the named lock without blocking.
    ///
    /// Returns `None` when another holder has it; the caller skips its
    /// cycle rather than waiting.
    async fn try_acquire(&self, name: &str) -> PayrollResult<Option<Box<dyn LockLease>>>;
}

/// Process-local [`ClusterLock`] implementation.
///
/// Correct whenever all competing schedulers share one process; clustered
/// deployments substitute an advisory-lock-backed implementation.
#[derive(Debug, Clone, Default)]
pub struct LocalClusterLock {
    held: Arc<Mutex<HashSet<String>>>,
}

impl LocalClusterLock {
    /// Creates a lock registry with no names held.
    pub fn new() -> Self {
        Self::default()
    }
}

struct LocalLease {
    held: Arc<Mutex<HashSet<String>>>,
    name: String,
}

impl Drop for LocalLease {
    fn drop(&mut self) {
        if let Ok(mut held) = self.held.lock() {
            held.remove(&self.name);
        }
    }
}

#[async_trait]
impl LockLease for LocalLease {
    async fn release(self: Box<Self>) {
        // Drop performs the removal; releasing is consuming the lease.
    }
}

#[async_trait]
impl ClusterLock for LocalClusterLock {
    async fn try_acquire(&self, name: &str) -> PayrollResult<Option<Box<dyn LockLease>>> {
        let mut held = self.held.lock().unwrap_or_else(|poisoned| {
            // A panic while holding the registry lock cannot corrupt a
            // HashSet of names; recover the guard.
            poisoned.into_inner()
        });
        if !held.insert(name.to_string()) {
            return Ok(None);
        }
        Ok(Some(Box::new(LocalLease {
            held: Arc::clone(&self.held),
            name: name.to_string(),
        })))
    }
}
