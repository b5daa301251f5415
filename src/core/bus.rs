//! Commit bus: tells observers that the document moved to a new snapshot.
//!
//! Architecture:
//! - Observers subscribe with callbacks (immediate invocation)
//! - emit() invokes callbacks immediately AND queues for deferred processing
//! - poll() returns queued commits for batch processing in a host loop
//!
//! Callback order: FIFO (first-subscribed, first-called).
//!
//! The store emits one [`Commit`] per dispatched action, or one per
//! outermost batch, so observers never see the intermediate snapshots of a
//! compound operation.

use std::sync::{Arc, Mutex, RwLock};

use log::warn;

use super::store::Snapshot;

/// Maximum commits in queue before oldest are evicted
const MAX_QUEUE_SIZE: usize = 1000;

/// A published state change.
#[derive(Debug, Clone)]
pub struct Commit {
    /// Revision of `snapshot`.
    pub revision: u64,
    /// Wire tags of the actions that changed state, in dispatch order.
    pub actions: Vec<&'static str>,
    pub snapshot: Arc<Snapshot>,
}

type Callback = Arc<dyn Fn(&Commit) + Send + Sync>;

#[derive(Clone, Default)]
pub struct CommitBus {
    subscribers: Arc<RwLock<Vec<Callback>>>,
    queue: Arc<Mutex<Vec<Commit>>>,
}

impl std::fmt::Debug for CommitBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitBus")
            .field("subscribers", &self.subscribers.read().map(|s| s.len()).unwrap_or(0))
            .field("queue_len", &self.queue.lock().map(|q| q.len()).unwrap_or(0))
            .finish()
    }
}

impl CommitBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to commits. Callback is invoked synchronously by emit().
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&Commit) + Send + Sync + 'static,
    {
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(callback));
    }

    /// Invoke callbacks immediately AND queue for poll().
    pub fn emit(&self, commit: Commit) {
        // Clone the list so a callback may subscribe without deadlocking
        let callbacks: Vec<Callback> = self.subscribers.read().unwrap_or_else(|e| e.into_inner()).clone();
        for cb in &callbacks {
            cb(&commit);
        }

        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        if queue.len() >= MAX_QUEUE_SIZE {
            let evict_count = queue.len() / 2;
            warn!("CommitBus queue full ({} commits), evicting oldest {}", queue.len(), evict_count);
            queue.drain(0..evict_count);
        }
        queue.push(commit);
    }

    /// All commits emitted since the last poll.
    pub fn poll(&self) -> Vec<Commit> {
        std::mem::take(&mut *self.queue.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Clear subscribers and queue
    pub fn clear(&self) {
        self.subscribers.write().unwrap_or_else(|e| e.into_inner()).clear();
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
