//! Published results store.
//!
//! A single-writer, many-reader slot holding the most recently completed
//! scan snapshot. The orchestrator replaces the whole snapshot in one
//! swap of the inner `Arc`; readers clone the `Arc` out and keep a
//! consistent view for as long as they hold it. No reader ever observes
//! a snapshot under construction, and reads never wait on a cycle.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::types::ScanSnapshot;

/// Cloneable handle to the published snapshot slot.
#[derive(Clone, Debug, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<Arc<ScanSnapshot>>>,
}

impl SnapshotStore {
    /// Create a store holding the empty initial snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the visible snapshot. Orchestrator-only; the write lock is
    /// held just long enough to swap the pointer.
    pub async fn publish(&self, snapshot: ScanSnapshot) {
        *self.inner.write().await = Arc::new(snapshot);
    }

    /// The most recently published snapshot, or the empty initial one
    /// before the first cycle completes.
    pub async fn read(&self) -> Arc<ScanSnapshot> {
        Arc::clone(&*self.inner.read().await)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
