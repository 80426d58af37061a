//! Server state management

use serde::Serialize;
use std::sync::RwLock;
use trihex_worker::{SearchWorker, WorkerConfig, WorkerHandle};

/// Request counters reported by `/api/status`
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct RequestCounts {
    pub moves: u64,
    pub removals: u64,
    pub cancelled: u64,
    pub rejected: u64,
}

/// Server-wide shared state
pub struct ServerState {
    pub worker: WorkerHandle,
    pub counts: RwLock<RequestCounts>,
}

impl ServerState {
    pub fn new(config: WorkerConfig) -> std::io::Result<Self> {
        Ok(Self {
            worker: SearchWorker::spawn(config)?,
            counts: RwLock::new(RequestCounts::default()),
        })
    }

    /// Bump a counter; a poisoned lock only loses the count
    pub fn count(&self, bump: impl FnOnce(&mut RequestCounts)) {
        if let Ok(mut counts) = self.counts.write() {
            bump(&mut counts);
        }
    }

    pub fn counts(&self) -> RequestCounts {
        self.counts.read().map(|c| *c).unwrap_or_default()
    }
}
