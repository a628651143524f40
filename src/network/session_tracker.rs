use crate::error::{LedgerError, Result};
use log::info;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::RwLock;
use uuid::Uuid;

/// Connection bookkeeping for the node
///
/// This keeps the set of live sessions so the server can:
/// - cap concurrent sessions at `max_sessions`
/// - correlate log lines by session id
pub struct SessionTracker {
    /// Currently open sessions and their peers
    active: RwLock<HashMap<Uuid, SocketAddr>>,
    /// Maximum number of concurrent sessions
    max_sessions: usize,
}

impl SessionTracker {
    /// Create a new tracker
    pub fn new(max_sessions: usize) -> Self {
        Self {
            active: RwLock::new(HashMap::new()),
            max_sessions,
        }
    }

    /// Register a session for `peer` unless the limit is reached
    pub fn try_open(&self, peer: SocketAddr) -> Result<Option<Uuid>> {
        let mut active = self
            .active
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire session lock: {e}")))?;

        if active.len() >= self.max_sessions {
            return Ok(None);
        }

        let id = Uuid::new_v4();
        active.insert(id, peer);
        info!("Session {id} opened for {peer}");
        Ok(Some(id))
    }

    /// Record that a session ended
    pub fn close(&self, id: Uuid) -> Result<()> {
        let mut active = self
            .active
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire session lock: {e}")))?;

        if let Some(peer) = active.remove(&id) {
            info!("Session {id} closed for {peer}");
        }
        Ok(())
    }

    /// Get number of open sessions
    pub fn active_count(&self) -> Result<usize> {
        let active = self
            .active
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire session lock: {e}")))?;
        Ok(active.len())
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }
}
