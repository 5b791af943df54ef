//! Connection registry.
//!
//! Owns the bookkeeping for every live transport connection. Identifiers
//! are opaque and monotonically increasing for the process lifetime, so
//! equality never depends on transport object identity. Untracking is
//! idempotent; after any connect/close sequence the registry holds
//! exactly the connections that are still open.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Opaque connection identifier, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channel endpoints for one connection: raw inbound frames flow to the
/// session worker, raw outbound frames flow to the client stream.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    /// Frames received from the client, consumed by the session worker.
    pub inbound: mpsc::UnboundedSender<String>,
    /// Frames to deliver to the client.
    pub outbound: mpsc::UnboundedSender<String>,
}

impl ConnectionHandle {
    /// True when the client side is gone and frames can no longer be
    /// delivered.
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

struct ConnectionEntry {
    handle: ConnectionHandle,
    opened_at: Instant,
}

/// Registry of live connections.
pub struct ConnectionRegistry {
    connections: Arc<RwLock<HashMap<u64, ConnectionEntry>>>,
    next_id: AtomicU64,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Track a new connection, allocating its identifier.
    pub async fn track(&self, handle: ConnectionHandle) -> ConnectionId {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = ConnectionEntry {
            handle,
            opened_at: Instant::now(),
        };
        self.connections.write().await.insert(id.0, entry);
        tracing::debug!(connection = %id, "connection tracked");
        id
    }

    /// Remove a connection. Untracking an id that is absent (already
    /// removed, or never tracked) is a no-op.
    pub async fn untrack(&self, id: ConnectionId) {
        if self.connections.write().await.remove(&id.0).is_some() {
            tracing::debug!(connection = %id, "connection untracked");
        }
    }

    /// Look up the channel handle for a connection.
    pub async fn get(&self, id: ConnectionId) -> Option<ConnectionHandle> {
        self.connections
            .read()
            .await
            .get(&id.0)
            .map(|entry| entry.handle.clone())
    }

    /// Whether a connection is currently tracked.
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&id.0)
    }

    /// Number of tracked connections.
    pub async fn count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Identifiers of all tracked connections.
    pub async fn ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self
            .connections
            .read()
            .await
            .keys()
            .map(|k| ConnectionId(*k))
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Drop entries whose client side has disconnected. Returns how many
    /// were removed.
    pub async fn cleanup(&self) -> usize {
        let mut connections = self.connections.write().await;
        let before = connections.len();
        connections.retain(|_, entry| !entry.handle.is_closed());
        before - connections.len()
    }

    /// Age of a connection, if tracked.
    pub async fn age(&self, id: ConnectionId) -> Option<std::time::Duration> {
        self.connections
            .read()
            .await
            .get(&id.0)
            .map(|entry| entry.opened_at.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> (
        ConnectionHandle,
        mpsc::UnboundedReceiver<String>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        (
            ConnectionHandle {
                inbound: inbound_tx,
                outbound: outbound_tx,
            },
            inbound_rx,
            outbound_rx,
        )
    }

    #[tokio::test]
    async fn test_track_allocates_monotonic_ids() {
        let registry = ConnectionRegistry::new();
        let (h1, _i1, _o1) = handle();
        let (h2, _i2, _o2) = handle();

        let id1 = registry.track(h1).await;
        let id2 = registry.track(h2).await;

        assert!(id2 > id1);
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_untrack_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (h, _i, _o) = handle();
        let id = registry.track(h).await;

        registry.untrack(id).await;
        assert_eq!(registry.count().await, 0);

        // Second untrack of the same id is a no-op, not an error.
        registry.untrack(id).await;
        assert_eq!(registry.count().await, 0);

        // Untracking an id that never existed is also a no-op.
        registry.untrack(ConnectionId(9999)).await;
    }

    #[tokio::test]
    async fn test_get_returns_live_handle() {
        let registry = ConnectionRegistry::new();
        let (h, _i, mut outbound_rx) = handle();
        let id = registry.track(h).await;

        let fetched = registry.get(id).await.unwrap();
        fetched.outbound.send("hello".to_string()).unwrap();
        assert_eq!(outbound_rx.recv().await.unwrap(), "hello");

        assert!(registry.get(ConnectionId(9999)).await.is_none());
    }

    #[tokio::test]
    async fn test_cleanup_drops_closed_connections() {
        let registry = ConnectionRegistry::new();

        let (h1, _i1, o1) = handle();
        let (h2, _i2, _o2) = handle();
        registry.track(h1).await;
        let id2 = registry.track(h2).await;

        // Client for the first connection goes away.
        drop(o1);

        let removed = registry.cleanup().await;
        assert_eq!(removed, 1);
        assert_eq!(registry.count().await, 1);
        assert!(registry.contains(id2).await);
    }

    #[tokio::test]
    async fn test_size_matches_open_connections_after_churn() {
        let registry = ConnectionRegistry::new();

        for _ in 0..10 {
            let (h, _i, _o) = handle();
            let id = registry.track(h).await;
            registry.untrack(id).await;
        }

        assert_eq!(registry.count().await, 0);
        assert!(registry.ids().await.is_empty());
    }
}
