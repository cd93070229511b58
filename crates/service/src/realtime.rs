//! Process-wide registry of live socket connections.
//!
//! A connection is added when the socket opens and removed when its
//! [`ConnectionGuard`] drops, which happens on close or when the socket task
//! ends for any other reason. Each entry owns the sending half of the
//! connection's outbound queue, so `broadcast` reaches every live socket.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

pub type ConnectionId = u64;

struct Connection {
    opened_at: Instant,
    outbound: UnboundedSender<String>,
}

#[derive(Default)]
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    connections: DashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Add a connection. It stays registered until the returned guard drops;
    /// frames broadcast in the meantime arrive on the receiver.
    pub fn register(self: &Arc<Self>, peer: Option<String>) -> (ConnectionGuard, UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (outbound, rx) = unbounded_channel();
        self.connections.insert(id, Connection { opened_at: Instant::now(), outbound });
        info!(connection = id, peer = peer.as_deref().unwrap_or("-"), live = self.len(), "socket connected");
        (ConnectionGuard { id, registry: Arc::clone(self) }, rx)
    }

    /// Remove a connection; returns whether it was registered.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        match self.connections.remove(&id) {
            Some((_, conn)) => {
                info!(
                    connection = id,
                    live = self.len(),
                    open_ms = conn.opened_at.elapsed().as_millis() as u64,
                    "socket closed"
                );
                true
            }
            None => false,
        }
    }

    /// Queue `text` for every live connection. Entries whose receiver is gone
    /// are dropped. Returns how many connections accepted the frame.
    pub fn broadcast(&self, text: &str) -> usize {
        if self.is_empty() {
            return 0;
        }
        let mut delivered = 0;
        let mut dead = Vec::new();
        for entry in self.connections.iter() {
            if entry.value().outbound.send(text.to_string()).is_ok() {
                delivered += 1;
            } else {
                dead.push(*entry.key());
            }
        }
        for id in dead {
            if self.connections.remove(&id).is_some() {
                debug!(connection = id, "dropped connection with closed outbound queue");
            }
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

/// Keeps one connection registered for as long as it lives.
pub struct ConnectionGuard {
    id: ConnectionId,
    registry: Arc<ConnectionRegistry>,
}

impl ConnectionGuard {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_drop_unregisters() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = registry.register(Some("127.0.0.1:5000".into()));
        let (b, _rx_b) = registry.register(None);
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.len(), 2);

        drop(a);
        assert_eq!(registry.len(), 1);

        drop(b);
        assert!(registry.is_empty());
    }

    #[test]
    fn unregister_twice_is_harmless() {
        let registry = ConnectionRegistry::new();
        let (guard, _rx) = registry.register(None);
        assert!(registry.unregister(guard.id()));
        assert!(!registry.unregister(guard.id()));
        drop(guard);
        assert!(registry.is_empty());
    }

    #[test]
    fn broadcast_reaches_every_live_connection() {
        let registry = ConnectionRegistry::new();
        let (_a, mut rx_a) = registry.register(None);
        let (_b, mut rx_b) = registry.register(None);

        assert_eq!(registry.broadcast("hello"), 2);
        assert_eq!(rx_a.try_recv().ok().as_deref(), Some("hello"));
        assert_eq!(rx_b.try_recv().ok().as_deref(), Some("hello"));
        assert!(rx_a.try_recv().is_err());
    }

    #[test]
    fn broadcast_prunes_closed_receivers() {
        let registry = ConnectionRegistry::new();
        let (_live, mut rx_live) = registry.register(None);
        let (stale, rx_stale) = registry.register(None);
        drop(rx_stale);

        assert_eq!(registry.broadcast("ping"), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(rx_live.try_recv().ok().as_deref(), Some("ping"));

        // the guard of the pruned entry no longer finds it
        drop(stale);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn broadcast_on_empty_registry_is_zero() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.broadcast("nobody"), 0);
    }
}
