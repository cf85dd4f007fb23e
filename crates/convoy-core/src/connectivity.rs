//! Connectivity monitor: reduces per-topic subscription health and the host
//! network state to one connected/disconnected boolean.
//!
//! Purely observational. Reconnection-triggered resync is a policy decision
//! left to the calling surface; the monitor never fires `refresh_all`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::backend::{FeedStatus, Topic};

pub struct ConnectivityMonitor {
    topics: RwLock<HashMap<Topic, FeedStatus>>,
    network_online: AtomicBool,
    connected: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    #[must_use]
    pub fn new() -> Self {
        let (connected, _) = watch::channel(false);
        Self {
            topics: RwLock::new(HashMap::new()),
            network_online: AtomicBool::new(true),
            connected,
        }
    }

    /// Start tracking a topic. It counts against `connected` until the
    /// transport acknowledges it.
    pub fn register(&self, topic: Topic) {
        self.topics.write().insert(topic, FeedStatus::Pending);
        self.recompute();
    }

    /// Record a status report from the transport.
    pub fn report(&self, topic: Topic, status: FeedStatus) {
        {
            let mut topics = self.topics.write();
            match topics.get(&topic) {
                Some(previous) if *previous == status => return,
                _ => {}
            }
            if status != FeedStatus::Subscribed {
                tracing::warn!(%topic, ?status, "subscription degraded");
            }
            topics.insert(topic, status);
        }
        self.recompute();
    }

    /// Stop tracking a topic (subscription torn down).
    pub fn deregister(&self, topic: Topic) {
        self.topics.write().remove(&topic);
        self.recompute();
    }

    /// Host network state, reported by the platform collaborator.
    ///
    /// Going online does not by itself flip to connected; it only allows
    /// subscription acknowledgments to count again.
    pub fn set_network_online(&self, online: bool) {
        self.network_online.store(online, Ordering::Release);
        self.recompute();
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// Reactive handle for the connected boolean.
    #[must_use]
    pub fn watch_connected(&self) -> watch::Receiver<bool> {
        self.connected.subscribe()
    }

    /// Forget all topics (session teardown).
    pub fn reset(&self) {
        self.topics.write().clear();
        self.recompute();
    }

    fn recompute(&self) {
        let topics = self.topics.read();
        let connected = self.network_online.load(Ordering::Acquire)
            && !topics.is_empty()
            && topics
                .values()
                .all(|status| *status == FeedStatus::Subscribed);
        drop(topics);

        self.connected.send_if_modified(|current| {
            if *current == connected {
                false
            } else {
                tracing::info!(connected, "connectivity changed");
                *current = connected;
                true
            }
        });
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}
