//! Activity feed: a best-effort, human-readable log of what other workspace
//! members changed.
//!
//! Not a source of truth. Events missed during a disconnect are not
//! backfilled, and the acting user's own events are suppressed.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::backend::{ActivityBackend, ActivitySubscription, FeedStatus, Topic};
use crate::connectivity::ConnectivityMonitor;
use crate::error::{Error, Result};
use crate::members::MemberDirectory;
use crate::models::{ActivityAction, RecordKind, UserId};
use crate::session::WorkspaceSession;

/// How many entries the feed retains; older ones are evicted.
pub const RECENT_ACTIVITY_CAPACITY: usize = 20;

/// One rendered feed entry: an event annotated with the actor's name.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub actor_name: String,
    pub kind: RecordKind,
    pub entity_name: String,
    pub action: ActivityAction,
    pub occurred_at: i64,
}

struct Pump {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

pub struct ActivityFeed<B: ActivityBackend> {
    backend: B,
    session: Arc<WorkspaceSession>,
    members: Arc<MemberDirectory>,
    connectivity: Arc<ConnectivityMonitor>,
    entries: Arc<RwLock<VecDeque<ActivityEntry>>>,
    pump: Mutex<Option<Pump>>,
}

impl<B: ActivityBackend> ActivityFeed<B> {
    pub fn new(
        backend: B,
        session: Arc<WorkspaceSession>,
        members: Arc<MemberDirectory>,
        connectivity: Arc<ConnectivityMonitor>,
    ) -> Self {
        Self {
            backend,
            session,
            members,
            connectivity,
            entries: Arc::new(RwLock::new(VecDeque::new())),
            pump: Mutex::new(None),
        }
    }

    /// Most recent entries, newest first.
    #[must_use]
    pub fn recent(&self) -> Vec<ActivityEntry> {
        self.entries.read().iter().cloned().collect()
    }

    /// Subscribe to the workspace activity log and start consuming it.
    pub async fn attach(&self) -> Result<()> {
        let identity = self.session.require()?;
        self.detach().await;

        let subscription = self
            .backend
            .subscribe_activity(identity.workspace_id)
            .await
            .map_err(|error| Error::Subscribe(error.to_string()))?;

        self.connectivity.register(Topic::Activity);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(pump_activity(
            subscription,
            identity.user_id,
            Arc::clone(&self.entries),
            Arc::clone(&self.members),
            Arc::clone(&self.connectivity),
            shutdown_rx,
        ));
        *self.pump.lock().await = Some(Pump {
            shutdown: shutdown_tx,
            task,
        });
        Ok(())
    }

    /// Tear down the subscription and wait for the pump to stop.
    pub async fn detach(&self) {
        let Some(pump) = self.pump.lock().await.take() else {
            return;
        };
        let _ = pump.shutdown.send(true);
        if pump.task.await.is_err() {
            tracing::warn!("activity pump panicked during detach");
        }
        self.connectivity.deregister(Topic::Activity);
    }

    pub(crate) fn clear(&self) {
        self.entries.write().clear();
    }
}

async fn pump_activity(
    mut subscription: ActivitySubscription,
    current_user: UserId,
    entries: Arc<RwLock<VecDeque<ActivityEntry>>>,
    members: Arc<MemberDirectory>,
    connectivity: Arc<ConnectivityMonitor>,
    mut shutdown: watch::Receiver<bool>,
) {
    let initial = *subscription.status.borrow_and_update();
    connectivity.report(Topic::Activity, initial);

    let mut status_open = true;
    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            changed = subscription.status.changed(), if status_open => match changed {
                Ok(()) => {
                    connectivity.report(Topic::Activity, *subscription.status.borrow_and_update());
                }
                Err(_) => {
                    status_open = false;
                    connectivity.report(Topic::Activity, FeedStatus::Closed);
                }
            },
            event = subscription.events.recv() => {
                let Some(event) = event else {
                    connectivity.report(Topic::Activity, FeedStatus::Closed);
                    break;
                };
                // A user does not see their own actions echoed back.
                if event.actor_id == current_user {
                    continue;
                }
                let actor_name = members
                    .display_name(&event.actor_id)
                    .unwrap_or_else(|| "Unknown member".to_string());
                let entry = ActivityEntry {
                    actor_name,
                    kind: event.kind,
                    entity_name: event.entity_name,
                    action: event.action,
                    occurred_at: event.occurred_at,
                };
                let mut entries = entries.write();
                entries.push_front(entry);
                entries.truncate(RECENT_ACTIVITY_CAPACITY);
            }
        }
    }
}
