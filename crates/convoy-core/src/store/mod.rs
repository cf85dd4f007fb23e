//! Generic per-entity store: optimistic CRUD against the backend plus live
//! reconciliation of change notifications into the local collection.

mod reconcile;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::backend::{ChangeEvent, ChangeSubscription, FeedStatus, RecordBackend, Topic};
use crate::connectivity::ConnectivityMonitor;
use crate::error::{Error, Result};
use crate::models::{RecordDraft, RecordId, SyncRecord, WorkspaceId};
use crate::notify::Notifier;
use crate::session::WorkspaceSession;

use reconcile::Applied;

/// Running subscription pump for one store.
struct Pump {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// In-memory synchronized collection for one entity kind.
///
/// The collection is owned exclusively by this store: local mutations and
/// reconciled events funnel through the same single-writer lock, so the
/// optimistic apply and its later echo cannot interleave destructively.
pub struct EntityStore<T: SyncRecord, B: RecordBackend<T>> {
    backend: B,
    session: Arc<WorkspaceSession>,
    notifier: Arc<dyn Notifier>,
    connectivity: Arc<ConnectivityMonitor>,
    rows: Arc<RwLock<Vec<T>>>,
    /// True once the first successful fetch completed for this login.
    loaded: watch::Sender<bool>,
    /// Gate serializing full fetches so concurrent callers coalesce.
    fetch_gate: Mutex<()>,
    /// Bumped after every successful fetch; lets gate waiters detect that
    /// the fetch they queued behind already did the work.
    fetch_generation: AtomicU64,
    /// Reconciled updates rejected for carrying an older `updated_at`.
    stale_updates: Arc<AtomicU64>,
    pump: Mutex<Option<Pump>>,
}

impl<T: SyncRecord, B: RecordBackend<T>> EntityStore<T, B> {
    pub fn new(
        backend: B,
        session: Arc<WorkspaceSession>,
        notifier: Arc<dyn Notifier>,
        connectivity: Arc<ConnectivityMonitor>,
    ) -> Self {
        let (loaded, _) = watch::channel(false);
        Self {
            backend,
            session,
            notifier,
            connectivity,
            rows: Arc::new(RwLock::new(Vec::new())),
            loaded,
            fetch_gate: Mutex::new(()),
            fetch_generation: AtomicU64::new(0),
            stale_updates: Arc::new(AtomicU64::new(0)),
            pump: Mutex::new(None),
        }
    }

    /// Snapshot of the current best-known collection.
    #[must_use]
    pub fn list(&self) -> Vec<T> {
        self.rows.read().clone()
    }

    /// Whether the first fetch for this login has completed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        *self.loaded.borrow()
    }

    /// Reactive handle for the loaded flag.
    #[must_use]
    pub fn loaded_watch(&self) -> watch::Receiver<bool> {
        self.loaded.subscribe()
    }

    /// Count of reconciled updates rejected as stale (older `updated_at`).
    #[must_use]
    pub fn stale_update_count(&self) -> u64 {
        self.stale_updates.load(Ordering::Relaxed)
    }

    /// Replace the whole collection with a fresh read from the backend.
    ///
    /// Concurrent callers coalesce: whoever queues behind an in-flight fetch
    /// returns once that fetch lands instead of issuing a duplicate read.
    /// On failure the previous collection is kept.
    pub async fn fetch_all(&self) -> Result<()> {
        let workspace_id = self.session.require()?.workspace_id;

        let generation = self.fetch_generation.load(Ordering::Acquire);
        let _gate = self.fetch_gate.lock().await;
        if self.fetch_generation.load(Ordering::Acquire) != generation {
            return Ok(());
        }

        match self.backend.select_all(workspace_id).await {
            Ok(fresh) => {
                tracing::debug!(kind = %T::KIND, rows = fresh.len(), "collection fetched");
                *self.rows.write() = fresh;
                self.fetch_generation.fetch_add(1, Ordering::Release);
                self.loaded.send_replace(true);
                Ok(())
            }
            Err(error) => {
                // Keep what we have; an empty flash is worse than stale data.
                self.notifier
                    .failure(&format!("Could not load {}: {error}", T::KIND));
                Err(Error::Fetch(error.to_string()))
            }
        }
    }

    /// Create a record owned by the current user and prepend it optimistically.
    pub async fn create(&self, draft: T::Draft) -> Result<T> {
        draft.validate()?;
        let identity = match self.session.require() {
            Ok(identity) => identity,
            Err(error) => {
                self.notifier.failure("Not signed in - please reconnect");
                return Err(error);
            }
        };

        let row = match self
            .backend
            .insert(identity.workspace_id, identity.user_id, draft)
            .await
        {
            Ok(row) => row,
            Err(error) => {
                self.notifier
                    .failure(&format!("Could not create {}: {error}", T::KIND.singular()));
                return Err(Error::BackendWrite(error.to_string()));
            }
        };

        {
            // Dedup against a fast echo that may have raced us here.
            let mut rows = self.rows.write();
            if !rows.iter().any(|existing| existing.id() == row.id()) {
                rows.insert(0, row.clone());
            }
        }
        self.notifier
            .success(&format!("Created {}", T::KIND.singular()));
        Ok(row)
    }

    /// Persist a partial update, then apply the stamped row locally.
    ///
    /// The response goes through the same reconciliation path as delivered
    /// events, so a response that comes back after a newer remote write was
    /// already reconciled cannot roll the row back.
    ///
    /// Returns whether a local row was present to patch; `false` means the
    /// write persisted but this client had not loaded the row yet.
    pub async fn update(&self, id: RecordId, patch: T::Patch) -> Result<bool> {
        let stamped = match self.backend.update(id, &patch).await {
            Ok(row) => row,
            Err(error) => {
                self.notifier
                    .failure(&format!("Could not update {}: {error}", T::KIND.singular()));
                return Err(Error::BackendWrite(error.to_string()));
            }
        };

        let outcome = {
            let mut rows = self.rows.write();
            reconcile::apply(&mut rows, ChangeEvent::Updated(stamped))
        };
        if outcome == Applied::Stale {
            self.stale_updates.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(kind = %T::KIND, "update response arrived after a newer write");
        }
        self.notifier
            .success(&format!("Updated {}", T::KIND.singular()));
        Ok(outcome != Applied::Ignored)
    }

    /// Persist a delete, then drop the record locally.
    pub async fn delete(&self, id: RecordId) -> Result<bool> {
        if let Err(error) = self.backend.delete(id).await {
            self.notifier
                .failure(&format!("Could not delete {}: {error}", T::KIND.singular()));
            return Err(Error::BackendWrite(error.to_string()));
        }

        let removed = {
            let mut rows = self.rows.write();
            let before = rows.len();
            rows.retain(|existing| existing.id() != id);
            rows.len() != before
        };
        self.notifier
            .success(&format!("Deleted {}", T::KIND.singular()));
        Ok(removed)
    }

    /// Apply a local-only annotation to a cached row, e.g. a display name
    /// joined from another collection.
    ///
    /// Annotations are never persisted and survive reconciled updates via
    /// `absorb`. Returns whether the row was present.
    pub fn annotate(&self, id: RecordId, annotate: impl FnOnce(&mut T)) -> bool {
        let mut rows = self.rows.write();
        match rows.iter_mut().find(|existing| existing.id() == id) {
            Some(local) => {
                annotate(local);
                true
            }
            None => false,
        }
    }

    /// Open the change-notification subscription for the current workspace
    /// and start reconciling its events.
    ///
    /// Any previous subscription is torn down first, so a workspace switch
    /// cannot leak events across tenants.
    pub async fn attach(&self) -> Result<()> {
        let workspace_id = self.session.require()?.workspace_id;
        self.detach().await;

        let subscription = self
            .backend
            .subscribe(workspace_id)
            .await
            .map_err(|error| Error::Subscribe(error.to_string()))?;

        let topic = Topic::Records(T::KIND);
        self.connectivity.register(topic);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(pump_events(
            subscription,
            workspace_id,
            Arc::clone(&self.rows),
            Arc::clone(&self.stale_updates),
            Arc::clone(&self.connectivity),
            topic,
            shutdown_rx,
        ));
        *self.pump.lock().await = Some(Pump {
            shutdown: shutdown_tx,
            task,
        });
        tracing::debug!(kind = %T::KIND, workspace = %workspace_id, "subscription attached");
        Ok(())
    }

    /// Tear down the subscription and wait for the pump to stop.
    ///
    /// After this returns, no further event will be reconciled into the
    /// collection.
    pub async fn detach(&self) {
        let Some(pump) = self.pump.lock().await.take() else {
            return;
        };
        let _ = pump.shutdown.send(true);
        if pump.task.await.is_err() {
            tracing::warn!(kind = %T::KIND, "subscription pump panicked during detach");
        }
        self.connectivity.deregister(Topic::Records(T::KIND));
    }

    /// Drop the collection and loading state (session teardown).
    pub(crate) fn clear(&self) {
        self.rows.write().clear();
        self.loaded.send_replace(false);
    }
}

/// Long-lived event loop for one store's subscription.
///
/// Never performs backend calls itself, so in-flight CRUD cannot stall
/// reconciliation of unrelated events.
async fn pump_events<T: SyncRecord>(
    mut subscription: ChangeSubscription<T>,
    workspace_id: WorkspaceId,
    rows: Arc<RwLock<Vec<T>>>,
    stale_updates: Arc<AtomicU64>,
    connectivity: Arc<ConnectivityMonitor>,
    topic: Topic,
    mut shutdown: watch::Receiver<bool>,
) {
    let initial = *subscription.status.borrow_and_update();
    connectivity.report(topic, initial);

    let mut status_open = true;
    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            changed = subscription.status.changed(), if status_open => match changed {
                Ok(()) => {
                    connectivity.report(topic, *subscription.status.borrow_and_update());
                }
                Err(_) => {
                    status_open = false;
                    connectivity.report(topic, FeedStatus::Closed);
                }
            },
            event = subscription.events.recv() => {
                let Some(event) = event else {
                    connectivity.report(topic, FeedStatus::Closed);
                    break;
                };
                if event
                    .row_workspace()
                    .is_some_and(|workspace| workspace != workspace_id)
                {
                    tracing::debug!(kind = %T::KIND, "dropped event for foreign workspace");
                    continue;
                }
                let outcome = {
                    let mut rows = rows.write();
                    reconcile::apply(&mut rows, event)
                };
                match outcome {
                    Applied::Stale => {
                        stale_updates.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(kind = %T::KIND, "rejected stale update");
                    }
                    outcome => {
                        tracing::trace!(kind = %T::KIND, ?outcome, "event reconciled");
                    }
                }
            }
        }
    }
}
