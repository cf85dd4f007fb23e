//! Aggregator facade composing every entity store behind one interface.

use std::sync::Arc;

use tokio::sync::watch;

use crate::activity::{ActivityEntry, ActivityFeed};
use crate::backend::WorkspaceBackend;
use crate::connectivity::ConnectivityMonitor;
use crate::error::Result;
use crate::members::MemberDirectory;
use crate::models::{
    Charge, Client, Driver, Quote, TeamMember, Tour, Trailer, Trip, Vehicle,
};
use crate::notify::Notifier;
use crate::session::{IdentityProvider, WorkspaceSession};
use crate::store::EntityStore;

/// One synchronized workspace: eight entity stores, the activity feed and
/// the connectivity monitor, sharing a single session.
///
/// Lifecycle: construct once, `start` after login, `shutdown` on logout or
/// before switching workspaces, `start` again for the next session.
pub struct SyncEngine<B: WorkspaceBackend> {
    backend: B,
    session: Arc<WorkspaceSession>,
    connectivity: Arc<ConnectivityMonitor>,
    members: Arc<MemberDirectory>,
    activity: ActivityFeed<B>,
    pub vehicles: EntityStore<Vehicle, B>,
    pub trailers: EntityStore<Trailer, B>,
    pub drivers: EntityStore<Driver, B>,
    pub charges: EntityStore<Charge, B>,
    pub clients: EntityStore<Client, B>,
    pub tours: EntityStore<Tour, B>,
    pub trips: EntityStore<Trip, B>,
    pub quotes: EntityStore<Quote, B>,
}

impl<B: WorkspaceBackend> SyncEngine<B> {
    pub fn new(
        backend: B,
        provider: Arc<dyn IdentityProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let session = Arc::new(WorkspaceSession::new(provider));
        let connectivity = Arc::new(ConnectivityMonitor::new());
        let members = Arc::new(MemberDirectory::new());

        macro_rules! store {
            () => {
                EntityStore::new(
                    backend.clone(),
                    Arc::clone(&session),
                    Arc::clone(&notifier),
                    Arc::clone(&connectivity),
                )
            };
        }

        Self {
            vehicles: store!(),
            trailers: store!(),
            drivers: store!(),
            charges: store!(),
            clients: store!(),
            tours: store!(),
            trips: store!(),
            quotes: store!(),
            activity: ActivityFeed::new(
                backend.clone(),
                Arc::clone(&session),
                Arc::clone(&members),
                Arc::clone(&connectivity),
            ),
            backend,
            session,
            connectivity,
            members,
        }
    }

    /// Resolve the session, load the member directory, run the initial
    /// fetch and open every subscription.
    pub async fn start(&self) -> Result<()> {
        let identity = self.session.require()?;
        tracing::info!(workspace = %identity.workspace_id, "starting workspace sync");

        match self.backend.fetch_members(identity.workspace_id).await {
            Ok(list) => self.members.replace(list),
            Err(error) => {
                tracing::warn!(%error, "could not load team members; attribution degraded");
            }
        }

        self.refresh_all().await;

        self.vehicles.attach().await?;
        self.trailers.attach().await?;
        self.drivers.attach().await?;
        self.charges.attach().await?;
        self.clients.attach().await?;
        self.tours.attach().await?;
        self.trips.attach().await?;
        self.quotes.attach().await?;
        self.activity.attach().await?;
        Ok(())
    }

    /// Re-fetch every store concurrently and wait for all to settle.
    ///
    /// Partial failures do not cancel the others; each store surfaces its
    /// own failure through the notifier.
    pub async fn refresh_all(&self) {
        let results = tokio::join!(
            self.vehicles.fetch_all(),
            self.trailers.fetch_all(),
            self.drivers.fetch_all(),
            self.charges.fetch_all(),
            self.clients.fetch_all(),
            self.tours.fetch_all(),
            self.trips.fetch_all(),
            self.quotes.fetch_all(),
        );
        let failed = [
            results.0.is_err(),
            results.1.is_err(),
            results.2.is_err(),
            results.3.is_err(),
            results.4.is_err(),
            results.5.is_err(),
            results.6.is_err(),
            results.7.is_err(),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count();
        if failed > 0 {
            tracing::warn!(failed, "refresh completed with store failures");
        }
    }

    /// Tear down every subscription, then drop all workspace-local state.
    ///
    /// Subscriptions are detached (and their pumps awaited) before any
    /// state is cleared, so no event of the old workspace can land in a
    /// cleared store.
    pub async fn shutdown(&self) {
        self.activity.detach().await;
        self.vehicles.detach().await;
        self.trailers.detach().await;
        self.drivers.detach().await;
        self.charges.detach().await;
        self.clients.detach().await;
        self.tours.detach().await;
        self.trips.detach().await;
        self.quotes.detach().await;

        self.vehicles.clear();
        self.trailers.clear();
        self.drivers.clear();
        self.charges.clear();
        self.clients.clear();
        self.tours.clear();
        self.trips.clear();
        self.quotes.clear();
        self.activity.clear();
        self.members.clear();
        self.connectivity.reset();
        self.session.clear();
        tracing::info!("workspace sync stopped");
    }

    /// True only while the workspace is known but some store's first fetch
    /// has not completed. Distinct from "waiting for auth", which reports
    /// false here.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        if self.session.current().is_none() {
            return false;
        }
        !(self.vehicles.is_loaded()
            && self.trailers.is_loaded()
            && self.drivers.is_loaded()
            && self.charges.is_loaded()
            && self.clients.is_loaded()
            && self.tours.is_loaded()
            && self.trips.is_loaded()
            && self.quotes.is_loaded())
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connectivity.is_connected()
    }

    /// Reactive handle for the connected boolean.
    #[must_use]
    pub fn watch_connected(&self) -> watch::Receiver<bool> {
        self.connectivity.watch_connected()
    }

    /// Connectivity monitor, for the host to report network state changes.
    #[must_use]
    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    /// Recent activity of other workspace members, newest first.
    #[must_use]
    pub fn recent_activity(&self) -> Vec<ActivityEntry> {
        self.activity.recent()
    }

    /// Current team directory snapshot, sorted by display name.
    #[must_use]
    pub fn members(&self) -> Vec<TeamMember> {
        self.members.all()
    }

    /// The session shared by every store.
    #[must_use]
    pub fn session(&self) -> &Arc<WorkspaceSession> {
        &self.session
    }
}
