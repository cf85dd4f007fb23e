//! Backend collaborator traits: per-entity CRUD surface and the
//! change-notification transport.
//!
//! The engine never talks to a concrete backend; callers supply an
//! implementation of these traits (real transport, or the in-memory hub the
//! integration tests use). Authorization and row scoping are the backend's
//! responsibility.

use std::fmt;

use tokio::sync::{mpsc, watch};

use crate::error::Result;
use crate::models::{
    ActivityEvent, Charge, Client, Driver, Quote, RecordId, RecordKind, SyncRecord, TeamMember,
    Tour, Trailer, Trip, UserId, Vehicle, WorkspaceId,
};

/// Buffer size for change-event channels handed to the engine.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A change notification emitted when any client's write commits.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent<T> {
    Inserted(T),
    Updated(T),
    Deleted(RecordId),
}

impl<T: SyncRecord> ChangeEvent<T> {
    /// Workspace the carried row belongs to; deletes carry only an id.
    pub(crate) fn row_workspace(&self) -> Option<WorkspaceId> {
        match self {
            Self::Inserted(row) | Self::Updated(row) => Some(row.workspace_id()),
            Self::Deleted(_) => None,
        }
    }
}

/// Health of one subscription as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Subscription requested, acknowledgment pending
    Pending,
    /// Transport acknowledged; events are flowing
    Subscribed,
    /// Transport reported an error or timeout; recovery may follow
    Degraded,
    /// Subscription ended and will not recover on its own
    Closed,
}

/// A subscription topic, scoped per entity kind plus the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Records(RecordKind),
    Activity,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Records(kind) => f.write_str(kind.as_str()),
            Self::Activity => f.write_str("activity"),
        }
    }
}

/// Live change feed for one entity kind in one workspace.
pub struct ChangeSubscription<T> {
    pub events: mpsc::Receiver<ChangeEvent<T>>,
    pub status: watch::Receiver<FeedStatus>,
}

/// Live feed of workspace activity log entries.
pub struct ActivitySubscription {
    pub events: mpsc::Receiver<ActivityEvent>,
    pub status: watch::Receiver<FeedStatus>,
}

/// CRUD plus live subscription for one entity kind.
///
/// The backend owns id assignment and `created_at`/`updated_at` stamping;
/// `insert` and `update` return the stamped row as persisted.
#[allow(async_fn_in_trait)]
pub trait RecordBackend<T: SyncRecord> {
    /// Read the full collection for a workspace.
    async fn select_all(&self, workspace_id: WorkspaceId) -> Result<Vec<T>>;

    /// Persist a new record composed from the draft.
    async fn insert(
        &self,
        workspace_id: WorkspaceId,
        owner_id: UserId,
        draft: T::Draft,
    ) -> Result<T>;

    /// Persist a partial update; the server sets `updated_at`.
    async fn update(&self, id: RecordId, patch: &T::Patch) -> Result<T>;

    /// Persist a delete.
    async fn delete(&self, id: RecordId) -> Result<()>;

    /// Open a change-notification subscription scoped to the workspace.
    async fn subscribe(&self, workspace_id: WorkspaceId) -> Result<ChangeSubscription<T>>;
}

/// Read access to the workspace's user list.
#[allow(async_fn_in_trait)]
pub trait MemberBackend {
    async fn fetch_members(&self, workspace_id: WorkspaceId) -> Result<Vec<TeamMember>>;
}

/// Subscription to the workspace-wide append-only activity log.
#[allow(async_fn_in_trait)]
pub trait ActivityBackend {
    async fn subscribe_activity(&self, workspace_id: WorkspaceId) -> Result<ActivitySubscription>;
}

/// Umbrella bound for a backend serving every synchronized entity kind.
pub trait WorkspaceBackend:
    RecordBackend<Vehicle>
    + RecordBackend<Trailer>
    + RecordBackend<Driver>
    + RecordBackend<Charge>
    + RecordBackend<Client>
    + RecordBackend<Tour>
    + RecordBackend<Trip>
    + RecordBackend<Quote>
    + MemberBackend
    + ActivityBackend
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<B> WorkspaceBackend for B where
    B: RecordBackend<Vehicle>
        + RecordBackend<Trailer>
        + RecordBackend<Driver>
        + RecordBackend<Charge>
        + RecordBackend<Client>
        + RecordBackend<Tour>
        + RecordBackend<Trip>
        + RecordBackend<Quote>
        + MemberBackend
        + ActivityBackend
        + Clone
        + Send
        + Sync
        + 'static
{
}
