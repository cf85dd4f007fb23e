//! In-memory workspace backend for the integration suites.
//!
//! One `Hub` plays the server: it stores rows as JSON, stamps ids and
//! timestamps, and broadcasts change events to every open subscription, so
//! several `SyncEngine` instances cloned from the same backend behave like
//! clients of one shared workspace.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, watch};

use convoy_core::backend::{
    ActivityBackend, ActivitySubscription, ChangeEvent, ChangeSubscription, FeedStatus,
    MemberBackend, RecordBackend, Topic, EVENT_CHANNEL_CAPACITY,
};
use convoy_core::error::{Error, Result};
use convoy_core::models::{
    ActivityAction, ActivityEvent, NewClient, NewDriver, NewVehicle, RecordDraft, RecordId,
    RecordKind, RecordPatch, Role, SyncRecord, TeamMember, UserId, WorkspaceId,
};
use convoy_core::notify::Notifier;
use convoy_core::session::IdentityProvider;
use convoy_core::util::now_ms;
use convoy_core::SyncEngine;

enum RawOp {
    Insert,
    Update,
    Delete,
}

/// Type-erased change notification fanned out to every subscriber; typed
/// subscribers filter by kind and workspace and deserialize the row.
struct RawEvent {
    kind: RecordKind,
    workspace_id: WorkspaceId,
    op: RawOp,
    row: Value,
    id: RecordId,
}

/// Delivers one raw event into a typed channel. Returns false once the
/// receiving side is gone so the hub can drop the subscriber.
type Dispatch = Box<dyn Fn(&RawEvent) -> bool + Send>;

struct ActivitySub {
    workspace_id: WorkspaceId,
    events: mpsc::Sender<ActivityEvent>,
}

struct Hub {
    /// Monotonic stamp source; strictly increasing so `updated_at` ordering
    /// is deterministic regardless of wall-clock resolution.
    clock: AtomicI64,
    tables: Mutex<HashMap<RecordKind, Vec<Value>>>,
    members: Mutex<Vec<TeamMember>>,
    record_subs: Mutex<Vec<Dispatch>>,
    activity_subs: Mutex<Vec<ActivitySub>>,
    statuses: Mutex<Vec<(Topic, watch::Sender<FeedStatus>)>>,
    select_calls: Mutex<HashMap<RecordKind, usize>>,
    fail_selects: Mutex<HashSet<RecordKind>>,
    fail_writes: AtomicBool,
    /// When set, `update` broadcasts its change event immediately but holds
    /// the caller's response back, so later writes can reconcile first.
    delay_update_responses: AtomicBool,
}

/// Cloneable handle onto the shared hub, implementing the full backend
/// surface the engine requires.
#[derive(Clone)]
pub struct MockBackend {
    hub: Arc<Hub>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            hub: Arc::new(Hub {
                clock: AtomicI64::new(now_ms()),
                tables: Mutex::new(HashMap::new()),
                members: Mutex::new(Vec::new()),
                record_subs: Mutex::new(Vec::new()),
                activity_subs: Mutex::new(Vec::new()),
                statuses: Mutex::new(Vec::new()),
                select_calls: Mutex::new(HashMap::new()),
                fail_selects: Mutex::new(HashSet::new()),
                fail_writes: AtomicBool::new(false),
                delay_update_responses: AtomicBool::new(false),
            }),
        }
    }

    fn tick(&self) -> i64 {
        self.hub.clock.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn broadcast(&self, raw: &RawEvent) {
        self.hub.record_subs.lock().retain(|dispatch| dispatch(raw));
    }

    /// How many `select_all` calls this kind has served.
    pub fn select_count(&self, kind: RecordKind) -> usize {
        self.hub.select_calls.lock().get(&kind).copied().unwrap_or(0)
    }

    /// Rows currently persisted for a kind, across all workspaces.
    pub fn stored_count(&self, kind: RecordKind) -> usize {
        self.hub
            .tables
            .lock()
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn fail_selects(&self, kind: RecordKind, fail: bool) {
        let mut failing = self.hub.fail_selects.lock();
        if fail {
            failing.insert(kind);
        } else {
            failing.remove(&kind);
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.hub.fail_writes.store(fail, Ordering::Release);
    }

    pub fn delay_update_responses(&self, delay: bool) {
        self.hub.delay_update_responses.store(delay, Ordering::Release);
    }

    pub fn set_members(&self, members: Vec<TeamMember>) {
        *self.hub.members.lock() = members;
    }

    /// Push a status change to every open subscription on a topic.
    pub fn set_topic_status(&self, topic: Topic, status: FeedStatus) {
        for (registered, sender) in self.hub.statuses.lock().iter() {
            if *registered == topic {
                sender.send_replace(status);
            }
        }
    }

    /// Append one entry to the workspace activity log.
    pub fn emit_activity(&self, event: &ActivityEvent) {
        self.hub.activity_subs.lock().retain(|sub| {
            if sub.workspace_id != event.workspace_id {
                return true;
            }
            sub.events.try_send(event.clone()).is_ok()
        });
    }

    /// Broadcast an update event without persisting it, e.g. to simulate an
    /// out-of-order delivery carrying an older row.
    pub fn push_update<T: SyncRecord>(&self, row: &T) -> Result<()> {
        let value = serde_json::to_value(row)?;
        self.broadcast(&RawEvent {
            kind: T::KIND,
            workspace_id: row.workspace_id(),
            op: RawOp::Update,
            row: value,
            id: row.id(),
        });
        Ok(())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SyncRecord> RecordBackend<T> for MockBackend {
    async fn select_all(&self, workspace_id: WorkspaceId) -> Result<Vec<T>> {
        *self.hub.select_calls.lock().entry(T::KIND).or_insert(0) += 1;
        // Keeps the read in flight long enough for concurrent fetchers to
        // queue behind it.
        tokio::time::sleep(Duration::from_millis(5)).await;
        if self.hub.fail_selects.lock().contains(&T::KIND) {
            return Err(Error::Fetch("injected select failure".into()));
        }
        let workspace = serde_json::to_value(workspace_id)?;
        let tables = self.hub.tables.lock();
        tables
            .get(&T::KIND)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|row| row["workspace_id"] == workspace)
            .map(|row| serde_json::from_value(row.clone()).map_err(Error::from))
            .collect()
    }

    async fn insert(
        &self,
        workspace_id: WorkspaceId,
        owner_id: UserId,
        draft: T::Draft,
    ) -> Result<T> {
        if self.hub.fail_writes.load(Ordering::Acquire) {
            return Err(Error::BackendWrite("injected write failure".into()));
        }
        let row = draft.into_record(RecordId::new(), workspace_id, owner_id, self.tick());
        let value = serde_json::to_value(&row)?;
        self.hub
            .tables
            .lock()
            .entry(T::KIND)
            .or_default()
            .push(value.clone());
        self.broadcast(&RawEvent {
            kind: T::KIND,
            workspace_id,
            op: RawOp::Insert,
            row: value,
            id: row.id(),
        });
        Ok(row)
    }

    async fn update(&self, id: RecordId, patch: &T::Patch) -> Result<T> {
        if self.hub.fail_writes.load(Ordering::Acquire) {
            return Err(Error::BackendWrite("injected write failure".into()));
        }
        let id_value = serde_json::to_value(id)?;
        let stamped = {
            let mut tables = self.hub.tables.lock();
            let rows = tables.entry(T::KIND).or_default();
            let Some(value) = rows.iter_mut().find(|row| row["id"] == id_value) else {
                return Err(Error::BackendWrite("row not found".into()));
            };
            let mut record: T = serde_json::from_value(value.clone())?;
            patch.apply_to(&mut record);
            let mut fresh = serde_json::to_value(&record)?;
            fresh["updated_at"] = Value::from(self.tick());
            *value = fresh.clone();
            fresh
        };
        let record: T = serde_json::from_value(stamped.clone())?;
        self.broadcast(&RawEvent {
            kind: T::KIND,
            workspace_id: record.workspace_id(),
            op: RawOp::Update,
            row: stamped,
            id,
        });
        if self.hub.delay_update_responses.load(Ordering::Acquire) {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        if self.hub.fail_writes.load(Ordering::Acquire) {
            return Err(Error::BackendWrite("injected write failure".into()));
        }
        let id_value = serde_json::to_value(id)?;
        let removed = {
            let mut tables = self.hub.tables.lock();
            let rows = tables.entry(T::KIND).or_default();
            rows.iter()
                .position(|row| row["id"] == id_value)
                .map(|position| rows.remove(position))
        };
        if let Some(row) = removed {
            let workspace_id = serde_json::from_value(row["workspace_id"].clone())?;
            self.broadcast(&RawEvent {
                kind: T::KIND,
                workspace_id,
                op: RawOp::Delete,
                row: Value::Null,
                id,
            });
        }
        Ok(())
    }

    async fn subscribe(&self, workspace_id: WorkspaceId) -> Result<ChangeSubscription<T>> {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (status_tx, status_rx) = watch::channel(FeedStatus::Subscribed);
        let dispatch: Dispatch = Box::new(move |raw| {
            if raw.kind != T::KIND || raw.workspace_id != workspace_id {
                return true;
            }
            let event = match raw.op {
                RawOp::Insert => match serde_json::from_value::<T>(raw.row.clone()) {
                    Ok(row) => ChangeEvent::Inserted(row),
                    Err(_) => return true,
                },
                RawOp::Update => match serde_json::from_value::<T>(raw.row.clone()) {
                    Ok(row) => ChangeEvent::Updated(row),
                    Err(_) => return true,
                },
                RawOp::Delete => ChangeEvent::Deleted(raw.id),
            };
            event_tx.try_send(event).is_ok()
        });
        self.hub.record_subs.lock().push(dispatch);
        self.hub
            .statuses
            .lock()
            .push((Topic::Records(T::KIND), status_tx));
        Ok(ChangeSubscription {
            events: event_rx,
            status: status_rx,
        })
    }
}

impl MemberBackend for MockBackend {
    async fn fetch_members(&self, workspace_id: WorkspaceId) -> Result<Vec<TeamMember>> {
        Ok(self
            .hub
            .members
            .lock()
            .iter()
            .filter(|member| member.workspace_id == workspace_id)
            .cloned()
            .collect())
    }
}

impl ActivityBackend for MockBackend {
    async fn subscribe_activity(&self, workspace_id: WorkspaceId) -> Result<ActivitySubscription> {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (status_tx, status_rx) = watch::channel(FeedStatus::Subscribed);
        self.hub.activity_subs.lock().push(ActivitySub {
            workspace_id,
            events: event_tx,
        });
        self.hub.statuses.lock().push((Topic::Activity, status_tx));
        Ok(ActivitySubscription {
            events: event_rx,
            status: status_rx,
        })
    }
}

/// Identity provider whose signed-in state tests flip at will.
pub struct TestIdentity {
    identity: Mutex<Option<(UserId, WorkspaceId)>>,
}

impl TestIdentity {
    pub fn signed_in(user_id: UserId, workspace_id: WorkspaceId) -> Arc<Self> {
        Arc::new(Self {
            identity: Mutex::new(Some((user_id, workspace_id))),
        })
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self {
            identity: Mutex::new(None),
        })
    }

    pub fn sign_in(&self, user_id: UserId, workspace_id: WorkspaceId) {
        *self.identity.lock() = Some((user_id, workspace_id));
    }

    pub fn sign_out(&self) {
        *self.identity.lock() = None;
    }
}

impl IdentityProvider for TestIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        self.identity.lock().map(|(user, _)| user)
    }

    fn current_workspace_id(&self) -> Option<WorkspaceId> {
        self.identity.lock().map(|(_, workspace)| workspace)
    }
}

/// Notifier capturing outcome messages for assertion.
#[derive(Default)]
pub struct RecordingNotifier {
    successes: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().push(message.to_string());
    }

    fn failure(&self, message: &str) {
        self.failures.lock().push(message.to_string());
    }
}

/// One simulated client: an engine plus its identity and notifier handles.
pub struct TestClient {
    pub engine: SyncEngine<MockBackend>,
    pub identity: Arc<TestIdentity>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn client(backend: &MockBackend, user_id: UserId, workspace_id: WorkspaceId) -> TestClient {
    let identity = TestIdentity::signed_in(user_id, workspace_id);
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = SyncEngine::new(
        backend.clone(),
        Arc::clone(&identity) as Arc<dyn IdentityProvider>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
    );
    TestClient {
        engine,
        identity,
        notifier,
    }
}

pub fn signed_out_client(backend: &MockBackend) -> TestClient {
    let identity = TestIdentity::signed_out();
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = SyncEngine::new(
        backend.clone(),
        Arc::clone(&identity) as Arc<dyn IdentityProvider>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
    );
    TestClient {
        engine,
        identity,
        notifier,
    }
}

/// Let the pump tasks drain their channels. Tests run with paused time, so
/// this advances the clock without real waiting.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn vehicle_draft(name: &str) -> NewVehicle {
    NewVehicle {
        name: name.to_string(),
        registration: "AB-123-CD".to_string(),
        consumption_l_per_100km: 32.5,
        payload_capacity_kg: 24_000,
    }
}

pub fn driver_draft(first_name: &str, last_name: &str) -> NewDriver {
    NewDriver {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        phone: None,
        license_number: None,
    }
}

pub fn client_draft(company_name: &str) -> NewClient {
    NewClient {
        company_name: company_name.to_string(),
        contact_name: None,
        email: None,
        address: None,
        city: Some("Grenoble".to_string()),
    }
}

pub fn team_member(user_id: UserId, workspace_id: WorkspaceId, name: &str) -> TeamMember {
    TeamMember {
        user_id,
        workspace_id,
        display_name: name.to_string(),
        email: None,
        role: Role::Operations,
        active: true,
    }
}

pub fn activity(
    actor_id: UserId,
    workspace_id: WorkspaceId,
    entity_name: &str,
    occurred_at: i64,
) -> ActivityEvent {
    ActivityEvent {
        actor_id,
        workspace_id,
        kind: RecordKind::Vehicles,
        entity_name: entity_name.to_string(),
        action: ActivityAction::Created,
        occurred_at,
    }
}
