//! Activity event model

use serde::{Deserialize, Serialize};

use crate::models::record::{RecordKind, UserId, WorkspaceId};

/// What a workspace member did to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
    Deleted,
}

impl ActivityAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// One entry of the workspace-wide append-only activity log.
///
/// Consumed live and never mutated; the engine keeps only a bounded window
/// of recent entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub actor_id: UserId,
    pub workspace_id: WorkspaceId,
    pub kind: RecordKind,
    /// Human-readable name of the affected entity at event time
    pub entity_name: String,
    pub action: ActivityAction,
    /// Event timestamp (Unix ms)
    pub occurred_at: i64,
}
