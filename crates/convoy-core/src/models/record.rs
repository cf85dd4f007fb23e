//! Shared record identity and the synchronization trait every entity implements.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// A unique identifier for a synchronized record, using UUID v7 (time-sortable).
///
/// Assigned by the backend at creation time; the engine never invents one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

/// A unique identifier for a workspace user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

/// A unique identifier for a workspace (the company-scoped tenant boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceId(Uuid);

macro_rules! id_impls {
    ($name:ident) => {
        impl $name {
            /// Create a new unique id using UUID v7
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Get the string representation of this id
            #[must_use]
            pub fn as_str(&self) -> String {
                self.0.to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

id_impls!(RecordId);
id_impls!(UserId);
id_impls!(WorkspaceId);

/// The eight synchronized entity types, each with its own collection and
/// change-notification topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Vehicles,
    Trailers,
    Drivers,
    Charges,
    Clients,
    Tours,
    Trips,
    Quotes,
}

impl RecordKind {
    /// All kinds, in the order the engine wires its stores.
    pub const ALL: [Self; 8] = [
        Self::Vehicles,
        Self::Trailers,
        Self::Drivers,
        Self::Charges,
        Self::Clients,
        Self::Tours,
        Self::Trips,
        Self::Quotes,
    ];

    /// Topic/table name for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Trailers => "trailers",
            Self::Drivers => "drivers",
            Self::Charges => "charges",
            Self::Clients => "clients",
            Self::Tours => "tours",
            Self::Trips => "trips",
            Self::Quotes => "quotes",
        }
    }

    /// Singular label used in user-facing outcome messages.
    #[must_use]
    pub const fn singular(self) -> &'static str {
        match self {
            Self::Vehicles => "vehicle",
            Self::Trailers => "trailer",
            Self::Drivers => "driver",
            Self::Charges => "charge",
            Self::Clients => "client",
            Self::Tours => "tour",
            Self::Trips => "trip",
            Self::Quotes => "quote",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workspace-scoped record kept in sync across clients.
///
/// Every record carries the shared structural shape (id, workspace, owner,
/// timestamps) plus its entity payload. `updated_at` is the last-write-wins
/// tiebreaker during reconciliation.
pub trait SyncRecord:
    Clone + fmt::Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    const KIND: RecordKind;

    /// Payload used to create a new record.
    type Draft: RecordDraft<Self>;
    /// Partial payload used to update an existing record.
    type Patch: RecordPatch<Self>;

    fn id(&self) -> RecordId;
    fn workspace_id(&self) -> WorkspaceId;
    fn owner_id(&self) -> UserId;
    fn updated_at(&self) -> i64;

    /// Replace this row with an incoming backend row.
    ///
    /// Backend-owned fields always take the incoming values. Records that
    /// carry locally-joined annotation fields (not part of the backend row)
    /// override this to keep them, since the incoming row arrives bare.
    fn absorb(&mut self, incoming: Self) {
        *self = incoming;
    }
}

/// Create payload for a record kind.
///
/// The backend owns id assignment and timestamp stamping, so composing the
/// full row is deferred to the backend implementation via `into_record`.
pub trait RecordDraft<T>: Clone + fmt::Debug + Send + Sync + 'static {
    /// Validate user input before any backend call is made.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Compose the full row from this draft.
    fn into_record(
        self,
        id: RecordId,
        workspace_id: WorkspaceId,
        owner_id: UserId,
        now_ms: i64,
    ) -> T;
}

/// Partial update payload for a record kind.
///
/// Serializes to a sparse object (`None` fields omitted) so backend
/// implementations can forward it as a partial write.
pub trait RecordPatch<T>: Clone + fmt::Debug + Send + Sync + Serialize + 'static {
    /// Apply the present fields to a record in place.
    fn apply_to(&self, record: &mut T);
}
