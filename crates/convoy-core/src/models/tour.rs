//! Saved tour model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::record::{
    RecordDraft, RecordId, RecordKind, RecordPatch, SyncRecord, UserId, WorkspaceId,
};
use crate::util::normalize_text;

/// A reusable multi-stop route saved by a workspace member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub id: RecordId,
    pub workspace_id: WorkspaceId,
    pub owner_id: UserId,
    pub created_at: i64,
    pub updated_at: i64,
    pub name: String,
    /// Ordered stop addresses
    pub stops: Vec<String>,
    pub distance_km: f64,
}

impl SyncRecord for Tour {
    const KIND: RecordKind = RecordKind::Tours;
    type Draft = NewTour;
    type Patch = TourPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTour {
    pub name: String,
    pub stops: Vec<String>,
    pub distance_km: f64,
}

impl RecordDraft<Tour> for NewTour {
    fn validate(&self) -> Result<()> {
        if normalize_text(&self.name).is_empty() {
            return Err(Error::InvalidInput("tour name cannot be empty".into()));
        }
        Ok(())
    }

    fn into_record(
        self,
        id: RecordId,
        workspace_id: WorkspaceId,
        owner_id: UserId,
        now_ms: i64,
    ) -> Tour {
        Tour {
            id,
            workspace_id,
            owner_id,
            created_at: now_ms,
            updated_at: now_ms,
            name: normalize_text(&self.name),
            stops: self.stops,
            distance_km: self.distance_km,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TourPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stops: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl RecordPatch<Tour> for TourPatch {
    fn apply_to(&self, record: &mut Tour) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(stops) = &self.stops {
            record.stops = stops.clone();
        }
        if let Some(distance_km) = self.distance_km {
            record.distance_km = distance_km;
        }
    }
}
