//! Trailer model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::record::{
    RecordDraft, RecordId, RecordKind, RecordPatch, SyncRecord, UserId, WorkspaceId,
};
use crate::util::normalize_text;

/// A trailer or semi-trailer attached to fleet vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    pub id: RecordId,
    pub workspace_id: WorkspaceId,
    pub owner_id: UserId,
    pub created_at: i64,
    pub updated_at: i64,
    pub name: String,
    pub registration: String,
    pub axle_count: u8,
    /// Usable volume in cubic metres
    pub volume_m3: f64,
}

impl SyncRecord for Trailer {
    const KIND: RecordKind = RecordKind::Trailers;
    type Draft = NewTrailer;
    type Patch = TrailerPatch;

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
pub struct NewTrailer {
    pub name: String,
    pub registration: String,
    pub axle_count: u8,
    pub volume_m3: f64,
}

impl RecordDraft<Trailer> for NewTrailer {
    fn validate(&self) -> Result<()> {
        if normalize_text(&self.name).is_empty() {
            return Err(Error::InvalidInput("trailer name cannot be empty".into()));
        }
        Ok(())
    }

    fn into_record(
        self,
        id: RecordId,
        workspace_id: WorkspaceId,
        owner_id: UserId,
        now_ms: i64,
    ) -> Trailer {
        Trailer {
            id,
            workspace_id,
            owner_id,
            created_at: now_ms,
            updated_at: now_ms,
            name: normalize_text(&self.name),
            registration: normalize_text(&self.registration),
            axle_count: self.axle_count,
            volume_m3: self.volume_m3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrailerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axle_count: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_m3: Option<f64>,
}

impl RecordPatch<Trailer> for TrailerPatch {
    fn apply_to(&self, record: &mut Trailer) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(registration) = &self.registration {
            record.registration = registration.clone();
        }
        if let Some(axle_count) = self.axle_count {
            record.axle_count = axle_count;
        }
        if let Some(volume) = self.volume_m3 {
            record.volume_m3 = volume;
        }
    }
}
