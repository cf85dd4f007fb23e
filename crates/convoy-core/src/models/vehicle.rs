//! Vehicle model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::record::{
    RecordDraft, RecordId, RecordKind, RecordPatch, SyncRecord, UserId, WorkspaceId,
};
use crate::util::normalize_text;

/// A tractor unit or rigid truck in the workspace fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: RecordId,
    pub workspace_id: WorkspaceId,
    pub owner_id: UserId,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms); last-write-wins tiebreaker
    pub updated_at: i64,
    /// Display name, e.g. "Truck A"
    pub name: String,
    /// Registration plate
    pub registration: String,
    /// Average fuel consumption in litres per 100 km
    pub consumption_l_per_100km: f64,
    /// Maximum payload in kilograms
    pub payload_capacity_kg: u32,
}

impl SyncRecord for Vehicle {
    const KIND: RecordKind = RecordKind::Vehicles;
    type Draft = NewVehicle;
    type Patch = VehiclePatch;

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

/// Create payload for a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVehicle {
    pub name: String,
    pub registration: String,
    pub consumption_l_per_100km: f64,
    pub payload_capacity_kg: u32,
}

impl RecordDraft<Vehicle> for NewVehicle {
    fn validate(&self) -> Result<()> {
        if normalize_text(&self.name).is_empty() {
            return Err(Error::InvalidInput("vehicle name cannot be empty".into()));
        }
        if normalize_text(&self.registration).is_empty() {
            return Err(Error::InvalidInput(
                "vehicle registration cannot be empty".into(),
            ));
        }
        Ok(())
    }

    fn into_record(
        self,
        id: RecordId,
        workspace_id: WorkspaceId,
        owner_id: UserId,
        now_ms: i64,
    ) -> Vehicle {
        Vehicle {
            id,
            workspace_id,
            owner_id,
            created_at: now_ms,
            updated_at: now_ms,
            name: normalize_text(&self.name),
            registration: normalize_text(&self.registration),
            consumption_l_per_100km: self.consumption_l_per_100km,
            payload_capacity_kg: self.payload_capacity_kg,
        }
    }
}

/// Partial update for a vehicle; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehiclePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumption_l_per_100km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_capacity_kg: Option<u32>,
}

impl RecordPatch<Vehicle> for VehiclePatch {
    fn apply_to(&self, record: &mut Vehicle) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(registration) = &self.registration {
            record.registration = registration.clone();
        }
        if let Some(consumption) = self.consumption_l_per_100km {
            record.consumption_l_per_100km = consumption;
        }
        if let Some(capacity) = self.payload_capacity_kg {
            record.payload_capacity_kg = capacity;
        }
    }
}
