//! Trip model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::record::{
    RecordDraft, RecordId, RecordKind, RecordPatch, SyncRecord, UserId, WorkspaceId,
};
use crate::util::normalize_text;

/// A scheduled or completed transport between two places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: RecordId,
    pub workspace_id: WorkspaceId,
    pub owner_id: UserId,
    pub created_at: i64,
    pub updated_at: i64,
    pub label: String,
    pub origin: String,
    pub destination: String,
    /// Scheduled departure (Unix ms)
    pub departure_at: i64,
    pub vehicle_id: Option<RecordId>,
    pub driver_id: Option<RecordId>,
    pub distance_km: f64,
    /// Display name of the assigned vehicle, joined locally from the
    /// vehicle collection. Not part of the backend row.
    #[serde(skip)]
    pub vehicle_name: Option<String>,
}

impl SyncRecord for Trip {
    const KIND: RecordKind = RecordKind::Trips;
    type Draft = NewTrip;
    type Patch = TripPatch;

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

    fn absorb(&mut self, incoming: Self) {
        let vehicle_name = self.vehicle_name.take();
        let vehicle_changed = self.vehicle_id != incoming.vehicle_id;
        *self = incoming;
        // A changed assignment invalidates the joined name
        if self.vehicle_name.is_none() && !vehicle_changed {
            self.vehicle_name = vehicle_name;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrip {
    pub label: String,
    pub origin: String,
    pub destination: String,
    pub departure_at: i64,
    pub vehicle_id: Option<RecordId>,
    pub driver_id: Option<RecordId>,
    pub distance_km: f64,
}

impl RecordDraft<Trip> for NewTrip {
    fn validate(&self) -> Result<()> {
        if normalize_text(&self.origin).is_empty() || normalize_text(&self.destination).is_empty() {
            return Err(Error::InvalidInput(
                "trip origin and destination are required".into(),
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
    ) -> Trip {
        Trip {
            id,
            workspace_id,
            owner_id,
            created_at: now_ms,
            updated_at: now_ms,
            label: normalize_text(&self.label),
            origin: normalize_text(&self.origin),
            destination: normalize_text(&self.destination),
            departure_at: self.departure_at,
            vehicle_id: self.vehicle_id,
            driver_id: self.driver_id,
            distance_km: self.distance_km,
            vehicle_name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl RecordPatch<Trip> for TripPatch {
    fn apply_to(&self, record: &mut Trip) {
        if let Some(label) = &self.label {
            record.label = label.clone();
        }
        if let Some(origin) = &self.origin {
            record.origin = origin.clone();
        }
        if let Some(destination) = &self.destination {
            record.destination = destination.clone();
        }
        if let Some(departure_at) = self.departure_at {
            record.departure_at = departure_at;
        }
        if let Some(vehicle_id) = self.vehicle_id {
            record.vehicle_id = Some(vehicle_id);
        }
        if let Some(driver_id) = self.driver_id {
            record.driver_id = Some(driver_id);
        }
        if let Some(distance_km) = self.distance_km {
            record.distance_km = distance_km;
        }
    }
}
