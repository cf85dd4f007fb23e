//! Driver model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::record::{
    RecordDraft, RecordId, RecordKind, RecordPatch, SyncRecord, UserId, WorkspaceId,
};
use crate::util::{normalize_text, normalize_text_option};

/// A driver employed by the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: RecordId,
    pub workspace_id: WorkspaceId,
    pub owner_id: UserId,
    pub created_at: i64,
    pub updated_at: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
}

impl Driver {
    /// Full display name, e.g. "Marc Dupont".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl SyncRecord for Driver {
    const KIND: RecordKind = RecordKind::Drivers;
    type Draft = NewDriver;
    type Patch = DriverPatch;

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
pub struct NewDriver {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
}

impl RecordDraft<Driver> for NewDriver {
    fn validate(&self) -> Result<()> {
        if normalize_text(&self.first_name).is_empty() || normalize_text(&self.last_name).is_empty()
        {
            return Err(Error::InvalidInput(
                "driver first and last name are required".into(),
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
    ) -> Driver {
        Driver {
            id,
            workspace_id,
            owner_id,
            created_at: now_ms,
            updated_at: now_ms,
            first_name: normalize_text(&self.first_name),
            last_name: normalize_text(&self.last_name),
            phone: normalize_text_option(self.phone),
            license_number: normalize_text_option(self.license_number),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DriverPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
}

impl RecordPatch<Driver> for DriverPatch {
    fn apply_to(&self, record: &mut Driver) {
        if let Some(first_name) = &self.first_name {
            record.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            record.last_name = last_name.clone();
        }
        if let Some(phone) = &self.phone {
            record.phone = Some(phone.clone());
        }
        if let Some(license_number) = &self.license_number {
            record.license_number = Some(license_number.clone());
        }
    }
}
