//! Fixed charge model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::record::{
    RecordDraft, RecordId, RecordKind, RecordPatch, SyncRecord, UserId, WorkspaceId,
};
use crate::util::normalize_text;

/// How often a fixed charge recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    Monthly,
    Quarterly,
    Yearly,
}

/// A recurring fixed cost (insurance, leasing, tax) carried by the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub id: RecordId,
    pub workspace_id: WorkspaceId,
    pub owner_id: UserId,
    pub created_at: i64,
    pub updated_at: i64,
    pub label: String,
    /// Amount in euro cents, avoiding float drift in sums
    pub amount_cents: i64,
    pub periodicity: Periodicity,
}

impl SyncRecord for Charge {
    const KIND: RecordKind = RecordKind::Charges;
    type Draft = NewCharge;
    type Patch = ChargePatch;

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
pub struct NewCharge {
    pub label: String,
    pub amount_cents: i64,
    pub periodicity: Periodicity,
}

impl RecordDraft<Charge> for NewCharge {
    fn validate(&self) -> Result<()> {
        if normalize_text(&self.label).is_empty() {
            return Err(Error::InvalidInput("charge label cannot be empty".into()));
        }
        if self.amount_cents < 0 {
            return Err(Error::InvalidInput(
                "charge amount cannot be negative".into(),
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
    ) -> Charge {
        Charge {
            id,
            workspace_id,
            owner_id,
            created_at: now_ms,
            updated_at: now_ms,
            label: normalize_text(&self.label),
            amount_cents: self.amount_cents,
            periodicity: self.periodicity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChargePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodicity: Option<Periodicity>,
}

impl RecordPatch<Charge> for ChargePatch {
    fn apply_to(&self, record: &mut Charge) {
        if let Some(label) = &self.label {
            record.label = label.clone();
        }
        if let Some(amount_cents) = self.amount_cents {
            record.amount_cents = amount_cents;
        }
        if let Some(periodicity) = self.periodicity {
            record.periodicity = periodicity;
        }
    }
}
