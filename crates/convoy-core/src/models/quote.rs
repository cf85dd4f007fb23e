//! Quote model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::record::{
    RecordDraft, RecordId, RecordKind, RecordPatch, SyncRecord, UserId, WorkspaceId,
};
use crate::util::normalize_text;

/// Lifecycle state of a quote sent to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
}

/// A priced transport offer issued to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: RecordId,
    pub workspace_id: WorkspaceId,
    pub owner_id: UserId,
    pub created_at: i64,
    pub updated_at: i64,
    /// Human-readable reference, e.g. "Q-2026-014"
    pub reference: String,
    pub client_id: Option<RecordId>,
    pub total_cents: i64,
    pub status: QuoteStatus,
    /// Expiry (Unix ms), if any
    pub valid_until: Option<i64>,
}

impl SyncRecord for Quote {
    const KIND: RecordKind = RecordKind::Quotes;
    type Draft = NewQuote;
    type Patch = QuotePatch;

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
pub struct NewQuote {
    pub reference: String,
    pub client_id: Option<RecordId>,
    pub total_cents: i64,
    pub valid_until: Option<i64>,
}

impl RecordDraft<Quote> for NewQuote {
    fn validate(&self) -> Result<()> {
        if normalize_text(&self.reference).is_empty() {
            return Err(Error::InvalidInput(
                "quote reference cannot be empty".into(),
            ));
        }
        if self.total_cents < 0 {
            return Err(Error::InvalidInput("quote total cannot be negative".into()));
        }
        Ok(())
    }

    fn into_record(
        self,
        id: RecordId,
        workspace_id: WorkspaceId,
        owner_id: UserId,
        now_ms: i64,
    ) -> Quote {
        Quote {
            id,
            workspace_id,
            owner_id,
            created_at: now_ms,
            updated_at: now_ms,
            reference: normalize_text(&self.reference),
            client_id: self.client_id,
            total_cents: self.total_cents,
            status: QuoteStatus::Draft,
            valid_until: self.valid_until,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QuoteStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<i64>,
}

impl RecordPatch<Quote> for QuotePatch {
    fn apply_to(&self, record: &mut Quote) {
        if let Some(reference) = &self.reference {
            record.reference = reference.clone();
        }
        if let Some(client_id) = self.client_id {
            record.client_id = Some(client_id);
        }
        if let Some(total_cents) = self.total_cents {
            record.total_cents = total_cents;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(valid_until) = self.valid_until {
            record.valid_until = Some(valid_until);
        }
    }
}
