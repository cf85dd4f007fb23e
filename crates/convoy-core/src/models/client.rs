//! Client (customer company) model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::record::{
    RecordDraft, RecordId, RecordKind, RecordPatch, SyncRecord, UserId, WorkspaceId,
};
use crate::util::{normalize_text, normalize_text_option};

/// A customer company that orders transports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: RecordId,
    pub workspace_id: WorkspaceId,
    pub owner_id: UserId,
    pub created_at: i64,
    pub updated_at: i64,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Display name of the member who created this client, joined locally
    /// from the team directory. Not part of the backend row.
    #[serde(skip)]
    pub creator_name: Option<String>,
}

impl SyncRecord for Client {
    const KIND: RecordKind = RecordKind::Clients;
    type Draft = NewClient;
    type Patch = ClientPatch;

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
        let creator_name = self.creator_name.take();
        *self = incoming;
        if self.creator_name.is_none() {
            self.creator_name = creator_name;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub company_name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl RecordDraft<Client> for NewClient {
    fn validate(&self) -> Result<()> {
        if normalize_text(&self.company_name).is_empty() {
            return Err(Error::InvalidInput(
                "client company name cannot be empty".into(),
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
    ) -> Client {
        Client {
            id,
            workspace_id,
            owner_id,
            created_at: now_ms,
            updated_at: now_ms,
            company_name: normalize_text(&self.company_name),
            contact_name: normalize_text_option(self.contact_name),
            email: normalize_text_option(self.email),
            address: normalize_text_option(self.address),
            city: normalize_text_option(self.city),
            creator_name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl RecordPatch<Client> for ClientPatch {
    fn apply_to(&self, record: &mut Client) {
        if let Some(company_name) = &self.company_name {
            record.company_name = company_name.clone();
        }
        if let Some(contact_name) = &self.contact_name {
            record.contact_name = Some(contact_name.clone());
        }
        if let Some(email) = &self.email {
            record.email = Some(email.clone());
        }
        if let Some(address) = &self.address {
            record.address = Some(address.clone());
        }
        if let Some(city) = &self.city {
            record.city = Some(city.clone());
        }
    }
}
