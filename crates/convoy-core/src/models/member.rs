//! Team member model

use serde::{Deserialize, Serialize};

use crate::models::record::{UserId, WorkspaceId};

/// Role of a member within a workspace.
///
/// Role checks happen at the backend; the engine only carries the value for
/// display and never enforces permissions with it. Deserialization is
/// lenient: a role string this version does not know collapses to `Member`
/// instead of failing the whole team fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Operations,
    Member,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Operations => "operations",
            Self::Member => "member",
        }
    }

    /// Lenient parse; unknown role strings fall back to `Member`.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "owner" => Self::Owner,
            "admin" => Self::Admin,
            "operations" => Self::Operations,
            _ => Self::Member,
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&value))
    }
}

/// A user of the workspace, fetched and joined in to annotate other
/// entities. Not synchronized through the change-notification transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub active: bool,
}
