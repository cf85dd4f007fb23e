//! Read-shared team member directory used to annotate entities and
//! activity entries with display names.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::models::{TeamMember, UserId};

/// Snapshot map of workspace members.
///
/// Rebuilt wholesale on each team fetch and never patched in place, so
/// lookups never observe a partial rebuild.
pub struct MemberDirectory {
    members: RwLock<HashMap<UserId, TeamMember>>,
}

impl MemberDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the whole directory with a fresh fetch.
    pub fn replace(&self, members: Vec<TeamMember>) {
        let fresh: HashMap<_, _> = members
            .into_iter()
            .map(|member| (member.user_id, member))
            .collect();
        *self.members.write() = fresh;
    }

    /// Display name for a member, if known.
    #[must_use]
    pub fn display_name(&self, user_id: &UserId) -> Option<String> {
        self.members
            .read()
            .get(user_id)
            .map(|member| member.display_name.clone())
    }

    /// All members, sorted by display name.
    #[must_use]
    pub fn all(&self) -> Vec<TeamMember> {
        let mut members: Vec<_> = self.members.read().values().cloned().collect();
        members.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        members
    }

    pub fn clear(&self) {
        self.members.write().clear();
    }
}

impl Default for MemberDirectory {
    fn default() -> Self {
        Self::new()
    }
}
