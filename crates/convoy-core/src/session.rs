//! Workspace session: the single explicit object every store reads its
//! identity from, instead of ambient globals.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::models::{UserId, WorkspaceId};

/// External identity collaborator. Both ids transition from `None` to `Some`
/// once per login and reset to `None` on logout.
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<UserId>;
    fn current_workspace_id(&self) -> Option<WorkspaceId>;
}

/// The resolved identity pair for one login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
}

/// Caches the resolved user/workspace pair for the lifetime of a login.
///
/// Stores are handed an `Arc<WorkspaceSession>` at construction and stay
/// inert until both ids resolve. `clear` forgets the cache on logout; the
/// next `resolve` consults the provider again.
pub struct WorkspaceSession {
    provider: Arc<dyn IdentityProvider>,
    cached: RwLock<Option<SessionIdentity>>,
}

impl WorkspaceSession {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            cached: RwLock::new(None),
        }
    }

    /// Cached identity, without consulting the provider.
    pub fn current(&self) -> Option<SessionIdentity> {
        *self.cached.read()
    }

    /// Resolve the identity, re-consulting the provider when the cache is
    /// empty. Covers the race where a store call lands before the initial
    /// resolution completed.
    pub fn resolve(&self) -> Option<SessionIdentity> {
        if let Some(identity) = *self.cached.read() {
            return Some(identity);
        }
        let user_id = self.provider.current_user_id()?;
        let workspace_id = self.provider.current_workspace_id()?;
        let identity = SessionIdentity {
            user_id,
            workspace_id,
        };
        *self.cached.write() = Some(identity);
        tracing::debug!(user = %user_id, workspace = %workspace_id, "session resolved");
        Some(identity)
    }

    /// Resolve or fail with `Unauthenticated`.
    pub fn require(&self) -> Result<SessionIdentity> {
        self.resolve().ok_or(Error::Unauthenticated)
    }

    pub fn workspace_id(&self) -> Option<WorkspaceId> {
        self.current().map(|identity| identity.workspace_id)
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.current().map(|identity| identity.user_id)
    }

    /// Forget the cached identity (logout or workspace switch).
    pub fn clear(&self) {
        *self.cached.write() = None;
    }
}
