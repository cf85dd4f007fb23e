//! Reconciliation policy shared by every entity store.
//!
//! Events are applied strictly in arrival order per subscription. Delivery
//! is at-least-once and includes the caller's own echoes, so every branch
//! must be idempotent.

use crate::backend::ChangeEvent;
use crate::models::SyncRecord;

/// What reconciling one event did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Applied {
    /// New row prepended
    Inserted,
    /// Existing row merged with the incoming one
    Updated,
    /// Row removed
    Removed,
    /// Duplicate insert, unknown update target, or already-gone delete
    Ignored,
    /// Incoming update carried an older `updated_at` than the local row
    Stale,
}

/// Merge one delivered event into the collection.
pub(crate) fn apply<T: SyncRecord>(rows: &mut Vec<T>, event: ChangeEvent<T>) -> Applied {
    match event {
        ChangeEvent::Inserted(row) => {
            // The caller's own optimistic insert (or a duplicate delivery)
            // already placed this row.
            if rows.iter().any(|existing| existing.id() == row.id()) {
                return Applied::Ignored;
            }
            rows.insert(0, row);
            Applied::Inserted
        }
        ChangeEvent::Updated(row) => {
            let Some(local) = rows.iter_mut().find(|existing| existing.id() == row.id()) else {
                // Update for a row this client has not loaded; a later fetch
                // or echo supplies it.
                return Applied::Ignored;
            };
            if row.updated_at() < local.updated_at() {
                // Out-of-order delivery: an older write must not clobber a
                // newer local state.
                return Applied::Stale;
            }
            local.absorb(row);
            Applied::Updated
        }
        ChangeEvent::Deleted(id) => {
            let before = rows.len();
            rows.retain(|existing| existing.id() != id);
            if rows.len() == before {
                Applied::Ignored
            } else {
                Applied::Removed
            }
        }
    }
}
