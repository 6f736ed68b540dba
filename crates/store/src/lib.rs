//! Permission table and caller directory backends.
//!
//! The evaluator only ever reads through [`PermissionStore::try_get`];
//! writes belong to whatever administers the table.

pub mod memory;
pub mod snapshot;

use ledger_acl_core::{AclResult, PermissionItem};
use std::sync::Arc;

pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;

/// Read-only view of the `log_access_permissions` table.
pub trait PermissionStore: Send + Sync {
    /// Single atomic lookup. `Ok(None)` means the user has no record.
    fn try_get(&self, user_id: &str) -> AclResult<Option<PermissionItem>>;
}

/// Registered users and consortium members known to the ledger.
pub trait Directory: Send + Sync {
    fn is_user(&self, id: &str) -> bool;
    fn is_member(&self, id: &str) -> bool;
}

impl<S: PermissionStore + ?Sized> PermissionStore for &S {
    fn try_get(&self, user_id: &str) -> AclResult<Option<PermissionItem>> {
        (**self).try_get(user_id)
    }
}

impl<S: PermissionStore + ?Sized> PermissionStore for Arc<S> {
    fn try_get(&self, user_id: &str) -> AclResult<Option<PermissionItem>> {
        (**self).try_get(user_id)
    }
}
