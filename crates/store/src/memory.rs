//! In-process permission table.

use crate::{Directory, PermissionStore};
use ledger_acl_core::{AclError, AclResult, PermissionItem};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// `HashMap`-backed table plus user/member sets.
///
/// Writers model the external administrative process: `insert` overwrites,
/// so the latest write wins.
#[derive(Debug, Default)]
pub struct MemoryStore {
    permissions: RwLock<HashMap<String, PermissionItem>>,
    users: RwLock<HashSet<String>>,
    members: RwLock<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace the record for `user_id`.
    pub fn insert(&self, user_id: impl Into<String>, item: PermissionItem) -> AclResult<()> {
        let user_id = user_id.into();
        let mut table = self.permissions.write().map_err(|_| poisoned())?;
        tracing::debug!(user_id = %user_id, ?item, "permission stored");
        table.insert(user_id, item);
        Ok(())
    }

    /// Drop the record for `user_id`, returning the old one.
    pub fn remove(&self, user_id: &str) -> AclResult<Option<PermissionItem>> {
        let mut table = self.permissions.write().map_err(|_| poisoned())?;
        Ok(table.remove(user_id))
    }

    pub fn add_user(&self, id: impl Into<String>) -> AclResult<()> {
        self.users.write().map_err(|_| poisoned())?.insert(id.into());
        Ok(())
    }

    pub fn add_member(&self, id: impl Into<String>) -> AclResult<()> {
        self.members
            .write()
            .map_err(|_| poisoned())?
            .insert(id.into());
        Ok(())
    }

    pub fn len(&self) -> AclResult<usize> {
        Ok(self.permissions.read().map_err(|_| poisoned())?.len())
    }

    pub fn is_empty(&self) -> AclResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl PermissionStore for MemoryStore {
    fn try_get(&self, user_id: &str) -> AclResult<Option<PermissionItem>> {
        let table = self.permissions.read().map_err(|_| poisoned())?;
        Ok(table.get(user_id).copied())
    }
}

impl Directory for MemoryStore {
    fn is_user(&self, id: &str) -> bool {
        self.users.read().is_ok_and(|users| users.contains(id))
    }

    fn is_member(&self, id: &str) -> bool {
        self.members.read().is_ok_and(|members| members.contains(id))
    }
}

fn poisoned() -> AclError {
    AclError::Store("permission table lock poisoned".into())
}
