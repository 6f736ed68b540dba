//! Read-only store loaded from a JSON snapshot of the ledger tables.
//!
//! ```json
//! {
//!   "users": ["alice", "bob"],
//!   "members": ["carol"],
//!   "log_access_permissions": {
//!     "alice": { "logId": { "type": "ANY" }, "seqNo": { "type": "ONLY_LATEST" } }
//!   }
//! }
//! ```
//!
//! Records stay as raw JSON until looked up, so a malformed record only
//! affects the user it belongs to.

use crate::{Directory, PermissionStore};
use ledger_acl_core::{AclError, AclResult, PermissionItem, PERMISSION_TABLE};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    users: HashSet<String>,
    #[serde(default)]
    members: HashSet<String>,
    #[serde(default, rename = "log_access_permissions")]
    permissions: HashMap<String, serde_json::Value>,
}

/// Immutable snapshot of the permission table and caller directory.
#[derive(Debug)]
pub struct SnapshotStore {
    inner: SnapshotFile,
}

impl SnapshotStore {
    /// Load a snapshot file from disk.
    pub fn open(path: impl AsRef<Path>) -> AclResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AclError::Store(format!("Failed to read {}: {e}", path.display())))?;
        let store = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            records = store.len(),
            users = store.inner.users.len(),
            members = store.inner.members.len(),
            "snapshot loaded"
        );
        Ok(store)
    }

    pub fn from_json_str(raw: &str) -> AclResult<Self> {
        let inner: SnapshotFile = serde_json::from_str(raw)
            .map_err(|e| AclError::Store(format!("Invalid snapshot: {e}")))?;
        Ok(Self { inner })
    }

    /// Number of permission records, including any that fail to decode.
    pub fn len(&self) -> usize {
        self.inner.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.permissions.is_empty()
    }
}

impl PermissionStore for SnapshotStore {
    fn try_get(&self, user_id: &str) -> AclResult<Option<PermissionItem>> {
        let Some(raw) = self.inner.permissions.get(user_id) else {
            return Ok(None);
        };
        PermissionItem::deserialize(raw).map(Some).map_err(|e| {
            AclError::Store(format!(
                "Malformed {PERMISSION_TABLE} record for {user_id}: {e}"
            ))
        })
    }
}

impl Directory for SnapshotStore {
    fn is_user(&self, id: &str) -> bool {
        self.inner.users.contains(id)
    }

    fn is_member(&self, id: &str) -> bool {
        self.inner.members.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_acl_core::{LogIdAccess, Range, SeqNoAccess};
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "users": ["alice", "bob", "mallory"],
        "members": ["carol"],
        "log_access_permissions": {
            "alice": {
                "logId": { "type": "ANY" },
                "seqNo": { "type": "SPECIFIED_RANGE", "range": { "start": 100, "last": 200 } }
            },
            "mallory": {
                "logId": { "type": "SPECIFIED_RANGE" },
                "seqNo": { "type": "ANY" }
            }
        }
    }"#;

    #[test]
    fn lookup_decodes_record() {
        let store = SnapshotStore::from_json_str(SNAPSHOT).unwrap();
        let item = store.try_get("alice").unwrap().unwrap();
        assert_eq!(item.log_id, LogIdAccess::Any);
        assert_eq!(
            item.seq_no,
            SeqNoAccess::SpecifiedRange {
                range: Range::between(100, 200)
            }
        );
    }

    #[test]
    fn user_without_record_is_none() {
        let store = SnapshotStore::from_json_str(SNAPSHOT).unwrap();
        assert!(store.try_get("bob").unwrap().is_none());
    }

    #[test]
    fn malformed_record_is_isolated() {
        let store = SnapshotStore::from_json_str(SNAPSHOT).unwrap();
        let err = store.try_get("mallory").unwrap_err();
        assert!(matches!(err, AclError::Store(_)));
        assert!(store.try_get("alice").unwrap().is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn directory_from_snapshot() {
        let store = SnapshotStore::from_json_str(SNAPSHOT).unwrap();
        assert!(store.is_user("bob"));
        assert!(!store.is_user("carol"));
        assert!(store.is_member("carol"));
    }

    #[test]
    fn empty_object_is_an_empty_snapshot() {
        let store = SnapshotStore::from_json_str("{}").unwrap();
        assert!(store.is_empty());
        assert!(!store.is_user("alice"));
    }

    #[test]
    fn invalid_json_is_a_store_error() {
        let err = SnapshotStore::from_json_str("not json").unwrap_err();
        assert!(matches!(err, AclError::Store(_)));
    }

    #[test]
    fn open_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let store = SnapshotStore::open(file.path()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SnapshotStore::open(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AclError::Store(_)));
    }
}
