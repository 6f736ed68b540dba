//! Permission records, access requests, decisions, and error definitions.
//!
//! Foundation crate -- no I/O dependencies.

pub mod error;
pub mod types;

pub use error::{AclError, AclResult};
pub use types::{
    AccessRequest, Decision, DenyReason, LogIdAccess, PermissionItem, Range, SeqNoAccess,
    PERMISSION_TABLE,
};
