//! Domain types for the ledger access evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the key-value table holding one [`PermissionItem`] per user.
pub const PERMISSION_TABLE: &str = "log_access_permissions";

// ---------------------------------------------------------------------------
// Grants
// ---------------------------------------------------------------------------

/// Inclusive `[start, last]` bound pair. Either side may be open.
///
/// A range with *neither* bound grants nothing; it is not "unbounded".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<i64>,
}

impl Range {
    pub const fn new(start: Option<i64>, last: Option<i64>) -> Self {
        Self { start, last }
    }

    /// `[start, last]`, both bounds set.
    pub const fn between(start: i64, last: i64) -> Self {
        Self::new(Some(start), Some(last))
    }

    /// `[start, +inf)`.
    pub const fn starting_at(start: i64) -> Self {
        Self::new(Some(start), None)
    }

    /// `(-inf, last]`.
    pub const fn up_to(last: i64) -> Self {
        Self::new(None, Some(last))
    }

    /// True when neither bound is set.
    #[inline]
    pub fn has_no_bounds(&self) -> bool {
        self.start.is_none() && self.last.is_none()
    }

    /// Whether `value` falls inside the range. Always false for a range
    /// with no bounds.
    #[inline]
    pub fn admits(&self, value: i64) -> bool {
        if self.has_no_bounds() {
            return false;
        }
        if self.start.is_some_and(|start| value < start) {
            return false;
        }
        !self.last.is_some_and(|last| value > last)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.last) {
            (Some(s), Some(l)) => write!(f, "[{s}, {l}]"),
            (Some(s), None) => write!(f, "[{s}, ..)"),
            (None, Some(l)) => write!(f, "(.., {l}]"),
            (None, None) => f.write_str("(empty)"),
        }
    }
}

/// Which log items a user may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogIdAccess {
    Any,
    SpecifiedRange { range: Range },
}

impl fmt::Display for LogIdAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::SpecifiedRange { range } => write!(f, "range {range}"),
        }
    }
}

/// Which sequence numbers (versions) of a log item a user may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeqNoAccess {
    /// Latest and every historical sequence number.
    Any,
    /// Latest only: any explicit sequence number counts as historical.
    OnlyLatest,
    /// Explicit sequence numbers inside the range. Never covers "latest".
    SpecifiedRange { range: Range },
}

impl fmt::Display for SeqNoAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::OnlyLatest => f.write_str("latest only"),
            Self::SpecifiedRange { range } => write!(f, "range {range}"),
        }
    }
}

/// Stored grant for one user, keyed by user id in [`PERMISSION_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionItem {
    pub log_id: LogIdAccess,
    pub seq_no: SeqNoAccess,
}

impl PermissionItem {
    pub const fn new(log_id: LogIdAccess, seq_no: SeqNoAccess) -> Self {
        Self { log_id, seq_no }
    }

    /// Every log item at every sequence number.
    pub const fn unrestricted() -> Self {
        Self::new(LogIdAccess::Any, SeqNoAccess::Any)
    }
}

// ---------------------------------------------------------------------------
// Requests and decisions
// ---------------------------------------------------------------------------

/// One read request: `seq_no == None` asks for the latest version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessRequest {
    pub user_id: String,
    pub log_id: i64,
    #[serde(default)]
    pub seq_no: Option<i64>,
}

impl AccessRequest {
    pub fn new(user_id: impl Into<String>, log_id: i64, seq_no: Option<i64>) -> Self {
        Self {
            user_id: user_id.into(),
            log_id,
            seq_no,
        }
    }

    /// True when the request names a specific historical version.
    pub fn is_historical(&self) -> bool {
        self.seq_no.is_some()
    }
}

/// Why a request was denied. Diagnostic only; every variant means `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    NoPermissionRecord,
    HistoricalQueryNotAllowed,
    SeqNoRequired,
    EmptySeqNoRange,
    SeqNoOutOfRange,
    EmptyLogIdRange,
    LogIdOutOfRange,
    StoreUnavailable,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoPermissionRecord => "no_permission_record",
            Self::HistoricalQueryNotAllowed => "historical_query_not_allowed",
            Self::SeqNoRequired => "seq_no_required",
            Self::EmptySeqNoRange => "empty_seq_no_range",
            Self::SeqNoOutOfRange => "seq_no_out_of_range",
            Self::EmptyLogIdRange => "empty_log_id_range",
            Self::LogIdOutOfRange => "log_id_out_of_range",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one [`AccessRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allowed,
    Denied(DenyReason),
}

impl Decision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    #[must_use]
    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            Self::Allowed => None,
            Self::Denied(reason) => Some(*reason),
        }
    }
}

impl From<Decision> for bool {
    fn from(decision: Decision) -> bool {
        decision.is_allowed()
    }
}
