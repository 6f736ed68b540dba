//! Access decisions for ledger reads.
//!
//! A request passes when the user's stored grant admits both its sequence
//! number and its log id. The two checks are independent; the sequence
//! number check runs first, so its reason wins when both fail.

use ledger_acl_core::{
    AccessRequest, Decision, DenyReason, LogIdAccess, PermissionItem, SeqNoAccess,
};
use ledger_acl_store::PermissionStore;

/// Evaluates read requests against a [`PermissionStore`].
///
/// Holds no state besides the store; every call performs a fresh lookup.
#[derive(Debug, Clone)]
pub struct AccessEvaluator<S> {
    store: S,
}

impl<S: PermissionStore> AccessEvaluator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// May `user_id` read `log_id` at `seq_no`? `None` means the latest
    /// version.
    pub fn check_access(&self, user_id: &str, log_id: i64, seq_no: Option<i64>) -> bool {
        self.decide(user_id, log_id, seq_no).is_allowed()
    }

    /// Same outcome as [`check_access`](Self::check_access), with the reason
    /// for a denial.
    pub fn evaluate(&self, request: &AccessRequest) -> Decision {
        self.decide(&request.user_id, request.log_id, request.seq_no)
    }

    fn decide(&self, user_id: &str, log_id: i64, seq_no: Option<i64>) -> Decision {
        let permission = match self.store.try_get(user_id) {
            Ok(Some(permission)) => permission,
            Ok(None) => return Decision::Denied(DenyReason::NoPermissionRecord),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "permission lookup failed; denying");
                return Decision::Denied(DenyReason::StoreUnavailable);
            }
        };

        let decision = apply_grant(&permission, log_id, seq_no);
        tracing::debug!(
            user_id,
            log_id,
            ?seq_no,
            allowed = decision.is_allowed(),
            reason = ?decision.reason(),
            "evaluated"
        );
        decision
    }
}

/// Decide a request against an already-loaded grant.
pub fn apply_grant(permission: &PermissionItem, log_id: i64, seq_no: Option<i64>) -> Decision {
    match check_seq_no(&permission.seq_no, seq_no)
        .and_then(|()| check_log_id(&permission.log_id, log_id))
    {
        Ok(()) => Decision::Allowed,
        Err(reason) => Decision::Denied(reason),
    }
}

/// Sequence-number half of the decision.
pub fn check_seq_no(access: &SeqNoAccess, seq_no: Option<i64>) -> Result<(), DenyReason> {
    match (access, seq_no) {
        (SeqNoAccess::Any, _) => Ok(()),
        (SeqNoAccess::OnlyLatest, None) => Ok(()),
        // Any explicit seq_no is historical here, even one that happens to
        // equal the current latest.
        (SeqNoAccess::OnlyLatest, Some(_)) => Err(DenyReason::HistoricalQueryNotAllowed),
        // A range grant never covers the latest version. Latest reads need
        // ANY or ONLY_LATEST.
        (SeqNoAccess::SpecifiedRange { .. }, None) => Err(DenyReason::SeqNoRequired),
        // No bounds at all grants nothing.
        (SeqNoAccess::SpecifiedRange { range }, Some(_)) if range.has_no_bounds() => {
            Err(DenyReason::EmptySeqNoRange)
        }
        (SeqNoAccess::SpecifiedRange { range }, Some(n)) if !range.admits(n) => {
            Err(DenyReason::SeqNoOutOfRange)
        }
        (SeqNoAccess::SpecifiedRange { .. }, Some(_)) => Ok(()),
    }
}

/// Log-id half of the decision.
pub fn check_log_id(access: &LogIdAccess, log_id: i64) -> Result<(), DenyReason> {
    match access {
        LogIdAccess::Any => Ok(()),
        // Same rule as for sequence numbers: no bounds grants nothing.
        LogIdAccess::SpecifiedRange { range } if range.has_no_bounds() => {
            Err(DenyReason::EmptyLogIdRange)
        }
        LogIdAccess::SpecifiedRange { range } if !range.admits(log_id) => {
            Err(DenyReason::LogIdOutOfRange)
        }
        LogIdAccess::SpecifiedRange { .. } => Ok(()),
    }
}
