//! Parallel evaluation of many requests.

use crate::evaluator::AccessEvaluator;
use ledger_acl_core::{AccessRequest, AclError, AclResult, Decision};
use ledger_acl_store::PermissionStore;
use rayon::prelude::*;
use serde::Serialize;
use std::io::BufRead;

/// A request together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionRecord {
    pub request: AccessRequest,
    pub decision: Decision,
}

/// Evaluates every request on the rayon pool. Output order matches input.
pub fn evaluate_batch<S: PermissionStore>(
    evaluator: &AccessEvaluator<S>,
    requests: &[AccessRequest],
) -> Vec<DecisionRecord> {
    tracing::info!(requests = requests.len(), "parallel evaluation");

    let records: Vec<DecisionRecord> = requests
        .par_iter()
        .map(|request| DecisionRecord {
            request: request.clone(),
            decision: evaluator.evaluate(request),
        })
        .collect();

    tracing::info!(records = records.len(), "evaluation complete");
    records
}

/// Read NDJSON requests, one object per line. Blank lines are skipped.
pub fn read_requests<R: BufRead>(reader: R) -> AclResult<Vec<AccessRequest>> {
    let mut requests = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line
            .map_err(|e| AclError::InvalidInput(format!("Failed to read line {}: {e}", idx + 1)))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let request: AccessRequest = serde_json::from_str(line)
            .map_err(|e| AclError::InvalidInput(format!("Line {}: {e}", idx + 1)))?;
        requests.push(request);
    }
    Ok(requests)
}
