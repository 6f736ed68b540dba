//! Data sink for evaluated decisions.
//!
//! Two row schemas:
//! - [`DecisionRow`] -- one per evaluated request
//! - [`SummaryRow`] -- one per batch
//!
//! One backend: **NDJSON stream**, newline-delimited JSON rows to any
//! `Write` impl.

pub mod json_stream;

use crate::batch::DecisionRecord;
use crate::reporter::Summary;
use ledger_acl_core::{AclError, AclResult};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Where sink rows go: `ndjson` for stdout, `ndjson:/path` for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    Stdout,
    File(PathBuf),
}

impl SinkTarget {
    pub fn parse(spec: &str) -> AclResult<Self> {
        if spec == "ndjson" {
            return Ok(Self::Stdout);
        }
        match spec.strip_prefix("ndjson:") {
            Some(path) if !path.is_empty() => Ok(Self::File(PathBuf::from(path))),
            _ => Err(AclError::InvalidInput(format!(
                "Unknown sink: {spec}. Use 'ndjson' or 'ndjson:/path'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Serializable row types
// ---------------------------------------------------------------------------

/// One row per evaluated request, fully denormalized.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRow {
    pub user_id: String,
    pub log_id: i64,
    pub seq_no: Option<i64>,
    pub allowed: bool,
    /// `None` when allowed.
    pub reason: Option<&'static str>,
    pub evaluated_at_ms: u64,
}

/// One row per batch.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub total: u64,
    pub allowed: u64,
    pub denied: u64,
    pub distinct_users: u64,
    pub historical_requests: u64,
    pub elapsed_ms: u64,
    pub evaluated_at_ms: u64,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

impl DecisionRow {
    pub fn from_record(record: &DecisionRecord, evaluated_at_ms: u64) -> Self {
        Self {
            user_id: record.request.user_id.clone(),
            log_id: record.request.log_id,
            seq_no: record.request.seq_no,
            allowed: record.decision.is_allowed(),
            reason: record.decision.reason().map(|r| r.as_str()),
            evaluated_at_ms,
        }
    }
}

impl Summary {
    /// Flatten the summary and its records into sink-ready rows.
    pub fn to_rows(&self, records: &[DecisionRecord]) -> (SummaryRow, Vec<DecisionRow>) {
        let now = unix_millis();

        let summary = SummaryRow {
            total: self.total as u64,
            allowed: self.allowed as u64,
            denied: self.denied as u64,
            distinct_users: self.distinct_users as u64,
            historical_requests: self.historical_requests as u64,
            elapsed_ms: self.elapsed.as_millis() as u64,
            evaluated_at_ms: now,
        };

        let rows = records
            .iter()
            .map(|r| DecisionRow::from_record(r, now))
            .collect();

        (summary, rows)
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}
