//! Batch report generator.
//!
//! Summarises a set of [`DecisionRecord`]s into totals and per-reason
//! denial counts, and renders them as a human-readable table.

use crate::batch::DecisionRecord;
use ledger_acl_core::DenyReason;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;
use std::time::Duration;

/// Aggregate view of one batch.
#[derive(Debug)]
pub struct Summary {
    pub total: usize,
    pub allowed: usize,
    pub denied: usize,
    pub distinct_users: usize,
    pub historical_requests: usize,
    pub by_reason: BTreeMap<DenyReason, usize>,
    pub elapsed: Duration,
}

impl Summary {
    pub fn build(records: &[DecisionRecord], elapsed: Duration) -> Self {
        let mut by_reason = BTreeMap::new();
        let mut users = HashSet::new();
        let mut allowed = 0;
        let mut historical_requests = 0;

        for record in records {
            users.insert(record.request.user_id.as_str());
            if record.request.is_historical() {
                historical_requests += 1;
            }
            match record.decision.reason() {
                None => allowed += 1,
                Some(reason) => *by_reason.entry(reason).or_insert(0) += 1,
            }
        }

        Self {
            total: records.len(),
            allowed,
            denied: records.len() - allowed,
            distinct_users: users.len(),
            historical_requests,
            by_reason,
            elapsed,
        }
    }

    /// Share of requests allowed, 0.0 for an empty batch.
    pub fn allow_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.allowed as f64 / self.total as f64
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Access evaluation report");
        let _ = writeln!(out, "========================");
        let _ = writeln!(out, "requests:        {}", self.total);
        let _ = writeln!(out, "distinct users:  {}", self.distinct_users);
        let _ = writeln!(out, "historical:      {}", self.historical_requests);
        let _ = writeln!(
            out,
            "allowed:         {} ({:.1}%)",
            self.allowed,
            self.allow_ratio() * 100.0
        );
        let _ = writeln!(out, "denied:          {}", self.denied);

        if !self.by_reason.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{:<32} {:>8}", "deny reason", "count");
            for (reason, count) in &self.by_reason {
                let _ = writeln!(out, "{:<32} {:>8}", reason.as_str(), count);
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "elapsed: {} ms", self.elapsed.as_millis());
        out
    }
}
