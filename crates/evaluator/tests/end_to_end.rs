//! Snapshot store + evaluator + batch + sink, wired together as the CLI does.

use ledger_acl_core::{AccessRequest, Decision, DenyReason};
use ledger_acl_evaluator::sink::json_stream::JsonStreamSink;
use ledger_acl_evaluator::{evaluate_batch, read_requests, AccessEvaluator, AccessQuery, Summary};
use ledger_acl_store::{Directory, SnapshotStore};
use std::io::Write;
use std::time::Duration;

const SNAPSHOT: &str = r#"{
    "users": ["alice", "bob", "dave", "erin"],
    "members": ["carol"],
    "log_access_permissions": {
        "alice": {
            "logId": { "type": "ANY" },
            "seqNo": { "type": "SPECIFIED_RANGE", "range": { "start": 100, "last": 200 } }
        },
        "dave": {
            "logId": { "type": "SPECIFIED_RANGE", "range": { "start": 10 } },
            "seqNo": { "type": "ONLY_LATEST" }
        },
        "erin": {
            "logId": { "type": "SPECIFIED_RANGE", "range": {} },
            "seqNo": { "type": "ANY" }
        },
        "frank": {
            "logId": { "type": "ANY" },
            "seqNo": { "type": "SPECIFIED_RANGE" }
        }
    }
}"#;

fn snapshot_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SNAPSHOT.as_bytes()).unwrap();
    file
}

#[test]
fn alice_and_bob() {
    let file = snapshot_file();
    let eval = AccessEvaluator::new(SnapshotStore::open(file.path()).unwrap());

    assert!(eval.check_access("alice", 7, Some(150)));
    assert!(!eval.check_access("alice", 7, Some(50)));
    assert!(!eval.check_access("alice", 7, None));
    assert!(!eval.check_access("bob", 7, Some(150)));
}

#[test]
fn query_string_to_decision() {
    let file = snapshot_file();
    let store = SnapshotStore::open(file.path()).unwrap();
    assert!(store.is_user("dave"));

    let eval = AccessEvaluator::new(store);
    let latest = AccessQuery::parse("log_id=12").unwrap().into_request("dave");
    let historical = AccessQuery::parse("log_id=12&seq_no=3")
        .unwrap()
        .into_request("dave");
    let low_log = AccessQuery::parse("log_id=9").unwrap().into_request("dave");

    assert_eq!(eval.evaluate(&latest), Decision::Allowed);
    assert_eq!(
        eval.evaluate(&historical),
        Decision::Denied(DenyReason::HistoricalQueryNotAllowed)
    );
    assert_eq!(
        eval.evaluate(&low_log),
        Decision::Denied(DenyReason::LogIdOutOfRange)
    );
}

#[test]
fn empty_range_and_malformed_record_deny() {
    let file = snapshot_file();
    let eval = AccessEvaluator::new(SnapshotStore::open(file.path()).unwrap());

    assert_eq!(
        eval.evaluate(&AccessRequest::new("erin", 0, None)),
        Decision::Denied(DenyReason::EmptyLogIdRange)
    );
    assert_eq!(
        eval.evaluate(&AccessRequest::new("frank", 0, Some(1))),
        Decision::Denied(DenyReason::StoreUnavailable)
    );
}

#[test]
fn batch_to_ndjson() {
    let file = snapshot_file();
    let eval = AccessEvaluator::new(SnapshotStore::open(file.path()).unwrap());

    let input = concat!(
        "{\"user_id\":\"alice\",\"log_id\":7,\"seq_no\":150}\n",
        "{\"user_id\":\"alice\",\"log_id\":7}\n",
        "{\"user_id\":\"bob\",\"log_id\":7,\"seq_no\":150}\n",
        "{\"user_id\":\"dave\",\"log_id\":10}\n",
    );
    let requests = read_requests(input.as_bytes()).unwrap();
    let records = evaluate_batch(&eval, &requests);
    let outcomes: Vec<bool> = records.iter().map(|r| r.decision.is_allowed()).collect();
    assert_eq!(outcomes, vec![true, false, false, true]);

    let summary = Summary::build(&records, Duration::from_millis(1));
    assert_eq!(summary.allowed, 2);
    assert_eq!(summary.distinct_users, 3);

    let (head, rows) = summary.to_rows(&records);
    let mut buf = Vec::new();
    let mut sink = JsonStreamSink::new(&mut buf);
    sink.write_summary(&head).unwrap();
    sink.write_decisions(&rows).unwrap();
    assert_eq!(sink.finish().unwrap(), 5);

    let output = String::from_utf8(buf).unwrap();
    let lines: Vec<serde_json::Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines[0]["total"], 4);
    assert_eq!(lines[2]["reason"], "seq_no_required");
    assert_eq!(lines[3]["reason"], "no_permission_record");
}
