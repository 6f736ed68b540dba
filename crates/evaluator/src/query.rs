//! Parsing of raw request query strings such as `log_id=7&seq_no=150`.

use ledger_acl_core::{AccessRequest, AclError, AclResult};
use std::borrow::Cow;

const LOG_ID: &str = "log_id";
const SEQ_NO: &str = "seq_no";

/// Target of a read request, as carried in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessQuery {
    pub log_id: i64,
    pub seq_no: Option<i64>,
}

impl AccessQuery {
    /// Parse a URL-encoded query string.
    ///
    /// A repeated key keeps its last value and unknown keys are ignored. A
    /// value is cut at any further `=`, so `log_id=7=8` reads as 7. An empty
    /// `seq_no` counts as absent.
    pub fn parse(query: &str) -> AclResult<Self> {
        let pairs = form_urlencoded::parse(query.trim_start_matches('?').as_bytes());
        let (log_id, seq_no) =
            pairs.fold((None, None), |(log_id, seq_no), (key, value)| match key.as_ref() {
                LOG_ID => (Some(value), seq_no),
                SEQ_NO => (log_id, Some(value)),
                _ => (log_id, seq_no),
            });

        let log_id = match log_id {
            Some(raw) => parse_int(LOG_ID, &raw)?,
            None => return Err(AclError::InvalidQuery(format!("missing `{LOG_ID}`"))),
        };
        let seq_no = match seq_no {
            Some(raw) if !first_segment(&raw).is_empty() => Some(parse_int(SEQ_NO, &raw)?),
            _ => None,
        };

        Ok(Self { log_id, seq_no })
    }

    pub fn into_request(self, user_id: impl Into<String>) -> AccessRequest {
        AccessRequest::new(user_id, self.log_id, self.seq_no)
    }
}

impl std::str::FromStr for AccessQuery {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn first_segment<'a>(value: &'a Cow<'_, str>) -> &'a str {
    value.split('=').next().unwrap_or_default()
}

fn parse_int(key: &str, raw: &Cow<'_, str>) -> AclResult<i64> {
    let value = first_segment(raw);
    value.parse().map_err(|e| {
        let msg = format!("`{key}` must be an integer, got {value:?}: {e}");
        AclError::InvalidQuery(msg)
    })
}
