//! NDJSON (newline-delimited JSON) stream sink.
//!
//! Each row is serialized straight into the buffered writer.
//!
//! ```ignore
//! let mut sink = JsonStreamSink::stdout();
//! sink.write_summary(&summary)?;
//! sink.write_decisions(&rows)?;
//! ```

use super::{DecisionRow, SummaryRow};
use serde::Serialize;
use std::io::{self, BufWriter, Write};

/// Buffered NDJSON writer.
pub struct JsonStreamSink<W: Write> {
    writer: BufWriter<W>,
    rows_written: usize,
}

impl JsonStreamSink<io::Stdout> {
    /// Write NDJSON to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonStreamSink<W> {
    /// Create a sink wrapping any writer (file, Vec<u8>, etc.).
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(64 * 1024, writer),
            rows_written: 0,
        }
    }

    /// Write one batch summary row.
    pub fn write_summary(&mut self, row: &SummaryRow) -> io::Result<()> {
        self.write_row(row)
    }

    /// Write all decision rows.
    pub fn write_decisions(&mut self, rows: &[DecisionRow]) -> io::Result<()> {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Flush and return how many rows were written.
    pub fn finish(mut self) -> io::Result<usize> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }

    /// Number of rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn write_row<T: Serialize>(&mut self, row: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, row).map_err(io::Error::other)?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_per_row() {
        let mut buf = Vec::new();
        let mut sink = JsonStreamSink::new(&mut buf);

        let summary = SummaryRow {
            total: 2,
            allowed: 1,
            denied: 1,
            distinct_users: 2,
            historical_requests: 1,
            elapsed_ms: 4,
            evaluated_at_ms: 1_790_000_000_000,
        };
        let decisions = vec![
            DecisionRow {
                user_id: "alice".into(),
                log_id: 7,
                seq_no: Some(150),
                allowed: true,
                reason: None,
                evaluated_at_ms: 1_790_000_000_000,
            },
            DecisionRow {
                user_id: "bob".into(),
                log_id: 7,
                seq_no: None,
                allowed: false,
                reason: Some("no_permission_record"),
                evaluated_at_ms: 1_790_000_000_000,
            },
        ];

        sink.write_summary(&summary).unwrap();
        sink.write_decisions(&decisions).unwrap();
        assert_eq!(sink.rows_written(), 3);
        let n = sink.finish().unwrap();
        assert_eq!(n, 3);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 3);

        let last: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last["user_id"], "bob");
        assert_eq!(last["allowed"], false);
        assert_eq!(last["reason"], "no_permission_record");
        assert!(last["seq_no"].is_null());
    }
}
