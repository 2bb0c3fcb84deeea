//! NDJSON (newline-delimited JSON) output.
//!
//! Each row is serialized straight into a `BufWriter` via
//! `serde_json::to_writer`.

use serde::Serialize;
use std::io::{self, BufWriter, Write};

pub struct NdjsonSink<W: Write> {
    writer: BufWriter<W>,
    rows_written: usize,
}

impl NdjsonSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> NdjsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(16 * 1024, writer),
            rows_written: 0,
        }
    }

    pub fn write_row<R: Serialize>(&mut self, row: &R) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, row).map_err(io::Error::other)?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn write_rows<R: Serialize>(&mut self, rows: &[R]) -> io::Result<()> {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{EventKind, Journal, Trace};

    #[test]
    fn one_line_per_event() {
        let journal = Journal::new();
        drop(Trace::new(&journal));

        let mut buf = Vec::new();
        let mut sink = NdjsonSink::new(&mut buf);
        sink.write_rows(&journal.events()).unwrap();
        assert_eq!(sink.finish().unwrap(), 2);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["kind"], EventKind::Constructed.as_str());
        assert_eq!(first["seq"], 0);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["kind"], "dropped");
    }
}
