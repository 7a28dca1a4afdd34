//! NDJSON (newline-delimited JSON) stream sink.
//!
//! Each row is serialized straight into the buffered writer, no
//! intermediate `String`.
//!
//! ```ignore
//! let mut sink = JsonStreamSink::new(std::io::stdout());
//! sink.write_outcome(&row)?;
//! sink.write_events(&registry.drain_events())?;
//! ```

use super::{OutcomeRow, SummaryRow};
use serde::Serialize;
use std::io::{self, BufWriter, Write};
use tessera_core::RegistryEvent;

/// Buffered NDJSON writer over any `Write`.
pub struct JsonStreamSink<W: Write> {
    writer: BufWriter<W>,
    rows_written: usize,
}

impl<W: Write> JsonStreamSink<W> {
    /// Create a sink wrapping any writer (file, Vec<u8>, etc.).
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(64 * 1024, writer),
            rows_written: 0,
        }
    }

    fn write_row<T: Serialize>(&mut self, row: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, row).map_err(io::Error::other)?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn write_outcome(&mut self, row: &OutcomeRow) -> io::Result<()> {
        self.write_row(row)
    }

    pub fn write_events(&mut self, events: &[RegistryEvent]) -> io::Result<()> {
        for event in events {
            self.write_row(event)?;
        }
        Ok(())
    }

    pub fn write_summary(&mut self, row: &SummaryRow) -> io::Result<()> {
        self.write_row(row)
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
}
