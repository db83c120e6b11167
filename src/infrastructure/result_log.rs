//! JSON-lines result log.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::warn;

use crate::domain::models::assertion_result::AssertionResult;
use crate::domain::ports::ResultSink;

/// Appends one JSON object per assertion result.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
    errors: usize,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Sink writing to a new file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create result log {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Sink over any writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            errors: 0,
        }
    }

    /// Records written so far.
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the writer. Fails if any record was lost.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().context("Failed to flush result log")?;
        if self.errors > 0 {
            anyhow::bail!("{} result(s) could not be written", self.errors);
        }
        Ok(self.writer)
    }
}

impl<W: Write> ResultSink for JsonLinesSink<W> {
    fn record(&mut self, result: &AssertionResult) {
        let line = serde_json::to_string(result).map_err(anyhow::Error::from);
        match line.and_then(|l| writeln!(self.writer, "{l}").map_err(anyhow::Error::from)) {
            Ok(()) => self.written += 1,
            Err(error) => {
                self.errors += 1;
                warn!(assertion = %result.name, %error, "failed to write result");
            }
        }
    }
}
