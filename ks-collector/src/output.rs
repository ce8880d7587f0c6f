use std::io::Write;

use ks_core::prelude::*;
use ks_snapshot::Snapshot;

// Writes each record as one line of JSON.  The stream is flushed at the end of every snapshot, so
// a consumer never sees half of a pass sitting in a buffer while the collector waits for the
// next tick.
pub struct RecordWriter<W: Write> {
    out: W,
    written: u64,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W) -> RecordWriter<W> {
        RecordWriter { out, written: 0 }
    }

    pub fn write_snapshot(&mut self, snapshot: &Snapshot) -> EmptyResult {
        for record in &snapshot.records {
            serde_json::to_writer(&mut self.out, record)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;

        self.written += snapshot.records.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
