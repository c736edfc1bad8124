/*
 * Export Module
 *
 * This module defines the per-tick record consumed by external
 * collaborators (CSV exporter, downstream analytics) and the sink
 * abstraction the simulation writes into. Records arrive one batch per
 * tick, in agent-index order, and the sink is told when the stream ends.
 */

use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// One agent's state after a completed tick. Field order matches the
/// exported CSV header: time,id,x,y,vx,vy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgentRecord {
    pub time: u64,
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

/// Errors raised while handing records to an external sink.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write record batch: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush output: {0}")]
    Io(#[from] std::io::Error),
}

/// Consumer of the simulation's per-tick record stream.
pub trait RecordSink {
    /// Accept one tick's worth of records (one per agent, index order).
    fn write_tick(&mut self, records: &[AgentRecord]) -> Result<(), ExportError>;

    /// Called once after the final tick of a batch run.
    fn finish(&mut self) -> Result<(), ExportError> {
        Ok(())
    }
}

// CSV exporter over any writer; the header row comes from the record's
// field names on the first serialize call.
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvExporter<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl<W: Write> CsvExporter<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    /// Flush and hand back the underlying writer.
    pub fn into_writer(self) -> Result<W, ExportError> {
        Ok(self.writer.into_inner().map_err(|e| e.into_error())?)
    }
}

impl<W: Write> RecordSink for CsvExporter<W> {
    fn write_tick(&mut self, records: &[AgentRecord]) -> Result<(), ExportError> {
        for record in records {
            self.writer.serialize(record)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory sink for consumers that post-process records without going
/// through a file, and for tests. Part of the public surface because the
/// integration tests drive it through the crate's external API.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<AgentRecord>,
}

impl RecordSink for MemorySink {
    fn write_tick(&mut self, records: &[AgentRecord]) -> Result<(), ExportError> {
        self.records.extend_from_slice(records);
        Ok(())
    }
}
