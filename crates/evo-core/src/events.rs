//! Event Log Persistence
//!
//! Append-only JSONL writer for the engine's event log. The engine
//! itself only accumulates events in memory; anything that wants them
//! on disk goes through this.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use evo_events::Event;

/// Writes events to a JSONL file, one event per line.
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    written: u64,
}

impl EventLogger {
    /// Create a new logger writing to the specified path.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            written: 0,
        })
    }

    /// Create a logger that discards events (for testing).
    pub fn null() -> Self {
        Self {
            writer: None,
            written: 0,
        }
    }

    /// Number of events written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Write one event as a JSON line.
    pub fn log(&mut self, event: &Event) -> std::io::Result<()> {
        self.written += 1;
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(event)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Write a batch of events.
    pub fn log_batch(&mut self, events: &[Event]) -> std::io::Result<()> {
        for event in events {
            self.log(event)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("Warning: failed to flush event log: {}", e);
        }
    }
}
