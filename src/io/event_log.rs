use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use log::warn;

use crate::kernel::{Event, EventSink};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Log file for the run with the given quantum, e.g. `log03.txt`.
pub fn log_path(log_dir: &Path, quantum: usize) -> PathBuf {
    log_dir.join(format!("log{:02}.txt", quantum))
}

/// Writes each scheduler event as a timestamped line.
pub struct EventLog<W: Write> {
    writer: W,
}

impl EventLog<File> {
    /// Opens the quantum's log file for appending, creating it if needed.
    pub fn open(log_dir: &Path, quantum: usize) -> io::Result<EventLog<File>> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path(log_dir, quantum))?;

        Ok(EventLog::new(file))
    }
}

impl<W: Write> EventLog<W> {
    pub fn new(writer: W) -> EventLog<W> {
        EventLog { writer }
    }

    fn write_line(&mut self, event: &Event) -> io::Result<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        writeln!(self.writer, "[{}] {}", timestamp, event)?;
        self.writer.flush()
    }
}

impl<W: Write> EventSink for EventLog<W> {
    fn record(&mut self, event: Event) {
        if let Err(err) = self.write_line(&event) {
            warn!("Failed to write event \"{}\": {}", event, err);
        }
    }
}
