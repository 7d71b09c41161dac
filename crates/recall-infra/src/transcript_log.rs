//! Plain-text session transcript.
//!
//! Every line shown on the terminal is mirrored into
//! `<data_dir>/logs/<YYYY-MM-DD-HH-MM-SS>.txt`. Streamed fragments are
//! written as they arrive so an interrupted session still leaves a
//! readable log.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Subdirectory of the data directory holding session logs.
pub const LOG_DIR_NAME: &str = "logs";

/// Append-only writer for one session's log file.
pub struct TranscriptLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl TranscriptLog {
    /// Create a new log file named after the current local time.
    pub fn open(data_dir: &Path) -> io::Result<Self> {
        Self::open_at(data_dir, Local::now())
    }

    fn open_at(data_dir: &Path, started: DateTime<Local>) -> io::Result<Self> {
        let dir = data_dir.join(LOG_DIR_NAME);
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(log_file_name(started));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::debug!(path = %path.display(), "session log opened");

        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one complete line.
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    /// Write a streamed fragment without a trailing newline.
    pub fn write_fragment(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for TranscriptLog {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

fn log_file_name(started: DateTime<Local>) -> String {
    format!("{}.txt", started.format("%Y-%m-%d-%H-%M-%S"))
}
