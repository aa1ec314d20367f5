/*!
 * Log Sinks
 *
 * Destinations for the logging pipeline. Each sink formats a preamble per
 * level and an appendix, and writes one line per message. The trait is
 * public so embedders and tests can register capture sinks.
 */

use super::message::Level;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub(crate) const RESET: &str = "\x1b[0m";

/// A logging destination paired with one consumer thread and one mailbox.
pub trait Sink: Send {
    /// String prepended to the formatted message, typically the bracketed
    /// level label.
    fn preamble(&self, level: Level) -> String {
        format!("[{}]", level.label())
    }

    /// String appended after the message text.
    fn appendix(&self) -> String {
        "\n".to_string()
    }

    /// Writes one fully assembled line and flushes it. An error here is
    /// fatal for this sink only; the pipeline stops its consumer thread and
    /// leaves other sinks untouched.
    fn write(&mut self, line: &str) -> io::Result<()>;
}

/// Colorized sink writing to the terminal.
pub struct TermSink {
    stream: io::Stdout,
}

impl TermSink {
    pub fn new() -> Self {
        Self {
            stream: io::stdout(),
        }
    }
}

impl Default for TermSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for TermSink {
    fn preamble(&self, level: Level) -> String {
        format!("[{}{}{}]", level.color(), level.label(), RESET)
    }

    fn write(&mut self, line: &str) -> io::Result<()> {
        let mut handle = self.stream.lock();
        handle.write_all(line.as_bytes())?;
        handle.flush()
    }
}

/// Plain-text sink appending to a file, created on construction.
pub struct FileSink {
    file: File,
}

impl FileSink {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            file: File::create(path)?,
        })
    }
}

impl Sink for FileSink {
    fn write(&mut self, line: &str) -> io::Result<()> {
        self.file.write_all(line.as_bytes())?;
        self.file.flush()
    }
}
