/*!
 * Log Levels and Messages
 */

/// Severity of a log message.
///
/// `Term` is a sentinel: it is only ever pushed by
/// [`Logger::wait_finished`](super::Logger::wait_finished) to stop a sink's
/// consumer thread and is never written to any destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Fail,
    Warn,
    Conf,
    Info,
    Term,
}

impl Level {
    /// Fixed-width label printed inside the preamble brackets.
    pub fn label(self) -> &'static str {
        match self {
            Level::Fail => " ERROR ",
            Level::Warn => "WARNING",
            Level::Conf => "SUCCESS",
            Level::Info => "MESSAGE",
            Level::Term => "",
        }
    }

    /// ANSI escape that colors the label on a terminal sink.
    pub(crate) fn color(self) -> &'static str {
        match self {
            Level::Fail => "\x1b[1;31m",
            Level::Warn => "\x1b[33m",
            Level::Conf => "\x1b[32m",
            Level::Info => "\x1b[36m",
            Level::Term => "",
        }
    }
}

/// Immutable (severity, formatted text) pair flowing through sink
/// mailboxes. The text already carries the timestamp and thread tag; each
/// sink only adds its own preamble and appendix.
#[derive(Clone, Debug)]
pub struct LogMessage {
    pub level: Level,
    pub text: String,
}

impl LogMessage {
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}
