/*!
 * Logging Pipeline
 *
 * Multi-sink, multi-threaded logging: producers on any thread push
 * formatted messages into per-sink mailboxes; one dedicated consumer
 * thread per sink performs the destination I/O. An early buffer captures
 * messages emitted before any sink exists.
 */

mod message;
mod pipeline;
mod sink;

pub use message::{Level, LogMessage};
pub use pipeline::{Logger, LoggerOptions};
pub use sink::{FileSink, Sink, TermSink};
