/*!
 * Analysis Core
 * Concurrency runtime for the static-analysis driver
 *
 * Provides the three pieces every analysis pass builds on:
 * - a fixed-size thread pool with future-based task submission,
 * - synchronized container wrappers (queue and map variants),
 * - a multi-sink, multi-threaded logging pipeline with early buffering.
 */

pub mod core;
pub mod logger;
pub mod pool;
pub mod runtime;
pub mod sync;

// Re-export public API
pub use crate::core::errors::{LogError, TaskError};
pub use logger::{FileSink, Level, LogMessage, Logger, LoggerOptions, Sink, TermSink};
pub use pool::{TaskFuture, ThreadPool};
pub use runtime::{Runtime, RuntimeOptions};
pub use sync::{Backing, SyncContainer, SyncMap, SyncQueue};
