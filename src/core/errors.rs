/*!
 * Error Types
 * Centralized error handling with thiserror
 */

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Terminal failure of a submitted task, surfaced through its
/// [`TaskFuture`](crate::pool::TaskFuture).
///
/// Queue invalidation is not represented here: a consumer observing
/// shutdown gets `None` from `pop`, because that is expected control flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The submitted closure panicked. The payload text is captured; the
    /// worker thread that ran the task is unaffected.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The task was still queued when the pool shut down and was never
    /// executed.
    #[error("task abandoned at pool shutdown")]
    Abandoned,
}

/// Failures raised while configuring the logging pipeline.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("failed to open log file {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
