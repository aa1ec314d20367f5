/*!
 * Runtime Context
 *
 * Explicit, owned wiring of the process-wide thread pool and logger.
 * Created once in the entry point and passed by shared ownership to
 * everything that submits work or emits messages; there is no implicit
 * global state anywhere in the core.
 */

use crate::core::errors::LogError;
use crate::logger::{Level, Logger, LoggerOptions};
use crate::pool::ThreadPool;
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration for the concurrency core, sourced from the
/// command line by the driver.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Total pool size including the constructing thread.
    pub threads: usize,
    /// Comma-separated debug categories for conditional logging.
    pub debug_only: String,
    /// Optional secondary log file.
    pub debug_file: Option<PathBuf>,
    /// Enables every debug category unconditionally.
    pub debug_all: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            debug_only: String::new(),
            debug_file: None,
            debug_all: false,
        }
    }
}

/// Process-wide context owning the thread pool and the logger.
///
/// Construction order matters and mirrors the program's startup phases:
/// the logger exists first so configuration code can emit early messages,
/// then the pool comes up and is attached for thread-ID formatting, then
/// the sinks are registered and the early buffer is replayed.
pub struct Runtime {
    pool: Arc<ThreadPool>,
    logger: Arc<Logger>,
}

impl Runtime {
    pub fn new(options: RuntimeOptions) -> Result<Self, LogError> {
        let logger = Arc::new(Logger::new());
        logger.early_log(Level::Conf, "configuring analysis runtime");

        let pool = Arc::new(ThreadPool::new(options.threads));
        logger.attach_pool(Arc::clone(&pool));
        logger.early_log(
            Level::Conf,
            format!("thread pool online with {} threads", pool.thread_count()),
        );
        logger.init_options(&LoggerOptions {
            debug_only: options.debug_only,
            debug_file: options.debug_file,
            debug_all: options.debug_all,
        })?;

        Ok(Self { pool, logger })
    }

    pub fn pool(&self) -> &Arc<ThreadPool> {
        &self.pool
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Ordered teardown: the pool first, so worker threads can still log
    /// while draining, then the logging pipeline.
    pub fn shutdown(&self) {
        self.pool.shutdown();
        self.logger.wait_finished();
    }
}
