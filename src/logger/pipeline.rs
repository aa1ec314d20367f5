/*!
 * Logging Pipeline
 *
 * Decouples message producers (any thread) from destination I/O (one
 * dedicated consumer thread per sink). Messages emitted before any sink
 * exists are staged in an early buffer and replayed exactly once when the
 * pipeline is initialized.
 */

use super::message::{Level, LogMessage};
use super::sink::{FileSink, Sink, TermSink};
use crate::core::errors::LogError;
use crate::pool::ThreadPool;
use crate::sync::SyncQueue;
use ahash::RandomState;
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const TIME_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// Logging configuration sourced from the command line by the driver.
#[derive(Debug, Clone, Default)]
pub struct LoggerOptions {
    /// Comma-separated debug categories enabled for conditional logging.
    pub debug_only: String,
    /// Optional path for a secondary plain-text file sink.
    pub debug_file: Option<PathBuf>,
    /// Unconditionally enables every debug category.
    pub debug_all: bool,
}

/// A registered sink: its mailbox plus the dedicated consumer thread.
struct SinkWorker {
    mailbox: Arc<SyncQueue<LogMessage>>,
    thread: JoinHandle<()>,
}

/// Multi-sink, multi-threaded logging frontend.
///
/// One instance per process, owned by the runtime context and shared by
/// `Arc`. Producers format and push; each sink's consumer thread pops and
/// writes, so destination I/O never blocks analysis threads.
pub struct Logger {
    sinks: Mutex<Vec<SinkWorker>>,
    early: Mutex<Vec<LogMessage>>,
    /// One-way latch: set by the first `init` call, making the early-buffer
    /// flush and sink registration a one-time transition.
    initialized: AtomicBool,
    pool: OnceLock<Arc<ThreadPool>>,
    debug_types: RwLock<HashSet<String, RandomState>>,
    debug_all: AtomicBool,
    sink_seq: AtomicUsize,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            sinks: Mutex::new(Vec::new()),
            early: Mutex::new(Vec::new()),
            initialized: AtomicBool::new(false),
            pool: OnceLock::new(),
            debug_types: RwLock::new(HashSet::default()),
            debug_all: AtomicBool::new(false),
            sink_seq: AtomicUsize::new(0),
        }
    }

    /// One-time wiring of the thread pool, so formatted messages carry the
    /// normalized thread ID instead of the `[INIT]` marker.
    pub fn attach_pool(&self, pool: Arc<ThreadPool>) {
        let _ = self.pool.set(pool);
    }

    /// Stages a message in the early buffer, to be replayed into every
    /// sink when the pipeline initializes. Safe from process start.
    pub fn early_log(&self, level: Level, text: impl AsRef<str>) {
        let message = LogMessage::new(level, self.format(text.as_ref()));
        self.early.lock().push(message);
    }

    /// Formats a message and pushes one copy onto every registered sink's
    /// mailbox. Before any sink exists this behaves like
    /// [`early_log`](Self::early_log).
    pub fn log(&self, level: Level, text: impl AsRef<str>) {
        let sinks = self.sinks.lock();
        if sinks.is_empty() {
            drop(sinks);
            self.early_log(level, text);
            return;
        }
        let message = LogMessage::new(level, self.format(text.as_ref()));
        for sink in sinks.iter() {
            sink.mailbox.push(message.clone());
        }
    }

    pub fn fail(&self, text: impl AsRef<str>) {
        self.log(Level::Fail, text);
    }

    pub fn warn(&self, text: impl AsRef<str>) {
        self.log(Level::Warn, text);
    }

    pub fn conf(&self, text: impl AsRef<str>) {
        self.log(Level::Conf, text);
    }

    pub fn info(&self, text: impl AsRef<str>) {
        self.log(Level::Info, text);
    }

    /// Conditional variant: logs only if the global debug flag is set or
    /// `category` was enabled via the debug-type filter.
    pub fn log_with(&self, category: &str, level: Level, text: impl AsRef<str>) {
        if self.debug_enabled(category) {
            self.log(level, text);
        }
    }

    pub fn debug_enabled(&self, category: &str) -> bool {
        self.debug_all.load(Ordering::Acquire) || self.debug_types.read().contains(category)
    }

    /// Registers a sink and spawns its dedicated consumer thread with a
    /// freshly allocated mailbox.
    pub fn add_sink(&self, sink: Box<dyn Sink>) {
        let mailbox = Arc::new(SyncQueue::new());
        let queue = Arc::clone(&mailbox);
        let n = self.sink_seq.fetch_add(1, Ordering::Relaxed);
        let builder = thread::Builder::new().name(format!("log-sink-{n}"));
        let thread = match builder.spawn(move || consumer_loop(sink, &queue)) {
            Ok(handle) => handle,
            Err(e) => panic!("failed to spawn log sink thread: {e}"),
        };
        self.sinks.lock().push(SinkWorker { mailbox, thread });
    }

    /// One-time transition out of the "no sinks" phase: registers a
    /// terminal sink and, if configured, a file sink, replays the early
    /// buffer into every sink in original order, then installs the
    /// debug-type filter. A second call is a no-op and cannot replay the
    /// buffer again.
    pub fn init_options(&self, options: &LoggerOptions) -> Result<(), LogError> {
        let mut sinks: Vec<Box<dyn Sink>> = vec![Box::new(TermSink::new())];
        if let Some(path) = &options.debug_file {
            let sink = FileSink::create(path).map_err(|source| LogError::OpenFile {
                path: path.clone(),
                source,
            })?;
            sinks.push(Box::new(sink));
        }
        self.init_with_sinks(sinks, &options.debug_only, options.debug_all);
        Ok(())
    }

    /// [`init_options`](Self::init_options) with caller-supplied sinks, for
    /// embedders and tests that capture output instead of writing to the
    /// terminal. Same one-shot semantics.
    pub fn init_with_sinks(&self, sinks: Vec<Box<dyn Sink>>, debug_only: &str, debug_all: bool) {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return;
        }
        for sink in sinks {
            self.add_sink(sink);
        }
        self.flush_early();
        self.set_debug_types(debug_only);
        if debug_all {
            self.debug_all.store(true, Ordering::Release);
        }
    }

    /// Splits a comma-separated category list into the debug-type set.
    pub fn set_debug_types(&self, list: &str) {
        let mut types = self.debug_types.write();
        for category in list.split(',').filter(|c| !c.is_empty()) {
            types.insert(category.to_string());
        }
    }

    /// Drains every sink and joins its consumer thread. One `Term`
    /// sentinel per mailbox guarantees, by FIFO order, that everything
    /// pushed earlier is written before the thread stops. Returns only
    /// after all sinks have joined. Idempotent.
    pub fn wait_finished(&self) {
        let workers: Vec<SinkWorker> = self.sinks.lock().drain(..).collect();
        for worker in workers {
            worker.mailbox.push(LogMessage::new(Level::Term, ""));
            if worker.thread.join().is_err() {
                log::error!("log sink thread exited by panic");
            }
        }
    }

    /// Replays the early buffer into every registered sink, in original
    /// order, then clears it for the life of the process.
    fn flush_early(&self) {
        let drained = std::mem::take(&mut *self.early.lock());
        let sinks = self.sinks.lock();
        for message in &drained {
            for sink in sinks.iter() {
                sink.mailbox.push(message.clone());
            }
        }
    }

    /// Prepends the timestamp and the thread tag: the zero-padded
    /// normalized thread ID once a pool is attached, the `[INIT]` marker
    /// before that.
    fn format(&self, text: &str) -> String {
        let stamp = timestamp();
        match self.pool.get() {
            Some(pool) => {
                let width = digits(pool.thread_count());
                format!("[{stamp}][{id:0width$}] {text}", id = pool.thread_id())
            }
            None => format!("[{stamp}][INIT] {text}"),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.wait_finished();
    }
}

/// Dedicated per-sink consumer: pops until the `Term` sentinel (or queue
/// invalidation), writing and flushing one line per message. A write
/// failure stops this sink only.
fn consumer_loop(mut sink: Box<dyn Sink>, mailbox: &SyncQueue<LogMessage>) {
    while let Some(message) = mailbox.pop() {
        if message.level == Level::Term {
            break;
        }
        let line = format!(
            "{}{}{}",
            sink.preamble(message.level),
            message.text,
            sink.appendix()
        );
        if let Err(e) = sink.write(&line) {
            log::error!("log sink write failed, stopping consumer: {e}");
            break;
        }
    }
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&TIME_FORMAT)
        .unwrap_or_else(|_| "??:??:??".to_string())
}

/// Decimal width of the largest normalized thread ID, for zero-padding.
fn digits(mut n: u32) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
