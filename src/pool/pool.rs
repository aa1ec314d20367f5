/*!
 * Fixed-Size Worker Pool
 *
 * Schedules arbitrary closures across a fixed set of OS threads. Callers
 * fire-and-forget or await a typed result through the paired future.
 */

use super::task::{package, Task, TaskFuture};
use crate::sync::{SyncMap, SyncQueue};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

struct PoolShared {
    tasks: SyncQueue<Task>,
    /// Tasks submitted but not yet finished. Guarded by the same mutex the
    /// completion condvar waits on, so a `submit` racing an
    /// `await_completion` cannot lose the wakeup.
    pending: Mutex<usize>,
    completed: Condvar,
    running: AtomicBool,
    /// Normalized thread identities: a dense `[0, thread_count)` range with
    /// 0 reserved for the thread that constructed the pool. Written once
    /// during startup, read-only afterwards.
    threads: SyncMap<ThreadId, u32>,
}

/// Fixed-size thread pool with future-based submission.
///
/// The pool is an owned object; create exactly one per process in the entry
/// point and share it by `Arc`. Construction registers the calling thread
/// as normalized ID 0 and spawns `max(2, threads) - 1` workers.
pub struct ThreadPool {
    shared: Arc<PoolShared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    thread_count: u32,
}

impl ThreadPool {
    /// Creates the pool and starts its workers.
    ///
    /// `threads` counts the calling thread, so `new(4)` spawns three
    /// workers. At least one worker always exists, so a pool of size 1
    /// still executes tasks; requests for zero threads are clamped.
    pub fn new(threads: usize) -> Self {
        let count = threads.max(2);
        let shared = Arc::new(PoolShared {
            tasks: SyncQueue::new(),
            pending: Mutex::new(0),
            completed: Condvar::new(),
            running: AtomicBool::new(true),
            threads: SyncMap::new(),
        });
        shared.threads.insert(thread::current().id(), 0);

        let mut workers = Vec::with_capacity(count - 1);
        for n in 1..count {
            let shared = Arc::clone(&shared);
            let builder = thread::Builder::new().name(format!("pool-worker-{n}"));
            let handle = match builder.spawn(move || {
                shared.threads.insert(thread::current().id(), n as u32);
                worker_loop(&shared);
            }) {
                Ok(handle) => handle,
                Err(e) => panic!("failed to spawn pool worker {n}: {e}"),
            };
            workers.push(handle);
        }
        log::debug!("thread pool started with {count} threads");

        Self {
            shared,
            workers: Mutex::new(workers),
            thread_count: count as u32,
        }
    }

    /// Submits a closure and returns the future for its result.
    ///
    /// Non-blocking: the pending counter is bumped before the task becomes
    /// visible to workers, then the task is queued. Any panic inside `func`
    /// is captured into the future. Submitting to a pool that has already
    /// shut down resolves the future to `Abandoned` immediately.
    pub fn submit<R, F>(&self, func: F) -> TaskFuture<R>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        let (task, future) = package(func);
        if !self.shared.running.load(Ordering::Acquire) {
            task.abandon();
            return future;
        }
        {
            let mut pending = self.shared.pending.lock();
            *pending += 1;
        }
        // A shutdown may have invalidated the queue between the running
        // check and the push; the refused task is abandoned like any other
        // stranded task.
        if let Err(task) = self.shared.tasks.push_if_valid(task) {
            let mut pending = self.shared.pending.lock();
            *pending -= 1;
            if *pending == 0 {
                self.shared.completed.notify_all();
            }
            drop(pending);
            task.abandon();
        }
        future
    }

    /// Blocks until every submitted task has finished.
    ///
    /// Barrier-style: new submissions from other threads are allowed while
    /// waiting, and the predicate re-checks the live counter on every wake,
    /// so a waiter never returns while work is still pending.
    pub fn await_completion(&self) {
        let mut pending = self.shared.pending.lock();
        while *pending > 0 {
            self.shared.completed.wait(&mut pending);
        }
    }

    /// Stops the pool: wakes every blocked worker, joins them all, then
    /// abandons tasks that were still queued. Their futures resolve to
    /// `Abandoned` rather than pending forever. Idempotent.
    pub fn shutdown(&self) {
        if !self.shared.running.swap(false, Ordering::AcqRel) {
            return;
        }
        self.shared.tasks.invalidate();
        for handle in self.workers.lock().drain(..) {
            if handle.join().is_err() {
                log::error!("pool worker exited by panic");
            }
        }

        let mut stranded = Vec::new();
        self.shared
            .tasks
            .with_lock(|items| stranded.extend(items.drain(..)));
        if !stranded.is_empty() {
            log::debug!("abandoning {} queued tasks at shutdown", stranded.len());
            let mut pending = self.shared.pending.lock();
            *pending -= stranded.len();
            if *pending == 0 {
                self.shared.completed.notify_all();
            }
        }
        for task in stranded {
            task.abandon();
        }
    }

    /// Normalized ID of the calling thread.
    ///
    /// # Panics
    ///
    /// Calling this from a thread the pool has never registered is a
    /// contract violation and fails loudly instead of returning a wrong ID.
    pub fn thread_id(&self) -> u32 {
        let id = thread::current().id();
        match self.shared.threads.get(&id) {
            Some(n) => n,
            None => panic!("thread {id:?} is not registered with the thread pool"),
        }
    }

    /// Number of threads known to the pool, workers plus the thread that
    /// constructed it.
    pub fn thread_count(&self) -> u32 {
        self.thread_count
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: &PoolShared) {
    log::trace!("pool worker started");
    while shared.running.load(Ordering::Acquire) {
        match shared.tasks.pop() {
            Some(task) => {
                task.run();
                let mut pending = shared.pending.lock();
                *pending -= 1;
                if *pending == 0 {
                    shared.completed.notify_all();
                }
            }
            // Queue invalidated: shutdown in progress.
            None => break,
        }
    }
    log::trace!("pool worker stopped");
}
