/*!
 * Task and Future Plumbing
 *
 * Type-erased one-shot tasks plus the caller-held handle that eventually
 * yields the task's result. A panic inside the submitted closure is caught
 * and delivered through the handle, never through the worker thread.
 */

use crate::core::errors::TaskError;
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Terminal state of a submitted task. Exactly one variant is reached, at
/// most once.
enum Outcome<R> {
    Value(R),
    Panicked(String),
    Abandoned,
}

impl<R> Outcome<R> {
    fn into_result(self) -> Result<R, TaskError> {
        match self {
            Outcome::Value(value) => Ok(value),
            Outcome::Panicked(text) => Err(TaskError::Panicked(text)),
            Outcome::Abandoned => Err(TaskError::Abandoned),
        }
    }
}

struct Shared<R> {
    slot: Mutex<Option<Outcome<R>>>,
    ready: Condvar,
}

impl<R> Shared<R> {
    /// Delivers the terminal state. First delivery wins; a second call is a
    /// no-op so the at-most-once invariant holds even if shutdown races an
    /// executing worker.
    fn complete(&self, outcome: Outcome<R>) {
        let mut slot = self.slot.lock();
        if slot.is_none() {
            *slot = Some(outcome);
            self.ready.notify_all();
        }
    }
}

/// Caller-held handle for the eventual result of a submitted task.
///
/// Dropping the handle without querying it silently discards the outcome,
/// including a captured panic. That is deliberate library-misuse territory:
/// the pool itself stays healthy, but the failure is lost. Keep the handle
/// and call [`wait`](Self::wait) for any task whose failure matters.
pub struct TaskFuture<R> {
    shared: Arc<Shared<R>>,
}

impl<R> TaskFuture<R> {
    /// Blocks until the task reaches a terminal state and returns it.
    pub fn wait(self) -> Result<R, TaskError> {
        let mut slot = self.shared.slot.lock();
        loop {
            if let Some(outcome) = slot.take() {
                return outcome.into_result();
            }
            self.shared.ready.wait(&mut slot);
        }
    }

    /// Bounded [`wait`](Self::wait). Returns the handle back through `Err`
    /// if the task is still pending after `timeout`.
    pub fn wait_timeout(self, timeout: Duration) -> Result<Result<R, TaskError>, Self> {
        let deadline = Instant::now() + timeout;
        {
            let mut slot = self.shared.slot.lock();
            loop {
                if let Some(outcome) = slot.take() {
                    return Ok(outcome.into_result());
                }
                if self.shared.ready.wait_until(&mut slot, deadline).timed_out() {
                    break;
                }
            }
        }
        Err(self)
    }

    /// Whether the task has reached a terminal state.
    pub fn is_ready(&self) -> bool {
        self.shared.slot.lock().is_some()
    }
}

/// One-shot unit of work in flight between `submit` and a worker.
///
/// Owned exclusively by its queue slot until a worker takes it; executed at
/// most once, or abandoned at shutdown without executing.
pub(crate) struct Task {
    runnable: Box<dyn Runnable>,
}

impl Task {
    pub(crate) fn run(self) {
        self.runnable.run();
    }

    pub(crate) fn abandon(self) {
        self.runnable.abandon();
    }
}

trait Runnable: Send {
    fn run(self: Box<Self>);
    fn abandon(self: Box<Self>);
}

struct Packaged<R, F> {
    func: F,
    shared: Arc<Shared<R>>,
}

impl<R, F> Runnable for Packaged<R, F>
where
    R: Send + 'static,
    F: FnOnce() -> R + Send + 'static,
{
    fn run(self: Box<Self>) {
        let outcome = match catch_unwind(AssertUnwindSafe(self.func)) {
            Ok(value) => Outcome::Value(value),
            Err(payload) => Outcome::Panicked(panic_text(payload.as_ref())),
        };
        self.shared.complete(outcome);
    }

    fn abandon(self: Box<Self>) {
        self.shared.complete(Outcome::Abandoned);
    }
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

/// Binds a closure into a queueable [`Task`] and its paired future.
pub(crate) fn package<R, F>(func: F) -> (Task, TaskFuture<R>)
where
    R: Send + 'static,
    F: FnOnce() -> R + Send + 'static,
{
    let shared = Arc::new(Shared {
        slot: Mutex::new(None),
        ready: Condvar::new(),
    });
    let task = Task {
        runnable: Box::new(Packaged {
            func,
            shared: Arc::clone(&shared),
        }),
    };
    (task, TaskFuture { shared })
}
