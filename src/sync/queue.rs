/*!
 * Synchronized FIFO Queue
 *
 * Unbounded queue with a blocking, invalidation-aware `pop`. This is the
 * only blocking consumer operation in the core; producers never block
 * beyond lock acquisition.
 */

use super::container::{Backing, SyncContainer};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// FIFO queue built on [`SyncContainer`].
///
/// Enqueue and dequeue run under the same exclusive lock, so FIFO order is
/// preserved per queue. There is no fullness bound; `push` never blocks.
pub struct SyncQueue<T> {
    container: SyncContainer<VecDeque<T>>,
}

impl<T> SyncQueue<T> {
    pub fn new() -> Self {
        Self {
            container: SyncContainer::new(),
        }
    }

    /// Appends an element and wakes one blocked consumer.
    pub fn push(&self, item: T) {
        let mut inner = self.container.guard();
        inner.items.push_back(item);
        self.container.notify_one();
    }

    /// Like [`push`](Self::push), but refuses the element once the queue
    /// has been invalidated, handing it back so the caller can dispose of
    /// it. Never blocks.
    pub fn push_if_valid(&self, item: T) -> Result<(), T> {
        let mut inner = self.container.guard();
        if !inner.valid {
            return Err(item);
        }
        inner.items.push_back(item);
        self.container.notify_one();
        Ok(())
    }

    /// Removes and returns the front element, blocking while the queue is
    /// empty and still valid. Returns `None` once the queue has been
    /// invalidated; shutdown-during-pop is expected control flow, not an
    /// error.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.container.guard();
        while inner.items.is_empty() && inner.valid {
            self.container.wait(&mut inner);
        }
        if !inner.valid {
            return None;
        }
        inner.items.pop_front()
    }

    /// Non-blocking variant of [`pop`](Self::pop).
    pub fn try_pop(&self) -> Option<T> {
        let mut inner = self.container.guard();
        if !inner.valid {
            return None;
        }
        inner.items.pop_front()
    }

    /// Bounded variant of [`pop`](Self::pop); gives up after `timeout` if
    /// no element arrived and the queue was not invalidated.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.container.guard();
        while inner.items.is_empty() && inner.valid {
            if self.container.wait_until(&mut inner, deadline).timed_out() {
                break;
            }
        }
        if !inner.valid {
            return None;
        }
        inner.items.pop_front()
    }

    /// Applies `f` to every queued element, front to back, under the
    /// exclusive lock. `f` must not touch this queue; the lock is not
    /// reentrant.
    pub fn for_each(&self, mut f: impl FnMut(&mut T)) {
        self.container.with_lock(|items| {
            for item in items.iter_mut() {
                f(item);
            }
        });
    }

    /// Runs arbitrary code on the backing deque under the exclusive lock.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut VecDeque<T>) -> R) -> R {
        self.container.with_lock(f)
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.container.is_valid()
    }

    pub fn clear(&self) {
        self.container.clear()
    }

    /// Permanently disables blocking waits on this queue. See
    /// [`SyncContainer::invalidate`].
    pub fn invalidate(&self) {
        self.container.invalidate()
    }
}

impl<T> Default for SyncQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
