/*!
 * Generic Synchronized Container
 *
 * Wraps an arbitrary backing container with one exclusive lock, one condvar
 * and a one-way validity latch. Queue and map variants compose this type
 * rather than inherit from it, so the locking discipline lives here once.
 */

use parking_lot::{Condvar, Mutex, MutexGuard, WaitTimeoutResult};
use std::collections::{HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::time::Instant;

/// Storage that can live inside a [`SyncContainer`].
///
/// Implemented for the sequence and associative containers the core uses;
/// only the operations the wrapper itself needs are required.
pub trait Backing: Default {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

impl<T> Backing for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn clear(&mut self) {
        VecDeque::clear(self)
    }
}

impl<K, V, S> Backing for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }
}

pub(crate) struct Inner<C> {
    pub(crate) items: C,
    pub(crate) valid: bool,
}

/// Lock + condvar wrapper around a backing container.
///
/// A single mutex guards both the items and the `valid` latch, and the one
/// condvar is signalled on every mutation that can unblock a waiter. Keeping
/// predicate state and wake condition behind the same lock rules out lost
/// wakeups between a waiter's check and its sleep.
pub struct SyncContainer<C> {
    inner: Mutex<Inner<C>>,
    waiters: Condvar,
}

impl<C: Backing> SyncContainer<C> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: C::default(),
                valid: true,
            }),
            waiters: Condvar::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    /// Whether [`invalidate`](Self::invalidate) has been called.
    pub fn is_valid(&self) -> bool {
        self.inner.lock().valid
    }

    /// Empties the backing container and wakes every waiter so blocked
    /// consumers re-evaluate their predicate.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.items.clear();
        self.waiters.notify_all();
    }

    /// Flips the one-way validity latch and wakes every waiter. Blocked and
    /// future consumers observe the latch and return failure instead of
    /// waiting. Idempotent; the latch never resets.
    pub fn invalidate(&self) {
        let mut inner = self.inner.lock();
        inner.valid = false;
        self.waiters.notify_all();
    }

    /// Runs arbitrary code on the backing container while the exclusive
    /// lock is held. The closure must not touch this container again; the
    /// lock is not reentrant.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.inner.lock().items)
    }

    pub(crate) fn guard(&self) -> MutexGuard<'_, Inner<C>> {
        self.inner.lock()
    }

    pub(crate) fn wait(&self, guard: &mut MutexGuard<'_, Inner<C>>) {
        self.waiters.wait(guard);
    }

    pub(crate) fn wait_until(
        &self,
        guard: &mut MutexGuard<'_, Inner<C>>,
        deadline: Instant,
    ) -> WaitTimeoutResult {
        self.waiters.wait_until(guard, deadline)
    }

    pub(crate) fn notify_one(&self) {
        self.waiters.notify_one();
    }
}

impl<C: Backing> Default for SyncContainer<C> {
    fn default() -> Self {
        Self::new()
    }
}
