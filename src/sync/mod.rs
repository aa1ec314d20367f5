/*!
 * Synchronized Containers
 *
 * One lock + condvar wrapper (`SyncContainer`) reused by the thread pool's
 * task queue and every log sink mailbox, with thin queue and map wrappers
 * built on top by composition.
 *
 * # Architecture
 *
 * Every container pairs a single `parking_lot::Mutex` with a single
 * `Condvar` and a one-way `valid` latch. `invalidate()` flips the latch and
 * wakes every waiter, which is the only shutdown signal blocking consumers
 * ever need.
 */

mod container;
mod map;
mod queue;

pub use container::{Backing, SyncContainer};
pub use map::SyncMap;
pub use queue::SyncQueue;
