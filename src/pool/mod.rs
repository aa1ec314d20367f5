/*!
 * Thread Pool
 *
 * Fixed-size worker pool with future-based task submission. Submitted
 * closures are type-erased into one-shot tasks on a shared synchronized
 * queue; results and captured panics come back through per-submission
 * futures.
 */

mod pool;
mod task;

pub use pool::ThreadPool;
pub use task::TaskFuture;
