/*!
 * Core Module
 * Shared error types for the concurrency runtime
 */

pub mod errors;

pub use errors::{LogError, TaskError};
