//! A sequential, cancelable queue of asynchronous tasks
//!
//! Tasks are drained one at a time in the order they were enqueued. Each task
//! owns a cancellation signal which the queue flips when the task is
//! superseded; cancellation is cooperative, so an action must observe its
//! signal and return early for the abort to take effect

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::needless_pass_by_ref_mut)]

pub mod abort_controller;
pub mod error;
pub mod queue;
pub mod signal;
mod task;

pub use abort_controller::AbortController;
pub use error::{BoxedTaskError, TaskQueueError};
pub use queue::SequentialTaskQueue;
pub use signal::TaskSignal;
pub use task::TaskResult;
