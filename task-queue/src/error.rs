//! Error types for the task queue

use common::types::tasks::TaskInfo;
use thiserror::Error;

/// The error type an action may fail with
pub type BoxedTaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type emitted by the task queue
#[derive(Debug, Error)]
pub enum TaskQueueError {
    /// An enqueued action returned an error
    ///
    /// The queue stops draining when this occurs; tasks behind the failed one
    /// are left in the backlog
    #[error("task {task} failed: {source}")]
    TaskFailed {
        /// The task whose action failed
        task: TaskInfo,
        /// The error returned by the action
        #[source]
        source: BoxedTaskError,
    },
}

impl TaskQueueError {
    /// The task that caused the error
    pub fn task(&self) -> &TaskInfo {
        match self {
            TaskQueueError::TaskFailed { task, .. } => task,
        }
    }
}
