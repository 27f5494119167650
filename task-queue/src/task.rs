//! The container types for tasks held by the queue

use common::types::tasks::{TaskIdentifier, TaskInfo};
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::{error::BoxedTaskError, signal::TaskSignal};

/// The result an enqueued action settles with
pub type TaskResult = Result<(), BoxedTaskError>;

/// A type-erased action, invoked at most once with its task's signal
pub(crate) type TaskAction = Box<dyn FnOnce(TaskSignal) -> BoxFuture<'static, TaskResult> + Send>;

/// The bookkeeping half of a task, outlives the action once it is started
#[derive(Clone, Debug)]
pub(crate) struct TaskHandle {
    /// The ID of the task
    pub id: TaskIdentifier,
    /// The diagnostic label of the task
    pub label: Option<String>,
    /// The task's cancellation signal
    pub signal: TaskSignal,
}

impl TaskHandle {
    /// Create a handle with a fresh id and unfired signal
    pub fn new(label: Option<String>) -> Self {
        Self { id: Uuid::new_v4(), label, signal: TaskSignal::new() }
    }

    /// A serializable view of the task
    pub fn info(&self) -> TaskInfo {
        TaskInfo { id: self.id, label: self.label.clone(), aborted: self.signal.is_aborted() }
    }
}

/// A task waiting in the backlog
pub(crate) struct QueuedTask {
    /// The task's bookkeeping
    pub handle: TaskHandle,
    /// The deferred work
    pub action: TaskAction,
}
