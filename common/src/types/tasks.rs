//! Defines task related types

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A type alias for the identifier underlying a task
pub type TaskIdentifier = Uuid;

/// The label used in logs for a task enqueued without one
const UNLABELED_TASK: &str = "unlabeled";

/// A serializable view of a task held by the queue
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskInfo {
    /// The ID of the task
    pub id: TaskIdentifier,
    /// The diagnostic label given at enqueue time, if any
    pub label: Option<String>,
    /// Whether the task's cancellation signal has fired
    pub aborted: bool,
}

impl TaskInfo {
    /// The label of the task, or a placeholder if none was given
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or(UNLABELED_TASK)
    }
}

impl Display for TaskInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}({})", self.name(), self.id)
    }
}

/// A snapshot of the queue's externally observable state
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueStatus {
    /// The task whose action is currently executing
    pub current: Option<TaskInfo>,
    /// The number of tasks not yet started
    pub queued: usize,
}

impl QueueStatus {
    /// Whether a task is currently executing
    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use super::{QueueStatus, TaskInfo};

    /// Tests the display name of labeled and unlabeled tasks
    #[test]
    fn test_task_name() {
        let id = Uuid::new_v4();
        let labeled = TaskInfo { id, label: Some("load-samples".to_string()), aborted: false };
        let unlabeled = TaskInfo { id, label: None, aborted: false };

        assert_eq!(labeled.name(), "load-samples");
        assert_eq!(unlabeled.name(), "unlabeled");
        assert_eq!(labeled.to_string(), format!("load-samples({id})"));
    }

    /// Tests that the running indicator is derived from the current task
    #[test]
    fn test_status_is_running() {
        let mut status = QueueStatus::default();
        assert!(!status.is_running());

        status.current = Some(TaskInfo { id: Uuid::new_v4(), label: None, aborted: false });
        assert!(status.is_running());
    }

    /// Tests the serialized shape of a status snapshot
    #[test]
    fn test_status_serialization() {
        let status = QueueStatus { current: None, queued: 3 };
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["queued"], 3);
        assert!(json["current"].is_null());
    }
}
