//! The sequential task queue
//!
//! The queue holds a FIFO backlog of not-yet-started tasks and at most one
//! running task. `run` drains the backlog one task at a time, stopping early
//! if an action fails or if the running task's signal fired while it ran.
//! `clear` fires the running task's signal, fires and discards every queued
//! task, and resets the running indicator immediately, without waiting for
//! the running action to observe its signal

use std::{
    collections::VecDeque,
    fmt::{Debug, Formatter, Result as FmtResult},
    future::Future,
    sync::{Arc, Mutex, MutexGuard},
};

use common::types::tasks::{QueueStatus, TaskIdentifier, TaskInfo};
use futures::FutureExt;
use tokio::sync::watch::{Receiver as WatchReceiver, Sender as WatchSender, channel as watch_channel};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::{
    error::TaskQueueError,
    signal::TaskSignal,
    task::{QueuedTask, TaskAction, TaskHandle, TaskResult},
};

/// The error message emitted when the queue's state lock is poisoned
const ERR_LOCK_POISONED: &str = "task queue state lock poisoned";

// ---------
// | State |
// ---------

/// The mutable state behind a queue
#[derive(Default)]
struct QueueState {
    /// The tasks not yet started, in execution order
    backlog: VecDeque<QueuedTask>,
    /// The task whose action is currently executing
    current: Option<TaskHandle>,
}

impl QueueState {
    /// Snapshot the externally observable state
    fn status(&self) -> QueueStatus {
        QueueStatus { current: self.current.as_ref().map(TaskHandle::info), queued: self.backlog.len() }
    }

    /// Clear the running indicator if it still refers to the given task
    ///
    /// A `clear` followed by a new `run` may install a new running task before
    /// the previous run's action settles; that run must leave it in place
    fn release_current(&mut self, handle: &TaskHandle) {
        if self.current.as_ref().is_some_and(|current| current.id == handle.id) {
            self.current = None;
        }
    }
}

// ---------
// | Queue |
// ---------

/// Executes enqueued asynchronous actions one at a time, in enqueue order
///
/// The queue is a cheaply cloneable handle; clones share the same backlog, so
/// a task may be cleared or enqueued from within a running action or from
/// another task while `run` is suspended
#[derive(Clone)]
pub struct SequentialTaskQueue {
    /// The backlog and running task
    ///
    /// A mutex, as queued actions are `Send` but not `Sync`
    state: Arc<Mutex<QueueState>>,
    /// Publishes a status snapshot after every state change
    status: Arc<WatchSender<QueueStatus>>,
}

impl Default for SequentialTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SequentialTaskQueue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SequentialTaskQueue").field("status", &self.status()).finish()
    }
}

impl SequentialTaskQueue {
    /// Create an empty, idle queue
    pub fn new() -> Self {
        let (status, _) = watch_channel(QueueStatus::default());
        Self { state: Arc::new(Mutex::new(QueueState::default())), status: Arc::new(status) }
    }

    // -----------
    // | Getters |
    // -----------

    /// Whether a task's action is currently executing
    pub fn is_running(&self) -> bool {
        self.lock_state().current.is_some()
    }

    /// The task whose action is currently executing
    pub fn current(&self) -> Option<TaskInfo> {
        self.lock_state().current.as_ref().map(TaskHandle::info)
    }

    /// The tasks not yet started, in execution order
    pub fn queue(&self) -> Vec<TaskInfo> {
        self.lock_state().backlog.iter().map(|task| task.handle.info()).collect()
    }

    /// The number of tasks not yet started
    pub fn len(&self) -> usize {
        self.lock_state().backlog.len()
    }

    /// Whether there are no tasks waiting to be started
    pub fn is_empty(&self) -> bool {
        self.lock_state().backlog.is_empty()
    }

    /// A snapshot of the queue's observable state
    pub fn status(&self) -> QueueStatus {
        self.lock_state().status()
    }

    /// Subscribe to status snapshots, republished on every state change
    pub fn subscribe(&self) -> WatchReceiver<QueueStatus> {
        self.status.subscribe()
    }

    // -----------
    // | Setters |
    // -----------

    /// Append an action to the backlog without starting it
    pub fn enqueue<F, Fut>(&self, action: F) -> TaskIdentifier
    where
        F: FnOnce(TaskSignal) -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        self.push(None, action)
    }

    /// Append a labeled action to the backlog without starting it
    ///
    /// The label only appears in logs and status snapshots
    pub fn enqueue_named<F, Fut>(&self, label: impl Into<String>, action: F) -> TaskIdentifier
    where
        F: FnOnce(TaskSignal) -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        self.push(Some(label.into()), action)
    }

    /// Remove the task at the head of the backlog without running it
    ///
    /// The removed task's signal is left unfired and the running task is
    /// unaffected
    pub fn dequeue(&self) -> Option<TaskInfo> {
        let removed = {
            let mut state = self.lock_state();
            let removed = state.backlog.pop_front()?;
            self.publish(&state);
            removed
        };

        let info = removed.handle.info();
        debug!("dequeued task {info} without running it");
        Some(info)
    }

    /// Fire the running task's signal and discard the backlog
    ///
    /// Every discarded task's signal fires and its action is never invoked.
    /// The running indicator resets immediately; the running action keeps
    /// executing until it observes its signal
    pub fn clear(&self) {
        let discarded: Vec<QueuedTask> = {
            let mut state = self.lock_state();
            if let Some(current) = state.current.take() {
                current.signal.abort();
                info!("aborting running task {}", current.info());
            }

            let discarded: Vec<_> = state.backlog.drain(..).collect();
            for task in discarded.iter() {
                task.handle.signal.abort();
            }

            self.publish(&state);
            discarded
        };

        if !discarded.is_empty() {
            debug!("discarded {} queued tasks", discarded.len());
        }
    }

    /// Fire the running task's signal, leaving the backlog in place
    ///
    /// `run` stops once the aborted action settles. Returns whether a task was
    /// running
    pub fn abort_current(&self) -> bool {
        let state = self.lock_state();
        let Some(current) = state.current.as_ref() else {
            return false;
        };

        current.signal.abort();
        info!("aborting running task {}", current.info());
        self.publish(&state);
        true
    }

    // -------------
    // | Execution |
    // -------------

    /// Drain the backlog, awaiting each action before starting the next
    ///
    /// Returns early, leaving the rest of the backlog queued, when an action
    /// fails or when the running task's signal fired during its execution.
    /// Running on an empty backlog is a no-op.
    ///
    /// Overlapping calls race for the same backlog and their relative order
    /// is unspecified; callers should check `is_running` before starting a
    /// second run
    pub async fn run(&self) -> Result<(), TaskQueueError> {
        let mut finished: Option<TaskHandle> = None;
        loop {
            let Some(QueuedTask { handle, action }) = self.advance(finished.as_ref()) else {
                break;
            };

            let info = handle.info();
            let span = info_span!("task", id = %handle.id, label = info.name());
            info!("starting task {info}");

            let res = action(handle.signal.clone()).instrument(span).await;
            if let Err(source) = res {
                self.settle(&handle);
                error!("task {info} failed: {source}");
                return Err(TaskQueueError::TaskFailed { task: handle.info(), source });
            }

            if handle.signal.is_aborted() {
                self.settle(&handle);
                warn!("task {info} was aborted, halting queue");
                return Ok(());
            }

            info!("task {info} completed");
            finished = Some(handle);
        }

        Ok(())
    }

    // -----------
    // | Helpers |
    // -----------

    /// Box an action and append it to the backlog
    fn push<F, Fut>(&self, label: Option<String>, action: F) -> TaskIdentifier
    where
        F: FnOnce(TaskSignal) -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        let handle = TaskHandle::new(label);
        let id = handle.id;
        let info = handle.info();
        let action: TaskAction = Box::new(move |signal| action(signal).boxed());

        let mut state = self.lock_state();
        state.backlog.push_back(QueuedTask { handle, action });
        debug!("enqueued task {info}, {} tasks queued", state.backlog.len());
        self.publish(&state);

        id
    }

    /// Release the finished task, then pop the next task and mark it running
    fn advance(&self, finished: Option<&TaskHandle>) -> Option<QueuedTask> {
        let mut state = self.lock_state();
        if let Some(handle) = finished {
            state.release_current(handle);
        }

        let next = state.backlog.pop_front();
        if let Some(task) = next.as_ref() {
            state.current = Some(task.handle.clone());
        }

        self.publish(&state);
        next
    }

    /// Release a task that halted the run
    fn settle(&self, handle: &TaskHandle) {
        let mut state = self.lock_state();
        state.release_current(handle);
        self.publish(&state);
    }

    /// Publish a status snapshot, called with the state lock held so that
    /// snapshots are published in the order the changes were made
    fn publish(&self, state: &QueueState) {
        self.status.send_replace(state.status());
    }

    /// Acquire the lock on the queue state
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().expect(ERR_LOCK_POISONED)
    }
}
