//! The cancellation signal handed to each enqueued action

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::Notify;

/// A single-fire cancellation flag shared between the queue and one action
///
/// The flag only ever transitions from unset to set. Clones observe the same
/// flag; only the queue and [`crate::AbortController`] may set it
#[derive(Clone, Debug)]
pub struct TaskSignal {
    /// The flag and its waiters
    inner: Arc<SignalInner>,
}

/// The shared state behind a signal
#[derive(Debug, Default)]
struct SignalInner {
    /// Whether the signal has fired
    aborted: AtomicBool,
    /// Wakes tasks awaiting `aborted()`
    notify: Notify,
}

impl TaskSignal {
    /// Create a new, unset signal
    pub(crate) fn new() -> Self {
        Self { inner: Arc::new(SignalInner::default()) }
    }

    /// Whether the signal has fired
    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.load(Ordering::Acquire)
    }

    /// Resolves once the signal fires, immediately if it already has
    ///
    /// Meant to be raced against an action's own work, e.g. in a
    /// `tokio::select!`
    pub async fn aborted(&self) {
        // Register interest before checking the flag so that an abort between
        // the check and the await still wakes us
        let notified = self.inner.notify.notified();
        if self.is_aborted() {
            return;
        }

        notified.await;
    }

    /// Fire the signal, returns whether this call was the one to fire it
    pub(crate) fn abort(&self) -> bool {
        let was_aborted = self.inner.aborted.swap(true, Ordering::AcqRel);
        if !was_aborted {
            self.inner.notify.notify_waiters();
        }

        !was_aborted
    }

    /// Whether two handles refer to the same underlying flag
    pub fn same_signal(&self, other: &TaskSignal) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::TaskSignal;

    /// Tests that the flag fires exactly once and is shared between clones
    #[test]
    fn test_single_transition() {
        let signal = TaskSignal::new();
        let clone = signal.clone();
        assert!(!clone.is_aborted());

        assert!(signal.abort());
        assert!(!signal.abort());
        assert!(clone.is_aborted());
        assert!(clone.same_signal(&signal));
        assert!(!clone.same_signal(&TaskSignal::new()));
    }

    /// Tests that awaiting an already fired signal resolves immediately
    #[tokio::test]
    async fn test_aborted_after_fire() {
        let signal = TaskSignal::new();
        signal.abort();

        signal.aborted().await;
    }

    /// Tests that a waiter is woken when the signal fires from another task
    #[tokio::test(start_paused = true)]
    async fn test_aborted_wakes_waiter() {
        let signal = TaskSignal::new();
        let remote = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(15)).await;
            remote.abort();
        });

        tokio::select! {
            _ = signal.aborted() => {},
            _ = tokio::time::sleep(Duration::from_millis(50)) => panic!("signal never fired"),
        }
        assert!(signal.is_aborted());
    }
}
