//! A resettable source of cancellation signals
//!
//! Where the queue hands out one signal per task, a controller hands out the
//! same signal to any number of operations until it is reset, at which point
//! every previously issued signal fires and later callers receive a fresh one

use tracing::trace;

use crate::signal::TaskSignal;

/// Issues cancellation signals and fires them on demand
#[derive(Debug)]
pub struct AbortController {
    /// The signal handed to operations started since the last reset
    signal: TaskSignal,
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortController {
    /// Create a controller with an unfired signal
    pub fn new() -> Self {
        Self { signal: TaskSignal::new() }
    }

    /// Fire the current signal; a no-op if it already fired
    pub fn abort(&self) {
        if self.signal.abort() {
            trace!("abort controller fired");
        }
    }

    /// Fire the current signal and install a fresh one in its place
    pub fn reset_abort(&mut self) {
        self.abort();
        self.signal = TaskSignal::new();
    }

    /// A handle to the current signal
    pub fn signal(&self) -> TaskSignal {
        self.signal.clone()
    }
}
