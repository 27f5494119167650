//! A simulated sample-based instrument
//!
//! Stands in for an audio engine: loading samples and sounding a note only
//! take time. Both operations honor a cancellation signal, so a superseded
//! load or note stops early rather than running to completion

use std::{
    sync::{
        RwLock,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use task_queue::TaskSignal;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// The granularity at which a sounding note checks its signal
const PLAY_SLICE: Duration = Duration::from_millis(10);
/// The error message emitted when the played-notes lock is poisoned
const ERR_LOCK_POISONED: &str = "played notes lock poisoned";

/// The error type emitted by the instrument
#[derive(Debug, Error)]
pub enum InstrumentError {
    /// A note was played before the samples finished loading
    #[error("instrument {0} has not loaded its samples")]
    NotLoaded(String),
    /// The instrument was used after being shut down
    #[error("instrument {0} has been shut down")]
    ShutDown(String),
}

/// The configuration of a simulated instrument
#[derive(Clone, Debug)]
pub struct InstrumentConfig {
    /// The name of the instrument, used in logs
    pub name: String,
    /// How long loading the samples takes
    pub load_latency: Duration,
}

/// A simulated instrument with an explicit load and shutdown lifecycle
#[derive(Debug)]
pub struct Instrument {
    /// The instrument's configuration
    config: InstrumentConfig,
    /// Whether the samples have been loaded
    loaded: AtomicBool,
    /// Whether the instrument has been shut down
    shut_down: AtomicBool,
    /// The notes that sounded for their full duration, in order
    played: RwLock<Vec<String>>,
}

impl Instrument {
    /// Constructor, the samples are not loaded until `load` is called
    pub fn new(config: InstrumentConfig) -> Self {
        Self {
            config,
            loaded: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
            played: RwLock::new(Vec::new()),
        }
    }

    /// The name of the instrument
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Whether the samples have been loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// The notes that sounded for their full duration, in order
    pub fn played_notes(&self) -> Vec<String> {
        self.played.read().expect(ERR_LOCK_POISONED).clone()
    }

    /// Load the instrument's samples
    ///
    /// Returns `Ok(false)` if the signal fired before loading finished, in
    /// which case the samples remain unloaded
    pub async fn load(&self, signal: &TaskSignal) -> Result<bool, InstrumentError> {
        self.check_live()?;
        if self.is_loaded() {
            return Ok(true);
        }

        info!("loading samples for {}", self.name());
        tokio::select! {
            _ = sleep(self.config.load_latency) => {},
            _ = signal.aborted() => {
                warn!("abandoned sample load for {}", self.name());
                return Ok(false);
            },
        }

        self.check_live()?;
        self.loaded.store(true, Ordering::Release);
        info!("loaded samples for {}", self.name());
        Ok(true)
    }

    /// Sound a note for the given duration
    ///
    /// Returns `Ok(false)` if the signal fired before the note finished
    pub async fn play(
        &self,
        note: &str,
        duration: Duration,
        signal: &TaskSignal,
    ) -> Result<bool, InstrumentError> {
        self.check_live()?;
        if !self.is_loaded() {
            return Err(InstrumentError::NotLoaded(self.name().to_string()));
        }

        debug!("note on: {note}");
        let mut remaining = duration;
        while !remaining.is_zero() {
            if signal.is_aborted() {
                debug!("note off: {note} (cut short)");
                return Ok(false);
            }

            let slice = remaining.min(PLAY_SLICE);
            sleep(slice).await;
            remaining -= slice;
        }

        self.played.write().expect(ERR_LOCK_POISONED).push(note.to_string());
        debug!("note off: {note}");
        Ok(true)
    }

    /// Release the instrument, later loads and notes fail
    pub fn shutdown(&self) {
        self.shut_down.store(true, Ordering::Release);
        self.loaded.store(false, Ordering::Release);
        info!("shut down instrument {}", self.name());
    }

    /// Error if the instrument has been shut down
    fn check_live(&self) -> Result<(), InstrumentError> {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(InstrumentError::ShutDown(self.name().to_string()));
        }

        Ok(())
    }
}
