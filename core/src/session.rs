//! A playback session, serializing sample loads and notes through a task queue

use std::{sync::Arc, time::Duration};

use task_queue::{SequentialTaskQueue, TaskQueueError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::instrument::Instrument;

/// The label of the sample loading task
const LOAD_TASK_LABEL: &str = "load-samples";

/// Owns an instrument and the queue that drives it
///
/// Clones share the same queue and instrument
#[derive(Clone, Debug)]
pub struct Session {
    /// The queue serializing loads and notes
    queue: SequentialTaskQueue,
    /// The instrument notes are played on
    instrument: Arc<Instrument>,
    /// How long each note is held
    note_duration: Duration,
}

impl Session {
    /// Constructor
    pub fn new(instrument: Instrument, note_duration: Duration) -> Self {
        Self { queue: SequentialTaskQueue::new(), instrument: Arc::new(instrument), note_duration }
    }

    /// The session's task queue
    pub fn queue(&self) -> &SequentialTaskQueue {
        &self.queue
    }

    /// The session's instrument
    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Enqueue a phrase, preceded by a sample load if the instrument is not
    /// yet loaded
    ///
    /// Returns the number of tasks enqueued
    pub fn play_phrase(&self, phrase: &[String]) -> usize {
        let mut enqueued = 0;
        if !self.instrument.is_loaded() {
            let instrument = self.instrument.clone();
            self.queue.enqueue_named(LOAD_TASK_LABEL, move |signal| async move {
                instrument.load(&signal).await?;
                Ok(())
            });
            enqueued += 1;
        }

        for note in phrase.iter().cloned() {
            let instrument = self.instrument.clone();
            let duration = self.note_duration;
            self.queue.enqueue_named(format!("play-{note}"), move |signal| async move {
                if !instrument.play(&note, duration, &signal).await? {
                    debug!("note {note} superseded");
                }
                Ok(())
            });
            enqueued += 1;
        }

        enqueued
    }

    /// Abandon the running and queued work and enqueue a new phrase
    pub fn supersede(&self, phrase: &[String]) -> usize {
        self.queue.clear();
        self.play_phrase(phrase)
    }

    /// Drain the queue
    pub async fn run(&self) -> Result<(), TaskQueueError> {
        self.queue.run().await
    }

    /// Spawn a task logging every status change of the queue
    ///
    /// The task exits once every handle to the queue is dropped
    pub fn spawn_status_logger(&self) -> JoinHandle<()> {
        let mut status_rx = self.queue.subscribe();
        tokio::spawn(async move {
            while status_rx.changed().await.is_ok() {
                let status = status_rx.borrow_and_update().clone();
                match serde_json::to_string(&status) {
                    Ok(json) => debug!("queue status: {json}"),
                    Err(e) => warn!("error serializing queue status: {e}"),
                }
            }
        })
    }

    /// Abandon all work and release the instrument
    pub fn shutdown(&self) {
        self.queue.clear();
        self.instrument.shutdown();
    }
}
