//! The entrypoint to the player
//!
//! Plays a phrase on a simulated instrument through a sequential task queue:
//! the sample load and each note are enqueued as separate tasks. If a
//! supersession is configured, the phrase is abandoned partway through and a
//! replacement phrase is played in its place

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

mod instrument;
mod session;

use config::{Supersession, parse_command_line_args};
use eyre::eyre;
use tokio::{task::JoinHandle, time::sleep};
use tracing::info;
use util::telemetry::configure_logging;

use crate::{
    instrument::{Instrument, InstrumentConfig},
    session::Session,
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let config = parse_command_line_args().map_err(|e| eyre!(e))?;
    configure_logging(config.log_level, config.log_format)?;
    info!("playing {} on {}", config.phrase.join(" "), config.instrument);

    let instrument = Instrument::new(InstrumentConfig {
        name: config.instrument.clone(),
        load_latency: config.load_latency,
    });
    let session = Session::new(instrument, config.note_duration);
    let status_logger = session.spawn_status_logger();

    let enqueued = session.play_phrase(&config.phrase);
    info!("enqueued {enqueued} tasks");

    let supersession = config.supersession.clone().map(|s| spawn_supersession(session.clone(), s));
    session.run().await?;

    // Only one run drains the queue at a time; the replacement phrase is
    // picked up once the first run halts or finishes
    if let Some(handle) = supersession {
        handle.await?;
        session.run().await?;
    }

    info!("played: {}", session.instrument().played_notes().join(" "));
    info!("{} tasks left unplayed", session.queue().len());
    session.shutdown();
    status_logger.abort();

    Ok(())
}

/// Spawn a task that replaces the session's phrase after a delay
fn spawn_supersession(session: Session, supersession: Supersession) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(supersession.after).await;
        info!("superseding phrase with {}", supersession.phrase.join(" "));
        let enqueued = session.supersede(&supersession.phrase);
        info!("enqueued {enqueued} tasks");
    })
}
