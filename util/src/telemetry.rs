//! Defines helpers for logging

use std::{error::Error, fmt::Display};

pub use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::err_str;

/// Possible errors that occur when setting up logging
#[derive(Debug)]
pub enum TelemetrySetupError {
    /// A global subscriber has already been installed
    AlreadyInitialized(String),
}

impl Error for TelemetrySetupError {}
impl Display for TelemetrySetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The output format of emitted log lines
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, multi-line output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Install a global subscriber emitting events at or above `level`
///
/// Directives in `RUST_LOG` take precedence over the given level
pub fn configure_logging(level: LevelFilter, format: LogFormat) -> Result<(), TelemetrySetupError> {
    let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .try_init()
        .map_err(err_str!(TelemetrySetupError::AlreadyInitialized))
}
