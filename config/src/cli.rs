//! The player CLI and config definitions

use std::time::Duration;

use clap::Parser;
use util::telemetry::{LevelFilter, LogFormat};

// -------
// | CLI |
// -------

/// Defines the player command line interface
#[derive(Debug, Parser)]
#[clap(author, about, long_about = None, args_override_self = true)]
#[rustfmt::skip]
pub struct Cli {
    // ---------------
    // | Config File |
    // ---------------
    /// A TOML config file to read options from
    ///
    /// Keys are the long option names, e.g. `note-duration-ms = 200`
    #[clap(long, value_parser)]
    pub config_file: Option<String>,

    // --------------------
    // | Playback Configs |
    // --------------------

    /// The name of the simulated instrument
    #[clap(long, value_parser, default_value = "splendid-grand-piano", env = "PIANO_INSTRUMENT")]
    pub instrument: String,
    /// The phrase to play, as note names separated by commas or spaces
    #[clap(long, value_parser, default_value = "C4,E4,G4,C5")]
    pub phrase: String,
    /// How long each note is held, in milliseconds
    #[clap(long, value_parser, default_value = "250")]
    pub note_duration_ms: u64,
    /// The simulated latency of loading the instrument's samples, in milliseconds
    #[clap(long, value_parser, default_value = "500", env = "PIANO_LOAD_LATENCY_MS")]
    pub load_latency_ms: u64,

    // ------------------------
    // | Supersession Configs |
    // ------------------------

    /// If set, abandon the phrase this many milliseconds after starting and play
    /// `--supersede-phrase` instead
    #[clap(long, value_parser, requires = "supersede_phrase")]
    pub supersede_after_ms: Option<u64>,
    /// The phrase that replaces the original one
    #[clap(long, value_parser)]
    pub supersede_phrase: Option<String>,

    // -------------------
    // | Logging Configs |
    // -------------------

    /// The maximum level of emitted logs; `RUST_LOG` directives take precedence
    #[clap(long, value_parser, default_value = "info", env = "PIANO_LOG_LEVEL")]
    pub log_level: String,
    /// Emit logs as JSON rather than in a human readable format
    #[clap(long, value_parser)]
    pub json_logs: bool,
}

// ----------
// | Config |
// ----------

/// A replacement phrase, played after abandoning the original
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Supersession {
    /// The delay after which the original phrase is abandoned
    pub after: Duration,
    /// The notes of the replacement phrase
    pub phrase: Vec<String>,
}

/// Defines the parsed config of the player
#[derive(Clone, Debug)]
pub struct PlayerConfig {
    /// The name of the simulated instrument
    pub instrument: String,
    /// The notes to play, in order
    pub phrase: Vec<String>,
    /// How long each note is held
    pub note_duration: Duration,
    /// The simulated sample loading latency
    pub load_latency: Duration,
    /// The phrase to supersede the original one with, if any
    pub supersession: Option<Supersession>,
    /// The maximum level of emitted logs
    pub log_level: LevelFilter,
    /// The format of emitted logs
    pub log_format: LogFormat,
}
