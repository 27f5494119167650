//! Parsing logic for the config

mod config_file;

use std::{env, str::FromStr, time::Duration};

use clap::Parser;
use util::{
    raw_err_str,
    telemetry::{LevelFilter, LogFormat},
};

pub use config_file::parse_config_from_file;
use config_file::config_file_args;

use crate::{
    cli::{Cli, PlayerConfig, Supersession},
    validation::{validate_config, validate_note_name},
};

/// Parses command line args into the player config
///
/// Options may come from both a config file and the command line. The config
/// file's options are placed *before* the command line args so that clap,
/// which lets later occurrences override earlier ones, gives precedence to the
/// command line
pub fn parse_command_line_args() -> Result<PlayerConfig, String> {
    let command_line_args: Vec<String> = env::args().collect();
    parse_args(&command_line_args)
}

/// Parse a config from a full argument list, including the executable name
pub(crate) fn parse_args(command_line_args: &[String]) -> Result<PlayerConfig, String> {
    let config_file_args = config_file_args(command_line_args)?;

    // The first argument is the executable name, keep it first
    let (program, args) =
        command_line_args.split_first().ok_or_else(|| "missing executable name".to_string())?;
    let mut full_args = vec![program.clone()];
    full_args.extend(config_file_args);
    full_args.extend(args.iter().cloned());

    let cli = Cli::try_parse_from(full_args).map_err(|e| e.to_string())?;
    parse_config_from_args(cli)
}

/// Parse the config from a set of command line arguments
///
/// Separating out this functionality allows us to easily inject custom args
/// apart from what is specified on the command line
pub fn parse_config_from_args(cli_args: Cli) -> Result<PlayerConfig, String> {
    let phrase = parse_phrase(&cli_args.phrase)?;
    let supersession = match (cli_args.supersede_after_ms, cli_args.supersede_phrase) {
        (Some(after_ms), Some(phrase)) => Some(Supersession {
            after: Duration::from_millis(after_ms),
            phrase: parse_phrase(&phrase)?,
        }),
        (Some(_), None) => return Err("--supersede-after-ms requires --supersede-phrase".to_string()),
        (None, _) => None,
    };

    let log_level = LevelFilter::from_str(&cli_args.log_level)
        .map_err(raw_err_str!("invalid log level {}: {}", cli_args.log_level))?;
    let log_format = if cli_args.json_logs { LogFormat::Json } else { LogFormat::Pretty };

    let config = PlayerConfig {
        instrument: cli_args.instrument,
        phrase,
        note_duration: Duration::from_millis(cli_args.note_duration_ms),
        load_latency: Duration::from_millis(cli_args.load_latency_ms),
        supersession,
        log_level,
        log_format,
    };

    validate_config(&config)?;
    Ok(config)
}

/// Split a phrase on commas and whitespace into validated note names
fn parse_phrase(phrase: &str) -> Result<Vec<String>, String> {
    phrase
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|note| !note.is_empty())
        .map(|note| validate_note_name(note).map(|_| note.to_string()))
        .collect()
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use clap::Parser;
    use util::telemetry::{LevelFilter, LogFormat};

    use super::{parse_args, parse_config_from_args, parse_phrase};
    use crate::Cli;

    /// Build a CLI from the given flags
    fn cli(flags: &[&str]) -> Cli {
        let args = std::iter::once("piano-queue").chain(flags.iter().copied());
        Cli::parse_from(args)
    }

    /// Tests the default config
    #[test]
    fn test_defaults() {
        let config = parse_config_from_args(cli(&[])).unwrap();

        assert_eq!(config.instrument, "splendid-grand-piano");
        assert_eq!(config.phrase, vec!["C4", "E4", "G4", "C5"]);
        assert_eq!(config.note_duration, Duration::from_millis(250));
        assert_eq!(config.load_latency, Duration::from_millis(500));
        assert!(config.supersession.is_none());
        assert_eq!(config.log_level, LevelFilter::INFO);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    /// Tests that phrases may mix commas and whitespace
    #[test]
    fn test_parse_phrase() {
        let phrase = parse_phrase("C4, D#4  Eb4,,F4").unwrap();
        assert_eq!(phrase, vec!["C4", "D#4", "Eb4", "F4"]);

        assert!(parse_phrase("C4 H4").is_err());
    }

    /// Tests parsing a supersession
    #[test]
    fn test_supersession() {
        let config = parse_config_from_args(cli(&[
            "--supersede-after-ms",
            "300",
            "--supersede-phrase",
            "A3 C4",
            "--json-logs",
            "--log-level",
            "debug",
        ]))
        .unwrap();

        let supersession = config.supersession.unwrap();
        assert_eq!(supersession.after, Duration::from_millis(300));
        assert_eq!(supersession.phrase, vec!["A3", "C4"]);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, LevelFilter::DEBUG);
    }

    /// Tests that a supersession delay without a phrase is rejected by clap
    #[test]
    fn test_supersession_requires_phrase() {
        let res = Cli::try_parse_from(["piano-queue", "--supersede-after-ms", "300"]);
        assert!(res.is_err());
    }

    /// Tests that an empty argument list is an error rather than a panic
    #[test]
    fn test_empty_args() {
        assert!(parse_args(&[]).is_err());
    }

    /// Tests that invalid values are rejected
    #[test]
    fn test_invalid_values() {
        assert!(parse_config_from_args(cli(&["--log-level", "loud"])).is_err());
        assert!(parse_config_from_args(cli(&["--phrase", " , "])).is_err());
        assert!(parse_config_from_args(cli(&["--note-duration-ms", "0"])).is_err());
    }
}
