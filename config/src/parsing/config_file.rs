//! Parsing logic for a separate player config file

use std::fs;

use clap::Parser;
use toml::{Value, map::Map};

use crate::{Cli, PlayerConfig, parsing::parse_config_from_args};

/// The CLI argument name for the config file
const CONFIG_FILE_ARG: &str = "--config-file";

/// Parse args from the config file named on the command line, if any
pub(crate) fn config_file_args(cli_args: &[String]) -> Result<Vec<String>, String> {
    // The path is either the argument following "--config-file" or attached
    // to it as "--config-file=path"
    for (index, arg) in cli_args.iter().enumerate() {
        if arg == CONFIG_FILE_ARG {
            let path = cli_args
                .get(index + 1)
                .ok_or_else(|| format!("{CONFIG_FILE_ARG} requires a path"))?;
            return read_config_file(path);
        }

        if let Some(path) = arg.strip_prefix(CONFIG_FILE_ARG).and_then(|s| s.strip_prefix('=')) {
            return read_config_file(path);
        }
    }

    Ok(vec![])
}

/// Parse a config entirely from a file
pub fn parse_config_from_file(path: &str) -> Result<PlayerConfig, String> {
    let mut file_args = read_config_file(path)?;
    file_args.insert(0, "dummy-program-name".to_string());
    let cli = Cli::try_parse_from(file_args).map_err(|e| e.to_string())?;
    parse_config_from_args(cli)
}

/// Read a config file into a list of CLI-style arguments
fn read_config_file(path: &str) -> Result<Vec<String>, String> {
    let file_contents = fs::read_to_string(path).map_err(|err| err.to_string())?;
    let config_kv_pairs: Map<String, Value> =
        toml::from_str(&file_contents).map_err(|err| err.to_string())?;

    let mut config_file_args: Vec<String> = Vec::with_capacity(config_kv_pairs.len());
    for (toml_key, value) in config_kv_pairs.iter() {
        // Format the TOML key into --key
        let cli_arg = format!("--{}", toml_key);
        let cli_values = parse_toml_value(cli_arg, value)?;
        config_file_args.extend(cli_values);
    }

    Ok(config_file_args)
}

// ----------------
// | TOML Parsing |
// ----------------

/// Parse a toml value into a list of strings to append to the CLI args
fn parse_toml_value(cli_arg: String, val: &Value) -> Result<Vec<String>, String> {
    let values: Vec<String> = match val {
        Value::Boolean(b) => toml_boolean_to_args(cli_arg, *b),
        Value::Array(arr) => toml_array_to_args(cli_arg, arr)?,
        x => vec![cli_arg, toml_value_to_string(x)?],
    };

    Ok(values)
}

/// Parse a toml boolean into a string that is CLI compatible
///
/// This will be "--key" if the boolean is true, otherwise it will be empty
fn toml_boolean_to_args(cli_arg: String, b: bool) -> Vec<String> {
    if b { vec![cli_arg] } else { vec![] }
}

/// Parse a toml array into a single space separated value
///
/// Phrases are the only list-valued options, so `phrase = ["C4", "E4"]` is
/// equivalent to `phrase = "C4 E4"`
fn toml_array_to_args(cli_arg: String, arr: &[Value]) -> Result<Vec<String>, String> {
    let values = arr.iter().map(toml_value_to_string).collect::<Result<Vec<_>, _>>()?;
    Ok(vec![cli_arg, values.join(" ")])
}

/// Helper method to convert a toml value to a string
fn toml_value_to_string(val: &Value) -> Result<String, String> {
    Ok(match val {
        Value::String(val) => val.clone(),
        Value::Integer(val) => format!("{:?}", val),
        Value::Float(val) => format!("{:?}", val),
        Value::Boolean(val) => format!("{:?}", val),
        _ => {
            return Err(format!("unsupported config value: {val}"));
        },
    })
}

#[cfg(test)]
mod test {
    use std::{io::Write, time::Duration};

    use tempfile::NamedTempFile;
    use util::telemetry::LogFormat;

    use super::parse_config_from_file;
    use crate::parsing::parse_args;

    /// Write the given contents to a temporary config file
    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    /// Tests parsing a config entirely from a file
    #[test]
    fn test_parse_from_file() {
        let file = config_file(
            r#"
            phrase = ["D4", "F#4", "A4"]
            note-duration-ms = 120
            json-logs = true
            "#,
        );
        let config = parse_config_from_file(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.phrase, vec!["D4", "F#4", "A4"]);
        assert_eq!(config.note_duration, Duration::from_millis(120));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    /// Tests that command line arguments override the config file
    #[test]
    fn test_command_line_overrides_file() {
        let file = config_file("phrase = \"D4 F#4\"\nnote-duration-ms = 120\n");
        let args = vec![
            "piano-queue".to_string(),
            "--config-file".to_string(),
            file.path().to_str().unwrap().to_string(),
            "--note-duration-ms".to_string(),
            "50".to_string(),
        ];
        let config = parse_args(&args).unwrap();

        assert_eq!(config.phrase, vec!["D4", "F#4"]);
        assert_eq!(config.note_duration, Duration::from_millis(50));
    }

    /// Tests that a config file path attached with `=` is read
    #[test]
    fn test_attached_config_file_path() {
        let file = config_file("phrase = \"G3 B3\"\n");
        let args = vec![
            "piano-queue".to_string(),
            format!("--config-file={}", file.path().to_str().unwrap()),
        ];
        let config = parse_args(&args).unwrap();

        assert_eq!(config.phrase, vec!["G3", "B3"]);
    }

    /// Tests that a dangling config file flag is reported
    #[test]
    fn test_missing_config_file_path() {
        let args = vec!["piano-queue".to_string(), "--config-file".to_string()];
        assert!(parse_args(&args).is_err());
    }

    /// Tests that a false boolean in the file leaves the flag unset
    #[test]
    fn test_false_boolean() {
        let file = config_file("json-logs = false\n");
        let config = parse_config_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    /// Tests that unsupported values and missing files are reported
    #[test]
    fn test_invalid_files() {
        let file = config_file("[instrument]\nname = \"rhodes\"\n");
        assert!(parse_config_from_file(file.path().to_str().unwrap()).is_err());
        assert!(parse_config_from_file("/nonexistent/piano.toml").is_err());
    }
}
