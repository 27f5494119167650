//! Validation of a parsed config

use crate::cli::PlayerConfig;

/// The highest octave on a standard piano keyboard
const MAX_OCTAVE: u8 = 8;

/// Validate a parsed config
pub(crate) fn validate_config(config: &PlayerConfig) -> Result<(), String> {
    if config.instrument.is_empty() {
        return Err("instrument name must not be empty".to_string());
    }

    if config.phrase.is_empty() {
        return Err("phrase must contain at least one note".to_string());
    }

    if config.note_duration.is_zero() {
        return Err("note duration must be positive".to_string());
    }

    let empty_supersession = config.supersession.as_ref().is_some_and(|s| s.phrase.is_empty());
    if empty_supersession {
        return Err("superseding phrase must contain at least one note".to_string());
    }

    Ok(())
}

/// Validate a scientific pitch name, e.g. `C4`, `F#3`, or `Bb5`
pub(crate) fn validate_note_name(note: &str) -> Result<(), String> {
    let invalid = || format!("invalid note name: {note}");

    let mut chars = note.chars();
    let letter = chars.next().ok_or_else(invalid)?;
    if !matches!(letter.to_ascii_uppercase(), 'A'..='G') {
        return Err(invalid());
    }

    let rest = chars.as_str();
    let octave = rest.strip_prefix(['#', 'b']).unwrap_or(rest);
    if octave.is_empty() || !octave.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    match octave.parse::<u8>() {
        Ok(octave) if octave <= MAX_OCTAVE => Ok(()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod test {
    use super::validate_note_name;

    /// Tests valid and invalid note names
    #[test]
    fn test_note_names() {
        for note in ["C4", "F#3", "Bb5", "a0", "C8"] {
            assert!(validate_note_name(note).is_ok(), "{note} should be valid");
        }

        for note in ["", "H4", "C", "C#", "C9", "C##4", "4C", "C+4"] {
            assert!(validate_note_name(note).is_err(), "{note} should be invalid");
        }
    }
}
