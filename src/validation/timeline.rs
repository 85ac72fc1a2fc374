//! Whole-payload validation

use serde_json::{Map, Value};

use super::note::{is_integer, note_errors};
use super::ValidationResult;

const REQUIRED_FIELDS: [&str; 5] = ["notes", "tempo", "timeSignature", "editMode", "snapSetting"];

/// Validate a piano roll payload
///
/// Order: required fields, each note (prefixed `Note {i}: `), tempo, then
/// the time signature.
pub fn validate_timeline(data: &Value) -> ValidationResult {
    let Some(map) = data.as_object() else {
        return ValidationResult::failure(vec!["Piano roll data must be an object".to_string()]);
    };

    let mut errors: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !map.contains_key(**field))
        .map(|field| format!("Required field '{}' is missing", field))
        .collect();

    errors.extend(notes_errors(map));
    errors.extend(tempo_errors(map));
    errors.extend(time_signature_errors(map));

    ValidationResult::from_errors(errors)
}

fn notes_errors(data: &Map<String, Value>) -> Vec<String> {
    let Some(notes) = data.get("notes") else {
        return Vec::new();
    };
    let Some(notes) = notes.as_array() else {
        return vec!["'notes' must be a list".to_string()];
    };

    notes
        .iter()
        .enumerate()
        .flat_map(|(i, note)| {
            let errors = match note.as_object() {
                Some(map) => note_errors(map),
                None => vec!["Note data must be an object".to_string()],
            };
            errors.into_iter().map(move |e| format!("Note {}: {}", i, e))
        })
        .collect()
}

fn tempo_errors(data: &Map<String, Value>) -> Vec<String> {
    match data.get("tempo") {
        Some(tempo) if !tempo.as_f64().is_some_and(|t| t > 0.0) => {
            vec!["'tempo' must be a positive number".to_string()]
        }
        _ => Vec::new(),
    }
}

fn time_signature_errors(data: &Map<String, Value>) -> Vec<String> {
    let Some(ts) = data.get("timeSignature") else {
        return Vec::new();
    };
    let Some(ts) = ts.as_object() else {
        return vec!["'timeSignature' must be an object".to_string()];
    };

    ["numerator", "denominator"]
        .iter()
        .filter(|part| !ts.get(**part).is_some_and(is_positive_integer))
        .map(|part| format!("'timeSignature.{}' must be a positive integer", part))
        .collect()
}

fn is_positive_integer(value: &Value) -> bool {
    is_integer(value) && value.as_f64().is_some_and(|n| n > 0.0)
}
