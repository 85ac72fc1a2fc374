//! Single-note validation

use serde_json::{Map, Value};

use super::ValidationResult;
use crate::models::defaults::MIDI_MAX;

const REQUIRED_FIELDS: [&str; 5] = ["id", "start", "duration", "pitch", "velocity"];

/// Validate one note map
///
/// Checks run in three stages: required fields, value types, then ranges.
/// A range is checked only when the field has the right type.
pub fn validate_note(note: &Value) -> ValidationResult {
    match note.as_object() {
        Some(map) => ValidationResult::from_errors(note_errors(map)),
        None => ValidationResult::failure(vec!["Note data must be an object".to_string()]),
    }
}

pub(crate) fn note_errors(note: &Map<String, Value>) -> Vec<String> {
    let mut errors = required_field_errors(note);
    errors.extend(type_errors(note));
    errors.extend(range_errors(note));
    errors
}

fn required_field_errors(note: &Map<String, Value>) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| !note.contains_key(**field))
        .map(|field| format!("Required field '{}' is missing", field))
        .collect()
}

fn type_errors(note: &Map<String, Value>) -> Vec<String> {
    let mut errors = Vec::new();

    for field in ["start", "duration"] {
        if note.get(field).is_some_and(|v| !v.is_number()) {
            errors.push(format!("'{}' must be a number", field));
        }
    }
    for field in ["pitch", "velocity"] {
        if note.get(field).is_some_and(|v| !is_integer(v)) {
            errors.push(format!("'{}' must be an integer", field));
        }
    }

    errors
}

fn range_errors(note: &Map<String, Value>) -> Vec<String> {
    let mut errors = Vec::new();

    for field in ["pitch", "velocity"] {
        let out_of_range = note
            .get(field)
            .filter(|v| is_integer(v))
            .is_some_and(|v| !v.as_i64().is_some_and(|n| (0..=MIDI_MAX as i64).contains(&n)));
        if out_of_range {
            errors.push(format!("'{}' must be between 0 and {}", field, MIDI_MAX));
        }
    }

    if note.get("start").and_then(Value::as_f64).is_some_and(|s| s < 0.0) {
        errors.push("'start' must be non-negative".to_string());
    }
    if note.get("duration").and_then(Value::as_f64).is_some_and(|d| d <= 0.0) {
        errors.push("'duration' must be positive".to_string());
    }

    errors
}

/// JSON integer (a float such as `60.0` does not count)
pub(crate) fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_note() -> Value {
        json!({"id": "n1", "start": 0.0, "duration": 80.0, "pitch": 60, "velocity": 100})
    }

    #[test]
    fn test_valid_note() {
        let result = validate_note(&valid_note());
        assert!(result.is_valid(), "{:?}", result.errors);
    }

    #[test]
    fn test_exactly_four_missing_fields() {
        let result = validate_note(&json!({"start": 0.0}));
        assert_eq!(
            result.errors,
            vec![
                "Required field 'id' is missing",
                "Required field 'duration' is missing",
                "Required field 'pitch' is missing",
                "Required field 'velocity' is missing",
            ]
        );
    }

    #[test]
    fn test_exactly_four_range_errors() {
        let note = json!({"pitch": 128, "velocity": -1, "start": -5, "duration": 0, "id": "x"});
        let result = validate_note(&note);

        assert_eq!(
            result.errors,
            vec![
                "'pitch' must be between 0 and 127",
                "'velocity' must be between 0 and 127",
                "'start' must be non-negative",
                "'duration' must be positive",
            ]
        );
        assert!(!result.errors.iter().any(|e| e.contains("missing")));
    }

    #[test]
    fn test_type_errors_skip_range_checks() {
        let note = json!({"id": "x", "start": "0", "duration": null, "pitch": 60.5, "velocity": "loud"});
        let result = validate_note(&note);

        assert_eq!(
            result.errors,
            vec![
                "'start' must be a number",
                "'duration' must be a number",
                "'pitch' must be an integer",
                "'velocity' must be an integer",
            ]
        );
    }

    #[test]
    fn test_boundary_values_pass() {
        let note = json!({"id": "x", "start": 0, "duration": 0.001, "pitch": 127, "velocity": 0});
        assert!(validate_note(&note).is_valid());

        let note = json!({"id": "x", "start": 0, "duration": 1, "pitch": 0, "velocity": 127});
        assert!(validate_note(&note).is_valid());
    }

    #[test]
    fn test_huge_pitch_is_out_of_range() {
        let mut note = valid_note();
        note["pitch"] = json!(u64::MAX);
        assert_eq!(validate_note(&note).errors, vec!["'pitch' must be between 0 and 127"]);
    }

    #[test]
    fn test_non_object_note() {
        let result = validate_note(&json!([1, 2]));
        assert_eq!(result.errors, vec!["Note data must be an object"]);
    }
}
