//! Validation and normalization of piano roll payloads

use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, from_crate_error, serialize, to_json};
use crate::analysis::analyze_notes;
use crate::converters::{auto_convert, OutputKind};
use crate::models::defaults::DEFAULT_TEMPO;
use crate::models::{clean_piano_roll_data, ensure_note_ids_value, Timeline};
use crate::validation::{validate_note, validate_timeline};

/// Validate one note; returns `{errors, warnings}`
#[wasm_bindgen(js_name = validateNote)]
pub fn validate_note_js(note: JsValue) -> Result<JsValue, JsValue> {
    let note = to_json(note, "Failed to read note")?;
    serialize(&validate_note(&note), "Failed to serialize validation result")
}

/// Validate a whole payload; returns `{errors, warnings}`
#[wasm_bindgen(js_name = validatePianoRollData)]
pub fn validate_piano_roll_data(data: JsValue) -> Result<JsValue, JsValue> {
    let data = to_json(data, "Failed to read piano roll data")?;
    serialize(&validate_timeline(&data), "Failed to serialize validation result")
}

#[wasm_bindgen(js_name = cleanPianoRollData)]
pub fn clean_piano_roll_data_js(data: JsValue) -> Result<JsValue, JsValue> {
    let data = to_json(data, "Failed to read piano roll data")?;
    serialize(&clean_piano_roll_data(&data), "Failed to serialize piano roll data")
}

/// Copy of `data` with every missing note id filled in
#[wasm_bindgen(js_name = ensureNoteIds)]
pub fn ensure_note_ids(data: JsValue) -> Result<JsValue, JsValue> {
    let mut data = to_json(data, "Failed to read piano roll data")?;
    ensure_note_ids_value(&mut data);
    serialize(&data, "Failed to serialize piano roll data")
}

#[wasm_bindgen(js_name = createDefaultPianoRollData)]
pub fn create_default_piano_roll_data() -> Result<JsValue, JsValue> {
    serialize(&Timeline::create_default(), "Failed to serialize piano roll data")
}

/// Note statistics, or `null` for a payload without notes
#[wasm_bindgen(js_name = analyzeNotes)]
pub fn analyze_notes_js(data: JsValue) -> Result<JsValue, JsValue> {
    let data = to_json(data, "Failed to read piano roll data")?;
    serialize(&analyze_notes(&Timeline::from_value(&data)), "Failed to serialize analysis")
}

/// Timeline from model output; `kind` is "auto" (default), "tts",
/// "midi_generation" or "frequencies"
#[wasm_bindgen(js_name = autoConvert)]
pub fn auto_convert_js(data: JsValue, kind: JsValue, tempo: Option<f64>) -> Result<JsValue, JsValue> {
    let data = to_json(data, "Failed to read model output")?;
    let kind: OutputKind = if kind.is_undefined() || kind.is_null() {
        OutputKind::default()
    } else {
        deserialize(kind, "Unknown output kind")?
    };
    let timeline = auto_convert(&data, kind, tempo.unwrap_or(DEFAULT_TEMPO)).map_err(from_crate_error)?;
    serialize(&timeline, "Failed to serialize piano roll data")
}
