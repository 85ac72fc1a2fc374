//! WASM build test
//!
//! This module tests that the WASM module can be built and the JS-facing API works.

#![cfg(target_arch = "wasm32")]

use pianoroll_wasm::api::timeline::*;
use pianoroll_wasm::api::timing::*;
use pianoroll_wasm::api::PianoRollWidget;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn to_js(value: &serde_json::Value) -> JsValue {
    pianoroll_wasm::api::helpers::serialize(value, "test").unwrap()
}

fn from_js(value: JsValue) -> serde_json::Value {
    serde_wasm_bindgen::from_value(value).unwrap()
}

#[wasm_bindgen_test]
fn test_timing_functions() {
    assert_eq!(pixels_to_seconds(80.0, 80.0, 120.0), 0.5);
    assert_eq!(pixels_to_ticks(80.0, 80.0, 480), 480.0);
    assert_eq!(pixels_to_samples(160.0, 80.0, 120.0, 44100), 44100.0);

    let all = from_js(compute_all_timing(160.0, 80.0, 120.0, 44100, 480).unwrap());
    assert_eq!(all["seconds"].as_f64(), Some(1.0));
    assert_eq!(all["ticks"].as_f64(), Some(960.0));
}

#[wasm_bindgen_test]
fn test_note_id() {
    assert!(generate_note_id().starts_with("note-"));
}

#[wasm_bindgen_test]
fn test_validation_and_cleaning() {
    let note = to_js(&serde_json::json!({"start": 0}));
    let result = from_js(validate_note_js(note).unwrap());
    assert_eq!(result["errors"].as_array().unwrap().len(), 4);

    let cleaned = from_js(clean_piano_roll_data_js(JsValue::UNDEFINED).unwrap());
    assert_eq!(cleaned["ppqn"].as_f64(), Some(480.0));

    let default = from_js(create_default_piano_roll_data().unwrap());
    assert_eq!(default, cleaned);
}

#[wasm_bindgen_test]
fn test_widget() {
    let mut widget = PianoRollWidget::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    assert!(!widget.has_data());

    widget.enable_backend_audio(true);
    assert!(!widget.has_data());

    widget.set_audio("data:audio/wav;base64,AAAA".to_string());
    assert!(widget.has_data());

    let out = from_js(widget.postprocess(JsValue::NULL).unwrap());
    assert_eq!(out["notes"].as_array().unwrap().len(), 3);
    assert_eq!(out["use_backend_audio"], serde_json::json!(true));

    let example = from_js(widget.example_payload().unwrap());
    assert_eq!(example["notes"].as_array().unwrap().len(), 1);
}

#[wasm_bindgen_test]
fn test_auto_convert() {
    let data = to_js(&serde_json::json!([[60, 0.0, 1.0], [64, 1.0, 1.0]]));
    let out = from_js(auto_convert_js(data, JsValue::UNDEFINED, None).unwrap());
    assert_eq!(out["notes"].as_array().unwrap().len(), 2);
    assert_eq!(out["notes"][1]["start"].as_f64(), Some(160.0));

    let freqs = to_js(&serde_json::json!([440.0]));
    let out = from_js(auto_convert_js(freqs, JsValue::from_str("frequencies"), Some(60.0)).unwrap());
    assert_eq!(out["notes"][0]["pitch"].as_f64(), Some(69.0));
}
