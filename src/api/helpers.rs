//! Shared helpers for WASM API operations
//!
//! This module contains common patterns for moving values across the JS
//! boundary and turning crate errors into `JsValue`s.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| js_error(format!("{}: {}", error_context, e)))
}

/// Serialize a value to JavaScript with automatic error handling
///
/// Maps become plain JS objects rather than `Map`s.
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| js_error(format!("{}: {}", error_context, e)))
}

/// Read an untyped payload; `undefined` and `null` both become JSON null
pub fn to_json(value: JsValue, error_context: &str) -> Result<serde_json::Value, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(serde_json::Value::Null);
    }
    deserialize(value, error_context)
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Log an error message and convert it to a JsValue
pub fn js_error(msg: impl Into<String>) -> JsValue {
    let msg = msg.into();
    log::error!("{}", msg);
    JsValue::from_str(&msg)
}

/// Convert a crate error to a JsValue
pub fn from_crate_error(err: crate::error::PianoRollError) -> JsValue {
    js_error(err.to_string())
}
