//! `PianoRollWidget` class exposed to JavaScript

use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, from_crate_error, serialize, to_json};
use crate::config::ComponentConfig;
use crate::models::{Curve, Segment};
use crate::widget::PianoRollComponent;

#[wasm_bindgen]
pub struct PianoRollWidget {
    inner: PianoRollComponent,
}

#[wasm_bindgen]
impl PianoRollWidget {
    /// Create a widget; `config` and `value` may both be omitted
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, value: JsValue) -> Result<PianoRollWidget, JsValue> {
        let config: ComponentConfig = if config.is_undefined() || config.is_null() {
            ComponentConfig::default()
        } else {
            deserialize(config, "Failed to read widget config")?
        };
        let value = to_json(value, "Failed to read initial value")?;
        let inner = PianoRollComponent::with_value(config, &value).map_err(from_crate_error)?;
        Ok(PianoRollWidget { inner })
    }

    /// Current value held by the widget
    #[wasm_bindgen(js_name = currentValue)]
    pub fn current_value(&self) -> Result<JsValue, JsValue> {
        serialize(self.inner.value(), "Failed to serialize widget value")
    }

    pub fn preprocess(&self, payload: JsValue) -> JsValue {
        payload
    }

    pub fn postprocess(&self, value: JsValue) -> Result<JsValue, JsValue> {
        let value = to_json(value, "Failed to read outgoing value")?;
        let out = self.inner.postprocess(&value).map_err(from_crate_error)?;
        serialize(&out, "Failed to serialize outgoing value")
    }

    #[wasm_bindgen(js_name = setAudio)]
    pub fn set_audio(&mut self, audio_data: String) {
        self.inner.set_audio(audio_data);
    }

    #[wasm_bindgen(js_name = addCurve)]
    pub fn add_curve(&mut self, name: String, curve: JsValue) -> Result<(), JsValue> {
        let curve: Curve = deserialize(curve, "Failed to read curve")?;
        self.inner.add_curve(name, curve);
        Ok(())
    }

    #[wasm_bindgen(js_name = removeCurve)]
    pub fn remove_curve(&mut self, name: &str) {
        self.inner.remove_curve(name);
    }

    #[wasm_bindgen(js_name = addSegment)]
    pub fn add_segment(&mut self, segment: JsValue) -> Result<(), JsValue> {
        let segment: Segment = deserialize(segment, "Failed to read segment")?;
        self.inner.add_segment(segment);
        Ok(())
    }

    #[wasm_bindgen(js_name = clearSegments)]
    pub fn clear_segments(&mut self) {
        self.inner.clear_segments();
    }

    #[wasm_bindgen(js_name = enableBackendAudio)]
    pub fn enable_backend_audio(&mut self, enable: bool) {
        self.inner.enable_backend_audio(enable);
    }

    #[wasm_bindgen(js_name = hasData)]
    pub fn has_data(&self) -> bool {
        self.inner.has_data()
    }

    #[wasm_bindgen(js_name = examplePayload)]
    pub fn example_payload(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.example_payload(), "Failed to serialize example payload")
    }
}
