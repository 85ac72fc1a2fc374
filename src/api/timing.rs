//! Timing conversion functions
//!
//! Thin wrappers over `crate::timing`. Tick and sample counts are returned
//! as JS numbers.

use wasm_bindgen::prelude::*;

use super::helpers::serialize;
use crate::timing::{self, TimingContext};

#[wasm_bindgen(js_name = pixelsToFlicks)]
pub fn pixels_to_flicks(pixels: f64, pixels_per_beat: f64, tempo: f64) -> f64 {
    timing::pixels_to_flicks(pixels, pixels_per_beat, tempo)
}

#[wasm_bindgen(js_name = pixelsToSeconds)]
pub fn pixels_to_seconds(pixels: f64, pixels_per_beat: f64, tempo: f64) -> f64 {
    timing::pixels_to_seconds(pixels, pixels_per_beat, tempo)
}

#[wasm_bindgen(js_name = pixelsToBeats)]
pub fn pixels_to_beats(pixels: f64, pixels_per_beat: f64) -> f64 {
    timing::pixels_to_beats(pixels, pixels_per_beat)
}

#[wasm_bindgen(js_name = pixelsToTicks)]
pub fn pixels_to_ticks(pixels: f64, pixels_per_beat: f64, ppqn: u32) -> f64 {
    timing::pixels_to_ticks(pixels, pixels_per_beat, ppqn) as f64
}

#[wasm_bindgen(js_name = pixelsToSamples)]
pub fn pixels_to_samples(pixels: f64, pixels_per_beat: f64, tempo: f64, sample_rate: u32) -> f64 {
    timing::pixels_to_samples(pixels, pixels_per_beat, tempo, sample_rate) as f64
}

/// All timing units for one pixel value, as
/// `{pixels, flicks, seconds, beats, ticks, samples}`
#[wasm_bindgen(js_name = computeAllTiming)]
pub fn compute_all_timing(
    pixels: f64,
    pixels_per_beat: f64,
    tempo: f64,
    sample_rate: u32,
    ppqn: u32,
) -> Result<JsValue, JsValue> {
    let ctx = TimingContext::new(pixels_per_beat, tempo)
        .with_sample_rate(sample_rate)
        .with_ppqn(ppqn);
    serialize(&timing::compute_all(pixels, &ctx), "Failed to serialize timing data")
}

#[wasm_bindgen(js_name = generateNoteId)]
pub fn generate_note_id() -> String {
    timing::generate_note_id()
}
