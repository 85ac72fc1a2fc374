//! Musical context used by every pixel conversion

use serde::{Deserialize, Serialize};

use crate::models::defaults::{
    DEFAULT_PIXELS_PER_BEAT, DEFAULT_PPQN, DEFAULT_SAMPLE_RATE, DEFAULT_TEMPO,
};

/// Zoom, tempo, sample rate and MIDI resolution
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingContext {
    /// Horizontal pixels per musical beat (zoom level)
    pub pixels_per_beat: f64,

    /// Beats per minute
    pub tempo: f64,

    /// Audio samples per second
    pub sample_rate: u32,

    /// MIDI pulses per quarter note
    pub ppqn: u32,
}

impl TimingContext {
    /// Create a context with the default sample rate and PPQN
    pub fn new(pixels_per_beat: f64, tempo: f64) -> Self {
        Self {
            pixels_per_beat,
            tempo,
            sample_rate: DEFAULT_SAMPLE_RATE,
            ppqn: DEFAULT_PPQN,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_ppqn(mut self, ppqn: u32) -> Self {
        self.ppqn = ppqn;
        self
    }

    /// Return a copy with the fields present in `update` replaced
    pub fn updated(&self, update: ContextUpdate) -> Self {
        Self {
            pixels_per_beat: update.pixels_per_beat.unwrap_or(self.pixels_per_beat),
            tempo: update.tempo.unwrap_or(self.tempo),
            sample_rate: update.sample_rate.unwrap_or(self.sample_rate),
            ppqn: update.ppqn.unwrap_or(self.ppqn),
        }
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new(DEFAULT_PIXELS_PER_BEAT, DEFAULT_TEMPO)
    }
}

/// Partial replacement of a `TimingContext`
///
/// Used when a note moves between timelines with a different zoom or tempo.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContextUpdate {
    pub pixels_per_beat: Option<f64>,
    pub tempo: Option<f64>,
    pub sample_rate: Option<u32>,
    pub ppqn: Option<u32>,
}
