//! Curve and segment overlays attached to a timeline
//!
//! Curves share the notes' horizontal pixel axis. Segments are labeled
//! intervals in seconds. Neither is checked against the notes.
//!
//! The typed forms describe what this crate produces. A timeline stores its
//! overlays as raw JSON so frontend-authored entries pass through unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::serde_helpers::{default_curve_color, default_line_width, default_y_max};
use super::timeline::Timeline;
use crate::error::Result;

/// One point of a curve, in pixels
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct CurvePoint {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl CurvePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A named line layer drawn over the piano roll (f0, loudness, voicing...)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Curve {
    #[serde(default = "default_curve_color")]
    pub color: String,

    #[serde(default = "default_line_width")]
    pub line_width: f64,

    /// Vertical pixel range the curve occupies
    #[serde(default)]
    pub y_min: f64,
    #[serde(default = "default_y_max")]
    pub y_max: f64,

    /// e.g. "overlay"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    /// "piano_grid" (y follows pitch rows) or "independent_range"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    #[serde(default)]
    pub data: Vec<CurvePoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Pre-conversion bounds for legends; carried through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_range: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Curve {
    /// A visible curve with the given color and points, default geometry
    pub fn new(color: impl Into<String>, data: Vec<CurvePoint>) -> Self {
        Self {
            color: color.into(),
            line_width: default_line_width(),
            y_min: 0.0,
            y_max: default_y_max(),
            position: None,
            render_mode: None,
            visible: None,
            opacity: None,
            data,
            data_type: None,
            unit: None,
            original_range: None,
        }
    }
}

/// Labeled time interval in seconds (phoneme, word, voiced region...)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Segment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Free-form label: a phoneme, a word, an energy level...
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Segment {
    pub fn new(start: f64, end: f64, kind: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            start,
            end,
            kind: kind.into(),
            value: value.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Backend-owned payload merged into outgoing timelines
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct OverlayData {
    /// Base64 data URI or external URL
    pub audio_data: Option<String>,
    pub curve_data: BTreeMap<String, Curve>,
    pub segment_data: Vec<Segment>,
    pub use_backend_audio: bool,
}

impl OverlayData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_audio(&mut self, audio_data: impl Into<String>) {
        self.audio_data = Some(audio_data.into());
    }

    /// Add a curve, replacing any curve already stored under `name`
    pub fn add_curve(&mut self, name: impl Into<String>, curve: Curve) {
        self.curve_data.insert(name.into(), curve);
    }

    /// Remove a curve; unknown names are ignored
    pub fn remove_curve(&mut self, name: &str) {
        self.curve_data.remove(name);
    }

    pub fn add_segment(&mut self, segment: Segment) {
        self.segment_data.push(segment);
    }

    pub fn clear_segments(&mut self) {
        self.segment_data.clear();
    }

    pub fn enable_backend_audio(&mut self, enable: bool) {
        self.use_backend_audio = enable;
    }

    /// Whether audio, curves or segments are present.
    /// The backend-audio flag alone does not count.
    pub fn has_data(&self) -> bool {
        self.audio_data.is_some() || !self.curve_data.is_empty() || !self.segment_data.is_empty()
    }

    /// Write this overlay into `timeline`, replacing its overlay fields
    ///
    /// Empty collections are written as absent fields rather than empty values.
    pub fn apply_to(&self, timeline: &mut Timeline) -> Result<()> {
        timeline.audio_data = self.audio_data.clone();
        timeline.curve_data = if self.curve_data.is_empty() {
            None
        } else {
            Some(curve_map(&self.curve_data)?)
        };
        timeline.segment_data = if self.segment_data.is_empty() {
            None
        } else {
            Some(
                self.segment_data
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<serde_json::Result<Vec<_>>>()?,
            )
        };
        timeline.use_backend_audio = Some(self.use_backend_audio);
        Ok(())
    }
}

/// Named curves in the raw form a timeline carries
pub fn curve_map(curves: &BTreeMap<String, Curve>) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for (name, curve) in curves {
        map.insert(name.clone(), serde_json::to_value(curve)?);
    }
    Ok(map)
}
