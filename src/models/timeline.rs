//! Timeline document: notes plus global musical settings
//!
//! `Timeline::from_value` is the decoding layer for untrusted boundary
//! payloads. It never fails: missing or mistyped fields fall back to their
//! defaults, and a note map that cannot be decoded at all is dropped with a
//! warning. Optional payloads (`curve_data`, `line_data`, `segment_data`,
//! `waveform_data`) belong to the frontend and are carried as raw JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::defaults::*;
use super::note::{Note, NoteRecord};
use super::serde_helpers::{get_f64, get_string, get_u32, is_blank};
use crate::error::Result;
use crate::timing::{generate_note_id, TimingContext};
use crate::validation::{self, ValidationResult};

/// Time signature (numerator/denominator), 4/4 by default
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl TimeSignature {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self { numerator, denominator }
    }

    fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(map) => Self {
                numerator: get_u32(map, "numerator").unwrap_or(DEFAULT_TIME_SIGNATURE_NUMERATOR),
                denominator: get_u32(map, "denominator")
                    .unwrap_or(DEFAULT_TIME_SIGNATURE_DENOMINATOR),
            },
            None => Self::default(),
        }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SIGNATURE_NUMERATOR, DEFAULT_TIME_SIGNATURE_DENOMINATOR)
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// The piano roll document exchanged with the widget
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Notes in display order; overlaps are allowed
    pub notes: Vec<NoteRecord>,

    /// Beats per minute
    pub tempo: f64,

    pub time_signature: TimeSignature,

    /// Opaque editor mode label ("select", "draw", "erase", ...)
    pub edit_mode: String,

    /// Opaque snap granularity label ("1/4", "1/8", ...)
    pub snap_setting: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixels_per_beat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ppqn: Option<u32>,

    #[serde(rename = "audio_data", skip_serializing_if = "Option::is_none")]
    pub audio_data: Option<String>,
    #[serde(rename = "curve_data", skip_serializing_if = "Option::is_none")]
    pub curve_data: Option<Map<String, Value>>,
    #[serde(rename = "segment_data", skip_serializing_if = "Option::is_none")]
    pub segment_data: Option<Vec<Value>>,
    #[serde(rename = "line_data", skip_serializing_if = "Option::is_none")]
    pub line_data: Option<Map<String, Value>>,
    #[serde(rename = "use_backend_audio", skip_serializing_if = "Option::is_none")]
    pub use_backend_audio: Option<bool>,
    #[serde(rename = "waveform_data", skip_serializing_if = "Option::is_none")]
    pub waveform_data: Option<Vec<Value>>,
}

impl Default for Timeline {
    /// Empty timeline with required fields only
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            tempo: DEFAULT_TEMPO,
            time_signature: TimeSignature::default(),
            edit_mode: DEFAULT_EDIT_MODE.to_string(),
            snap_setting: DEFAULT_SNAP_SETTING.to_string(),
            pixels_per_beat: None,
            sample_rate: None,
            ppqn: None,
            audio_data: None,
            curve_data: None,
            segment_data: None,
            line_data: None,
            use_backend_audio: None,
            waveform_data: None,
        }
    }
}

impl Timeline {
    /// The neutral timeline: no notes, required fields only
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fresh timeline with no notes and every default filled in
    pub fn create_default() -> Self {
        Self {
            pixels_per_beat: Some(DEFAULT_PIXELS_PER_BEAT),
            sample_rate: Some(DEFAULT_SAMPLE_RATE),
            ppqn: Some(DEFAULT_PPQN),
            ..Self::default()
        }
    }

    /// Decode a boundary payload. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            if !value.is_null() {
                log::warn!("Piano roll payload is not an object, using defaults");
            }
            return Self::default();
        };

        let notes = map
            .get("notes")
            .and_then(Value::as_array)
            .map(|items| decode_notes(items))
            .unwrap_or_default();

        Self {
            notes,
            tempo: get_f64(map, "tempo").unwrap_or(DEFAULT_TEMPO),
            time_signature: map
                .get("timeSignature")
                .map(TimeSignature::from_value)
                .unwrap_or_default(),
            edit_mode: get_string(map, "editMode").unwrap_or_else(|| DEFAULT_EDIT_MODE.to_string()),
            snap_setting: get_string(map, "snapSetting")
                .unwrap_or_else(|| DEFAULT_SNAP_SETTING.to_string()),
            pixels_per_beat: get_f64(map, "pixelsPerBeat"),
            sample_rate: get_u32(map, "sampleRate"),
            ppqn: get_u32(map, "ppqn"),
            audio_data: get_string(map, "audio_data"),
            curve_data: map.get("curve_data").and_then(Value::as_object).cloned(),
            segment_data: map.get("segment_data").and_then(Value::as_array).cloned(),
            line_data: map.get("line_data").and_then(Value::as_object).cloned(),
            use_backend_audio: map.get("use_backend_audio").and_then(Value::as_bool),
            waveform_data: map.get("waveform_data").and_then(Value::as_array).cloned(),
        }
    }

    /// Canonical outgoing JSON
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Normalized copy: every default set, unset optional payloads left out
    ///
    /// Idempotent.
    pub fn clean(&self) -> Self {
        Self {
            pixels_per_beat: Some(self.pixels_per_beat.unwrap_or(DEFAULT_PIXELS_PER_BEAT)),
            sample_rate: Some(self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)),
            ppqn: Some(self.ppqn.unwrap_or(DEFAULT_PPQN)),
            ..self.clone()
        }
    }

    /// Validate the serialized form of this timeline
    pub fn validate(&self) -> ValidationResult {
        match self.to_value() {
            Ok(value) => validation::validate_timeline(&value),
            Err(e) => ValidationResult::failure(vec![e.to_string()]),
        }
    }

    /// Timing context implied by this timeline's settings
    pub fn timing_context(&self) -> TimingContext {
        TimingContext {
            pixels_per_beat: self.pixels_per_beat.unwrap_or(DEFAULT_PIXELS_PER_BEAT),
            tempo: self.tempo,
            sample_rate: self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE),
            ppqn: self.ppqn.unwrap_or(DEFAULT_PPQN),
        }
    }

    /// Notes as entities bound to this timeline's context
    pub fn notes_as_entities(&self) -> Vec<Note> {
        let ctx = self.timing_context();
        self.notes.iter().map(|r| Note::from_record(r, ctx)).collect()
    }

    /// Recompute every note's derived timing from its pixel values
    pub fn refresh_timing(&mut self) {
        self.notes = self.notes_as_entities().iter().map(Note::to_record).collect();
    }

    /// Append a note, re-expressed in this timeline's context
    pub fn add_note(&mut self, note: &Note) {
        let mut note = note.clone();
        note.context = self.timing_context();
        self.notes.push(note.to_record());
    }

    /// Remove the first note with `id`
    pub fn remove_note(&mut self, id: &str) -> Option<NoteRecord> {
        let index = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(index))
    }

    pub fn find_note(&self, id: &str) -> Option<Note> {
        self.notes
            .iter()
            .find(|n| n.id == id)
            .map(|r| Note::from_record(r, self.timing_context()))
    }

    /// Pixel x-coordinate where the last note ends (0 when empty)
    pub fn duration_pixels(&self) -> f64 {
        self.notes
            .iter()
            .map(|n| n.start + n.duration)
            .fold(0.0, f64::max)
    }

    /// Give every note with an empty id a generated one
    ///
    /// Returns how many ids were assigned. Order and other fields are untouched.
    pub fn ensure_note_ids(&mut self) -> usize {
        let mut assigned = 0;
        for note in self.notes.iter_mut().filter(|n| n.id.is_empty()) {
            note.id = generate_note_id();
            assigned += 1;
        }
        if assigned > 0 {
            log::debug!("Auto-generated IDs for {} notes", assigned);
        }
        assigned
    }
}

/// Clean a raw boundary payload into a canonical timeline
///
/// Null, empty and non-object payloads yield `Timeline::create_default()`.
pub fn clean_piano_roll_data(value: &Value) -> Timeline {
    if is_blank(value) || !value.is_object() {
        return Timeline::create_default();
    }
    Timeline::from_value(value).clean()
}

/// `Timeline::ensure_note_ids` for a raw payload
///
/// A note's id counts as absent when missing, null or an empty string.
pub fn ensure_note_ids_value(value: &mut Value) -> usize {
    let Some(notes) = value.get_mut("notes").and_then(Value::as_array_mut) else {
        return 0;
    };

    let mut assigned = 0;
    for note in notes.iter_mut().filter_map(Value::as_object_mut) {
        let missing = match note.get("id") {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        if missing {
            note.insert("id".to_string(), Value::String(generate_note_id()));
            assigned += 1;
        }
    }
    if assigned > 0 {
        log::debug!("Auto-generated IDs for {} notes", assigned);
    }
    assigned
}

fn decode_notes(items: &[Value]) -> Vec<NoteRecord> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match NoteRecord::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Dropping note {}: {}", i, e);
                None
            }
        })
        .collect()
}
