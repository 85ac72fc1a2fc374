//! Note entity and its wire record
//!
//! A `Note` stores its position and length in pixels together with the
//! `TimingContext` they are measured in. Every other timing unit is derived
//! on read, so a note can never carry stale timing after a mutation.
//!
//! `NoteRecord` is the flat form exchanged with the frontend. It repeats all
//! ten derived timing fields for consumers, but those fields are never read
//! back: `Note::from_record` recomputes them from the pixel values, and
//! `NoteRecord::from_value` does not decode them at all.

use serde::{Deserialize, Serialize};

use super::defaults::{DEFAULT_VELOCITY, MIDI_MAX};
use super::serde_helpers::{default_velocity, string_or_empty, string_or_none};
use crate::error::{PianoRollError, Result};
use crate::timing::{self, generate_note_id, ContextUpdate, TimingContext};

/// Flat note record as serialized across the widget boundary
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    /// Opaque identifier (empty when the payload had none)
    #[serde(default)]
    pub id: String,

    /// Start position in pixels
    pub start: f64,

    /// Duration in pixels
    pub duration: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_flicks: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_flicks: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_beats: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_beats: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_ticks: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ticks: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_sample: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_samples: Option<i64>,

    /// MIDI note number (0-127)
    pub pitch: i32,

    /// MIDI velocity (0-127)
    #[serde(default = "default_velocity")]
    pub velocity: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyric: Option<String>,

    /// Phonetic transcription for G2P / TTS alignment tooling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phoneme: Option<String>,
}

impl NoteRecord {
    /// A bare record with only the pixel/pitch fields set
    pub fn new(start: f64, duration: f64, pitch: i32) -> Self {
        Self {
            id: String::new(),
            start,
            duration,
            start_flicks: None,
            duration_flicks: None,
            start_seconds: None,
            duration_seconds: None,
            end_seconds: None,
            start_beats: None,
            duration_beats: None,
            start_ticks: None,
            duration_ticks: None,
            start_sample: None,
            duration_samples: None,
            pitch,
            velocity: DEFAULT_VELOCITY,
            lyric: None,
            phoneme: None,
        }
    }

    /// Decode a boundary note map
    ///
    /// Only the source fields are read. Derived timing in the input is
    /// skipped whatever its type, and a non-string id reads as empty.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let input = NoteInput::deserialize(value)?;
        Ok(Self {
            id: input.id,
            velocity: input.velocity,
            lyric: input.lyric,
            phoneme: input.phoneme,
            ..Self::new(input.start, input.duration, input.pitch)
        })
    }

    /// Whether every derived timing field is populated
    pub fn has_timing(&self) -> bool {
        self.start_flicks.is_some()
            && self.duration_flicks.is_some()
            && self.start_seconds.is_some()
            && self.duration_seconds.is_some()
            && self.end_seconds.is_some()
            && self.start_beats.is_some()
            && self.duration_beats.is_some()
            && self.start_ticks.is_some()
            && self.duration_ticks.is_some()
            && self.start_sample.is_some()
            && self.duration_samples.is_some()
    }
}

/// Source fields of an incoming note; everything else is ignored
#[derive(Deserialize)]
struct NoteInput {
    #[serde(default, deserialize_with = "string_or_empty")]
    id: String,
    start: f64,
    duration: f64,
    pitch: i32,
    #[serde(default = "default_velocity")]
    velocity: i32,
    #[serde(default, deserialize_with = "string_or_none")]
    lyric: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    phoneme: Option<String>,
}

/// A single note with pixel coordinates and a timing context
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: String,

    /// Start position in pixels
    pub start: f64,

    /// Duration in pixels
    pub duration: f64,

    /// MIDI note number; kept signed so out-of-range input stays visible to validation
    pub pitch: i32,

    pub velocity: i32,
    pub lyric: Option<String>,
    pub phoneme: Option<String>,

    /// Context all derived timing is computed in
    pub context: TimingContext,
}

impl Note {
    /// Create a note. Never fails; validation is a separate step.
    pub fn new(start: f64, duration: f64, pitch: i32, context: TimingContext) -> Self {
        Self {
            id: generate_note_id(),
            start,
            duration,
            pitch,
            velocity: DEFAULT_VELOCITY,
            lyric: None,
            phoneme: None,
            context,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_velocity(mut self, velocity: i32) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_lyric(mut self, lyric: impl Into<String>) -> Self {
        self.lyric = Some(lyric.into());
        self
    }

    pub fn with_phoneme(mut self, phoneme: impl Into<String>) -> Self {
        self.phoneme = Some(phoneme.into());
        self
    }

    // ------------------------------------------------------------------
    // Derived timing
    // ------------------------------------------------------------------

    pub fn start_flicks(&self) -> f64 {
        timing::pixels_to_flicks(self.start, self.context.pixels_per_beat, self.context.tempo)
    }

    pub fn duration_flicks(&self) -> f64 {
        timing::pixels_to_flicks(self.duration, self.context.pixels_per_beat, self.context.tempo)
    }

    pub fn start_seconds(&self) -> f64 {
        timing::pixels_to_seconds(self.start, self.context.pixels_per_beat, self.context.tempo)
    }

    pub fn duration_seconds(&self) -> f64 {
        timing::pixels_to_seconds(self.duration, self.context.pixels_per_beat, self.context.tempo)
    }

    /// `start_seconds + duration_seconds`
    pub fn end_seconds(&self) -> f64 {
        self.start_seconds() + self.duration_seconds()
    }

    pub fn start_beats(&self) -> f64 {
        timing::pixels_to_beats(self.start, self.context.pixels_per_beat)
    }

    pub fn duration_beats(&self) -> f64 {
        timing::pixels_to_beats(self.duration, self.context.pixels_per_beat)
    }

    pub fn start_ticks(&self) -> i64 {
        timing::pixels_to_ticks(self.start, self.context.pixels_per_beat, self.context.ppqn)
    }

    pub fn duration_ticks(&self) -> i64 {
        timing::pixels_to_ticks(self.duration, self.context.pixels_per_beat, self.context.ppqn)
    }

    pub fn start_samples(&self) -> i64 {
        timing::pixels_to_samples(
            self.start,
            self.context.pixels_per_beat,
            self.context.tempo,
            self.context.sample_rate,
        )
    }

    pub fn duration_samples(&self) -> i64 {
        timing::pixels_to_samples(
            self.duration,
            self.context.pixels_per_beat,
            self.context.tempo,
            self.context.sample_rate,
        )
    }

    /// End position in pixels
    pub fn end_pixels(&self) -> f64 {
        self.start + self.duration
    }

    /// Whether a pixel x-coordinate falls inside this note (end exclusive)
    pub fn contains_pixel(&self, x: f64) -> bool {
        x >= self.start && x < self.end_pixels()
    }

    /// Note name such as "C4" or "A#5" (60 = C4)
    pub fn note_name(&self) -> String {
        const NOTE_NAMES: [&str; 12] = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];

        let pitch = self.pitch.clamp(0, MIDI_MAX);
        let octave = pitch / 12 - 1;
        format!("{}{}", NOTE_NAMES[(pitch % 12) as usize], octave)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Replace the start position (pixels)
    pub fn move_to(&mut self, start: f64) {
        self.start = start;
    }

    /// Replace the duration (pixels)
    pub fn resize(&mut self, duration: f64) {
        self.duration = duration;
    }

    /// Shift pitch by `semitones`, clamped to 0..=127
    pub fn transpose(&mut self, semitones: i32) {
        self.pitch = self.pitch.saturating_add(semitones).clamp(0, MIDI_MAX);
    }

    /// Replace part of the timing context without touching pixel values
    pub fn update_context(&mut self, update: ContextUpdate) {
        self.context = self.context.updated(update);
    }

    // ------------------------------------------------------------------
    // Record conversion
    // ------------------------------------------------------------------

    /// Materialize the full wire record, derived timing included
    pub fn to_record(&self) -> NoteRecord {
        NoteRecord {
            id: self.id.clone(),
            start: self.start,
            duration: self.duration,
            start_flicks: Some(self.start_flicks()),
            duration_flicks: Some(self.duration_flicks()),
            start_seconds: Some(self.start_seconds()),
            duration_seconds: Some(self.duration_seconds()),
            end_seconds: Some(self.end_seconds()),
            start_beats: Some(self.start_beats()),
            duration_beats: Some(self.duration_beats()),
            start_ticks: Some(self.start_ticks()),
            duration_ticks: Some(self.duration_ticks()),
            start_sample: Some(self.start_samples()),
            duration_samples: Some(self.duration_samples()),
            pitch: self.pitch,
            velocity: self.velocity,
            lyric: self.lyric.clone(),
            phoneme: self.phoneme.clone(),
        }
    }

    /// Rebuild a note from a record under `context`
    ///
    /// Derived timing on the record is ignored. An empty id is replaced by a
    /// freshly generated one.
    pub fn from_record(record: &NoteRecord, context: TimingContext) -> Self {
        let id = if record.id.is_empty() {
            generate_note_id()
        } else {
            record.id.clone()
        };

        Self {
            id,
            start: record.start,
            duration: record.duration,
            pitch: record.pitch,
            velocity: record.velocity,
            lyric: record.lyric.clone(),
            phoneme: record.phoneme.clone(),
            context,
        }
    }

    /// Decode an untrusted per-note JSON map
    ///
    /// `start`, `duration` and `pitch` are required; their absence is an
    /// integration error and is returned as `PianoRollError::MissingField`.
    pub fn from_value(value: &serde_json::Value, context: TimingContext) -> Result<Self> {
        for field in ["start", "duration", "pitch"] {
            if value.get(field).map_or(true, serde_json::Value::is_null) {
                return Err(PianoRollError::MissingField(field.to_string()));
            }
        }

        Ok(Self::from_record(&NoteRecord::from_value(value)?, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> TimingContext {
        TimingContext::new(80.0, 120.0)
    }

    #[test]
    fn test_derived_timing() {
        let note = Note::new(160.0, 80.0, 60, ctx());

        assert_eq!(note.start_beats(), 2.0);
        assert_eq!(note.duration_beats(), 1.0);
        assert_eq!(note.start_seconds(), 1.0);
        assert_eq!(note.duration_seconds(), 0.5);
        assert_eq!(note.end_seconds(), 1.5);
        assert_eq!(note.start_ticks(), 960);
        assert_eq!(note.duration_ticks(), 480);
        assert_eq!(note.start_samples(), 44100);
        assert_eq!(note.duration_samples(), 22050);
    }

    #[test]
    fn test_defaults_on_construction() {
        let note = Note::new(0.0, 80.0, 60, ctx());
        assert_eq!(note.velocity, 100);
        assert!(note.id.starts_with("note-"));
        assert_eq!(note.lyric, None);
    }

    #[test]
    fn test_construction_never_validates() {
        let note = Note::new(-5.0, 0.0, 300, ctx()).with_velocity(-1);
        assert_eq!(note.pitch, 300);
        assert_eq!(note.start, -5.0);
    }

    #[test]
    fn test_timing_follows_mutation() {
        let mut note = Note::new(0.0, 80.0, 60, ctx());
        note.move_to(80.0);
        assert_eq!(note.start_seconds(), 0.5);

        note.resize(160.0);
        assert_eq!(note.duration_beats(), 2.0);
        assert_eq!(note.end_seconds(), 1.5);
    }

    #[test]
    fn test_transpose_clamps() {
        let mut note = Note::new(0.0, 80.0, 60, ctx());
        note.transpose(12);
        assert_eq!(note.pitch, 72);
        note.transpose(100);
        assert_eq!(note.pitch, 127);
        note.transpose(-500);
        assert_eq!(note.pitch, 0);
    }

    #[test]
    fn test_update_context_keeps_pixels() {
        let mut note = Note::new(80.0, 80.0, 60, ctx());
        note.update_context(ContextUpdate {
            tempo: Some(60.0),
            ..Default::default()
        });

        assert_eq!(note.start, 80.0);
        assert_eq!(note.start_seconds(), 1.0);
        assert_eq!(note.context.pixels_per_beat, 80.0);
    }

    #[test]
    fn test_record_round_trip() {
        let note = Note::new(123.5, 40.25, 64, ctx())
            .with_velocity(90)
            .with_lyric("la")
            .with_phoneme("l a");
        let record = note.to_record();
        let back = Note::from_record(&record, ctx());

        assert_eq!(back, note);
        assert!(record.has_timing());
        assert_eq!(record.start_seconds, Some(note.start_seconds()));
        assert_eq!(record.duration_samples, Some(note.duration_samples()));
    }

    #[test]
    fn test_from_record_ignores_forged_timing() {
        let mut record = Note::new(80.0, 80.0, 60, ctx()).to_record();
        record.start_seconds = Some(99.0);
        record.start_ticks = Some(-1);

        let note = Note::from_record(&record, ctx());
        assert_eq!(note.start_seconds(), 0.5);
        assert_eq!(note.to_record().start_ticks, Some(480));
    }

    #[test]
    fn test_from_record_generates_missing_id() {
        let record = NoteRecord::new(0.0, 80.0, 60);
        let note = Note::from_record(&record, ctx());
        assert!(note.id.starts_with("note-"));
    }

    #[test]
    fn test_from_value_requires_pitch() {
        let value = json!({"start": 0.0, "duration": 80.0});
        let err = Note::from_value(&value, ctx()).unwrap_err();
        assert!(matches!(err, PianoRollError::MissingField(ref f) if f == "pitch"));
    }

    #[test]
    fn test_from_value_defaults() {
        let value = json!({"start": 0.0, "duration": 80.0, "pitch": 60, "startSeconds": 42.0});
        let note = Note::from_value(&value, ctx()).unwrap();

        assert_eq!(note.velocity, 100);
        assert_eq!(note.lyric, None);
        assert_eq!(note.start_seconds(), 0.0);
    }

    #[test]
    fn test_record_from_value_skips_derived_fields() {
        let value = json!({
            "id": "n1", "start": 160, "duration": 80, "pitch": 60,
            "startTicks": 960.0, "durationSamples": "lots", "startSeconds": null, "endSeconds": [1],
        });
        let record = NoteRecord::from_value(&value).unwrap();

        assert_eq!(record.id, "n1");
        assert_eq!(record.start, 160.0);
        assert!(!record.has_timing());
        assert_eq!(record.start_ticks, None);

        let note = Note::from_value(&value, ctx()).unwrap();
        assert_eq!(note.start_ticks(), 960);
        assert_eq!(note.duration_samples(), 22050);
    }

    #[test]
    fn test_from_value_numeric_id_is_regenerated() {
        let value = json!({"id": 7, "start": 0, "duration": 80, "pitch": 60, "lyric": 3});
        assert_eq!(NoteRecord::from_value(&value).unwrap().id, "");

        let note = Note::from_value(&value, ctx()).unwrap();
        assert!(note.id.starts_with("note-"));
        assert_eq!(note.lyric, None);
    }

    #[test]
    fn test_record_wire_field_names() {
        let record = Note::new(0.0, 80.0, 60, ctx()).with_id("n1").to_record();
        let value = serde_json::to_value(&record).unwrap();

        for key in [
            "id", "start", "duration", "startFlicks", "durationFlicks", "startSeconds",
            "durationSeconds", "endSeconds", "startBeats", "durationBeats", "startTicks",
            "durationTicks", "startSample", "durationSamples", "pitch", "velocity",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert!(value.get("lyric").is_none());
    }

    #[test]
    fn test_note_name() {
        assert_eq!(Note::new(0.0, 1.0, 60, ctx()).note_name(), "C4");
        assert_eq!(Note::new(0.0, 1.0, 69, ctx()).note_name(), "A4");
        assert_eq!(Note::new(0.0, 1.0, 73, ctx()).note_name(), "C#5");
    }

    #[test]
    fn test_contains_pixel() {
        let note = Note::new(80.0, 80.0, 60, ctx());
        assert!(note.contains_pixel(80.0));
        assert!(note.contains_pixel(159.0));
        assert!(!note.contains_pixel(160.0));
        assert!(!note.contains_pixel(79.0));
    }
}
