//! Builders that turn model output into timelines
//!
//! Inputs are in seconds. Every builder lays notes out at the default zoom
//! (80 px per beat) under the given tempo and returns a cleaned timeline
//! whose note records carry full derived timing.

use serde::Deserialize;
use serde_json::Value;

use crate::curves::f0_line_data;
use crate::error::{PianoRollError, Result};
use crate::models::defaults::{DEFAULT_PIXELS_PER_BEAT, DEFAULT_VELOCITY, MIDI_MAX};
use crate::models::{curve_map, Note, Timeline};
use crate::timing::{hz_to_midi, seconds_to_pixels, TimingContext};

/// Pitch used for TTS units without an f0 track (C4)
const DEFAULT_TTS_PITCH: i32 = 60;

/// Frequency assumed for a TTS unit whose f0 frames are all unvoiced
const FALLBACK_F0_HZ: f64 = 220.0;

/// A note as `(pitch, start_seconds, duration_seconds)`
pub type SecondsNote = (i32, f64, f64);

/// One aligned unit of TTS output (word, syllable or phoneme)
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct AlignedUnit {
    pub label: String,
    pub start: f64,
    pub end: f64,
}

impl AlignedUnit {
    pub fn new(label: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }
}

/// One note from a generative MIDI model, timed in seconds
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct GeneratedNote {
    pub pitch: i32,
    pub start: f64,
    pub duration: f64,
    #[serde(default)]
    pub velocity: Option<i32>,
    #[serde(default)]
    pub lyric: Option<String>,
    #[serde(default)]
    pub phoneme: Option<String>,
}

/// Shape of a model output handed to `auto_convert`
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Detect `(pitch, start, duration)` triples or generated note maps
    #[default]
    Auto,
    /// `[{label, start, end}]` alignment
    Tts,
    MidiGeneration,
    /// Frequencies in Hz, one per second
    Frequencies,
}

/// Timeline from untyped model output
///
/// Unrecognized data under `OutputKind::Auto` gives an empty timeline. An
/// explicit kind whose data does not decode is an error.
pub fn auto_convert(data: &Value, kind: OutputKind, tempo: f64) -> Result<Timeline> {
    match kind {
        OutputKind::Auto => {
            let Some(first) = data.as_array().and_then(|items| items.first()) else {
                return Ok(from_notes(&[], tempo, &[]));
            };
            if first.as_array().is_some_and(|triple| triple.len() >= 3) {
                let notes: Vec<SecondsNote> = data
                    .as_array()
                    .map(|items| items.iter().filter_map(seconds_note_from_value).collect())
                    .unwrap_or_default();
                Ok(from_notes(&notes, tempo, &[]))
            } else if first.get("pitch").is_some() {
                let sequence = Vec::<GeneratedNote>::deserialize(data)?;
                Ok(from_midi_generation(&sequence, tempo))
            } else {
                log::debug!("Unrecognized model output, returning an empty timeline");
                Ok(from_notes(&[], tempo, &[]))
            }
        }
        OutputKind::Tts => from_tts_output(&Vec::<AlignedUnit>::deserialize(data)?, None, tempo),
        OutputKind::MidiGeneration => Ok(from_midi_generation(&Vec::<GeneratedNote>::deserialize(data)?, tempo)),
        OutputKind::Frequencies => from_frequencies(&Vec::<f64>::deserialize(data)?, None, None, tempo),
    }
}

/// Timeline from `(pitch, start, duration)` triples, with optional lyrics by index
pub fn from_notes(notes: &[SecondsNote], tempo: f64, lyrics: &[&str]) -> Timeline {
    let ctx = context(tempo);
    let records = notes
        .iter()
        .enumerate()
        .map(|(i, (pitch, start, duration))| {
            let mut note = seconds_note(*pitch, *start, *duration, &ctx);
            if let Some(lyric) = lyrics.get(i) {
                note = note.with_lyric(*lyric);
            }
            note
        })
        .collect();
    build(records, tempo)
}

/// Timeline from MIDI note numbers
///
/// Durations default to one second each, start times to back-to-back
/// one-second slots.
pub fn from_midi_numbers(
    midi_notes: &[i32],
    durations: Option<&[f64]>,
    start_times: Option<&[f64]>,
    tempo: f64,
) -> Result<Timeline> {
    let n = midi_notes.len();
    let durations = durations.map(<[f64]>::to_vec).unwrap_or_else(|| vec![1.0; n]);
    let start_times = start_times
        .map(<[f64]>::to_vec)
        .unwrap_or_else(|| (0..n).map(|i| i as f64).collect());

    for other in [durations.len(), start_times.len()] {
        if other != n {
            return Err(PianoRollError::LengthMismatch { left: n, right: other });
        }
    }

    let notes: Vec<SecondsNote> = midi_notes
        .iter()
        .zip(&start_times)
        .zip(&durations)
        .map(|((pitch, start), duration)| (*pitch, *start, *duration))
        .collect();
    Ok(from_notes(&notes, tempo, &[]))
}

/// Timeline from frequencies in Hz, each rounded to the nearest MIDI note
pub fn from_frequencies(
    frequencies: &[f64],
    durations: Option<&[f64]>,
    start_times: Option<&[f64]>,
    tempo: f64,
) -> Result<Timeline> {
    let midi_notes: Vec<i32> = frequencies.iter().map(|hz| hz_to_midi(*hz).round() as i32).collect();
    from_midi_numbers(&midi_notes, durations, start_times, tempo)
}

/// Timeline from TTS alignment, one lyric note per aligned unit
///
/// With an f0 track, each note's pitch is the mean voiced f0 over the frames
/// covering the unit, assuming the track spans the whole alignment. The
/// track itself is attached as the `"f0_curve"` line layer.
pub fn from_tts_output(alignment: &[AlignedUnit], f0: Option<&[f64]>, tempo: f64) -> Result<Timeline> {
    let ctx = context(tempo);
    let total = alignment.last().map_or(0.0, |unit| unit.end);
    let f0 = f0.filter(|track| !track.is_empty());

    let records = alignment
        .iter()
        .map(|unit| {
            let pitch = match f0 {
                Some(track) => segment_pitch(track, unit, total),
                None => DEFAULT_TTS_PITCH,
            };
            seconds_note(pitch.clamp(0, MIDI_MAX), unit.start, unit.end - unit.start, &ctx)
                .with_lyric(unit.label.clone())
        })
        .collect();

    let mut timeline = build(records, tempo);
    if let Some(track) = f0 {
        timeline.line_data = Some(curve_map(&f0_line_data(track, total, tempo, DEFAULT_PIXELS_PER_BEAT))?);
    }
    Ok(timeline)
}

/// Timeline from a generative model's note list
pub fn from_midi_generation(sequence: &[GeneratedNote], tempo: f64) -> Timeline {
    let ctx = context(tempo);
    let records = sequence
        .iter()
        .map(|generated| {
            let mut note = seconds_note(generated.pitch, generated.start, generated.duration, &ctx)
                .with_velocity(generated.velocity.unwrap_or(DEFAULT_VELOCITY));
            note.lyric = generated.lyric.clone();
            note.phoneme = generated.phoneme.clone();
            note
        })
        .collect();
    build(records, tempo)
}

fn seconds_note_from_value(item: &Value) -> Option<SecondsNote> {
    let triple = item.as_array()?;
    let pitch = i32::try_from(triple.first()?.as_i64()?).ok()?;
    Some((pitch, triple.get(1)?.as_f64()?, triple.get(2)?.as_f64()?))
}

fn context(tempo: f64) -> TimingContext {
    TimingContext::new(DEFAULT_PIXELS_PER_BEAT, tempo)
}

fn seconds_note(pitch: i32, start: f64, duration: f64, ctx: &TimingContext) -> Note {
    Note::new(
        seconds_to_pixels(start, ctx.pixels_per_beat, ctx.tempo),
        seconds_to_pixels(duration, ctx.pixels_per_beat, ctx.tempo),
        pitch,
        *ctx,
    )
}

fn build(notes: Vec<Note>, tempo: f64) -> Timeline {
    Timeline {
        notes: notes.iter().map(Note::to_record).collect(),
        tempo,
        pixels_per_beat: Some(DEFAULT_PIXELS_PER_BEAT),
        ..Timeline::default()
    }
    .clean()
}

fn segment_pitch(f0: &[f64], unit: &AlignedUnit, total: f64) -> i32 {
    let frames = f0.len();
    let frame_at = |seconds: f64| -> usize {
        if total > 0.0 {
            ((seconds * frames as f64 / total) as usize).min(frames)
        } else {
            0
        }
    };
    let (from, to) = (frame_at(unit.start), frame_at(unit.end));

    let voiced: Vec<f64> = f0[from..to.max(from)]
        .iter()
        .copied()
        .filter(|hz| *hz > 0.0)
        .collect();
    let mean_hz = if voiced.is_empty() {
        FALLBACK_F0_HZ
    } else {
        voiced.iter().sum::<f64>() / voiced.len() as f64
    };

    hz_to_midi(mean_hz).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts(timeline: &Timeline) -> Vec<f64> {
        timeline.notes.iter().map(|n| n.start).collect()
    }

    #[test]
    fn test_from_notes_places_in_pixels() {
        let timeline = from_notes(&[(60, 0.0, 1.0), (64, 1.0, 1.0), (67, 2.0, 1.0)], 120.0, &["do", "mi"]);

        assert_eq!(starts(&timeline), vec![0.0, 160.0, 320.0]);
        assert!(timeline.notes.iter().all(|n| n.duration == 160.0));
        assert_eq!(timeline.notes[0].lyric.as_deref(), Some("do"));
        assert_eq!(timeline.notes[1].lyric.as_deref(), Some("mi"));
        assert_eq!(timeline.notes[2].lyric, None);
        assert_eq!(timeline.pixels_per_beat, Some(80.0));
        assert_eq!(timeline.sample_rate, Some(44100));
        assert!(timeline.notes.iter().all(|n| n.has_timing() && n.id.starts_with("note-")));
    }

    #[test]
    fn test_from_notes_respects_tempo() {
        let timeline = from_notes(&[(60, 1.0, 0.5)], 60.0, &[]);
        assert_eq!(timeline.tempo, 60.0);
        assert_eq!(timeline.notes[0].start, 80.0);
        assert_eq!(timeline.notes[0].start_seconds, Some(1.0));
    }

    #[test]
    fn test_from_midi_numbers_sequential_defaults() {
        let timeline = from_midi_numbers(&[60, 62, 64], None, None, 120.0).unwrap();
        assert_eq!(starts(&timeline), vec![0.0, 160.0, 320.0]);
        let pitches: Vec<i32> = timeline.notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![60, 62, 64]);
    }

    #[test]
    fn test_from_midi_numbers_length_mismatch() {
        let err = from_midi_numbers(&[60, 62], Some(&[1.0][..]), None, 120.0).unwrap_err();
        assert!(matches!(err, PianoRollError::LengthMismatch { left: 2, right: 1 }));
    }

    #[test]
    fn test_from_frequencies_rounds_to_midi() {
        let timeline = from_frequencies(&[440.0, 493.88, 523.25], None, None, 120.0).unwrap();
        let pitches: Vec<i32> = timeline.notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![69, 71, 72]);
    }

    #[test]
    fn test_from_tts_output_with_f0() {
        let alignment = [AlignedUnit::new("an", 0.0, 0.5), AlignedUnit::new("nyeong", 0.5, 1.0)];
        let f0 = [220.0, 230.0, 240.0, 235.0, 225.0];
        let timeline = from_tts_output(&alignment, Some(&f0[..]), 120.0).unwrap();

        let pitches: Vec<i32> = timeline.notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![57, 58]);
        assert_eq!(timeline.notes[1].lyric.as_deref(), Some("nyeong"));
        assert_eq!(starts(&timeline), vec![0.0, 80.0]);

        let layers = timeline.line_data.as_ref().unwrap();
        assert_eq!(layers["f0_curve"]["data"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_from_tts_output_without_f0() {
        let alignment = [AlignedUnit::new("la", 0.0, 1.0)];
        let timeline = from_tts_output(&alignment, None, 120.0).unwrap();
        assert_eq!(timeline.notes[0].pitch, 60);
        assert!(timeline.line_data.is_none());
    }

    #[test]
    fn test_from_tts_output_unvoiced_segment_falls_back() {
        let alignment = [AlignedUnit::new("s", 0.0, 1.0)];
        let timeline = from_tts_output(&alignment, Some(&[0.0, 0.0][..]), 120.0).unwrap();
        // 220 Hz
        assert_eq!(timeline.notes[0].pitch, 57);
    }

    #[test]
    fn test_from_midi_generation() {
        let sequence: Vec<GeneratedNote> = serde_json::from_value(serde_json::json!([
            {"pitch": 60, "start": 0.0, "duration": 0.5, "velocity": 90},
            {"pitch": 64, "start": 0.5, "duration": 0.5, "lyric": "la", "phoneme": "l a"},
        ]))
        .unwrap();
        let timeline = from_midi_generation(&sequence, 120.0);

        assert_eq!(starts(&timeline), vec![0.0, 80.0]);
        assert_eq!(timeline.notes[0].velocity, 90);
        assert_eq!(timeline.notes[1].velocity, 100);
        assert_eq!(timeline.notes[1].phoneme.as_deref(), Some("l a"));
    }

    #[test]
    fn test_auto_convert_detects_triples() {
        let data = serde_json::json!([[60, 0, 1], [64, 1.0, 1.0, "extra"]]);
        let timeline = auto_convert(&data, OutputKind::Auto, 120.0).unwrap();
        assert_eq!(starts(&timeline), vec![0.0, 160.0]);
        assert_eq!(timeline.notes[1].pitch, 64);
    }

    #[test]
    fn test_auto_convert_detects_generated_notes() {
        let data = serde_json::json!([{"pitch": 60, "start": 0.5, "duration": 1.0, "lyric": "la"}]);
        let timeline = auto_convert(&data, OutputKind::Auto, 120.0).unwrap();
        assert_eq!(timeline.notes[0].start, 80.0);
        assert_eq!(timeline.notes[0].lyric.as_deref(), Some("la"));
    }

    #[test]
    fn test_auto_convert_unrecognized_is_empty() {
        for data in [serde_json::json!([]), serde_json::json!({"x": 1}), serde_json::json!(["a"])] {
            let timeline = auto_convert(&data, OutputKind::Auto, 120.0).unwrap();
            assert!(timeline.notes.is_empty());
            assert_eq!(timeline.pixels_per_beat, Some(80.0));
        }
    }

    #[test]
    fn test_auto_convert_explicit_kinds() {
        let freqs = auto_convert(&serde_json::json!([440.0, 220.0]), OutputKind::Frequencies, 120.0).unwrap();
        let pitches: Vec<i32> = freqs.notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![69, 57]);

        let tts = serde_json::json!([{"label": "la", "start": 0.0, "end": 0.5}]);
        let timeline = auto_convert(&tts, OutputKind::Tts, 120.0).unwrap();
        assert_eq!(timeline.notes[0].lyric.as_deref(), Some("la"));

        assert!(auto_convert(&serde_json::json!("nope"), OutputKind::MidiGeneration, 120.0).is_err());
    }

    #[test]
    fn test_output_kind_names() {
        let kind: OutputKind = serde_json::from_value(serde_json::json!("midi_generation")).unwrap();
        assert_eq!(kind, OutputKind::MidiGeneration);
        assert_eq!(OutputKind::default(), OutputKind::Auto);
    }
}
