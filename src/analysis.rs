//! Summary statistics over a timeline's notes

use serde::Serialize;

use crate::models::Timeline;
use crate::timing::pixels_to_seconds;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PitchRange {
    pub lowest: i32,
    pub highest: i32,
    pub range: i32,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RhythmAnalysis {
    pub shortest_note_sec: f64,
    pub longest_note_sec: f64,
    /// Population standard deviation of note durations
    pub std_deviation: f64,
}

/// Note statistics, durations in seconds
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NoteAnalysis {
    pub total_notes: usize,
    pub pitch_range: PitchRange,
    pub avg_pitch: f64,
    pub avg_velocity: f64,
    pub avg_note_duration_sec: f64,
    pub total_playback_time_sec: f64,
    pub rhythm_analysis: RhythmAnalysis,
}

/// Analyze the notes of `timeline`; `None` when it has no notes
pub fn analyze_notes(timeline: &Timeline) -> Option<NoteAnalysis> {
    if timeline.notes.is_empty() {
        return None;
    }

    let ctx = timeline.timing_context();
    let to_seconds = |pixels: f64| pixels_to_seconds(pixels, ctx.pixels_per_beat, ctx.tempo);

    let pitches: Vec<i32> = timeline.notes.iter().map(|n| n.pitch).collect();
    let velocities: Vec<f64> = timeline.notes.iter().map(|n| n.velocity as f64).collect();
    let durations: Vec<f64> = timeline.notes.iter().map(|n| to_seconds(n.duration)).collect();

    let lowest = pitches.iter().copied().min()?;
    let highest = pitches.iter().copied().max()?;
    let avg_duration = mean(&durations);
    let variance = durations.iter().map(|d| (d - avg_duration).powi(2)).sum::<f64>() / durations.len() as f64;

    Some(NoteAnalysis {
        total_notes: timeline.notes.len(),
        pitch_range: PitchRange {
            lowest,
            highest,
            range: highest - lowest,
        },
        avg_pitch: round_to(mean(&pitches.iter().map(|p| *p as f64).collect::<Vec<_>>()), 1),
        avg_velocity: round_to(mean(&velocities), 1),
        avg_note_duration_sec: round_to(avg_duration, 2),
        total_playback_time_sec: round_to(to_seconds(timeline.duration_pixels()), 2),
        rhythm_analysis: RhythmAnalysis {
            shortest_note_sec: round_to(durations.iter().copied().fold(f64::INFINITY, f64::min), 3),
            longest_note_sec: round_to(durations.iter().copied().fold(f64::NEG_INFINITY, f64::max), 3),
            std_deviation: round_to(variance.sqrt(), 3),
        },
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}
