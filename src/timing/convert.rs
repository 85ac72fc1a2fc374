//! Pixel-anchored timing conversions
//!
//! Each function is pure. `compute_all` calls the single-purpose functions
//! so its fields are bit-identical to calling them directly.

use serde::{Deserialize, Serialize};

use super::context::TimingContext;
use crate::models::defaults::{NOTE_HEIGHT, TOTAL_NOTES};

/// Flicks per second (1 flick = 1/705,600,000 s)
pub const FLICKS_PER_SECOND: f64 = 705_600_000.0;

/// Pixels to flicks
pub fn pixels_to_flicks(pixels: f64, pixels_per_beat: f64, tempo: f64) -> f64 {
    pixels * 60.0 * FLICKS_PER_SECOND / (pixels_per_beat * tempo)
}

/// Pixels to seconds
pub fn pixels_to_seconds(pixels: f64, pixels_per_beat: f64, tempo: f64) -> f64 {
    pixels * 60.0 / (pixels_per_beat * tempo)
}

/// Pixels to beats
pub fn pixels_to_beats(pixels: f64, pixels_per_beat: f64) -> f64 {
    pixels / pixels_per_beat
}

/// Pixels to MIDI ticks, truncated toward zero
pub fn pixels_to_ticks(pixels: f64, pixels_per_beat: f64, ppqn: u32) -> i64 {
    (pixels_to_beats(pixels, pixels_per_beat) * ppqn as f64) as i64
}

/// Pixels to audio samples, truncated toward zero
pub fn pixels_to_samples(pixels: f64, pixels_per_beat: f64, tempo: f64, sample_rate: u32) -> i64 {
    (pixels_to_seconds(pixels, pixels_per_beat, tempo) * sample_rate as f64) as i64
}

/// Seconds to pixels (inverse of `pixels_to_seconds`)
pub fn seconds_to_pixels(seconds: f64, pixels_per_beat: f64, tempo: f64) -> f64 {
    seconds * (tempo / 60.0) * pixels_per_beat
}

/// One pixel quantity expressed in every timing unit
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TimingData {
    pub pixels: f64,
    pub flicks: f64,
    pub seconds: f64,
    pub beats: f64,
    pub ticks: i64,
    pub samples: i64,
}

/// Convert `pixels` to all timing units at once
pub fn compute_all(pixels: f64, ctx: &TimingContext) -> TimingData {
    TimingData {
        pixels,
        flicks: pixels_to_flicks(pixels, ctx.pixels_per_beat, ctx.tempo),
        seconds: pixels_to_seconds(pixels, ctx.pixels_per_beat, ctx.tempo),
        beats: pixels_to_beats(pixels, ctx.pixels_per_beat),
        ticks: pixels_to_ticks(pixels, ctx.pixels_per_beat, ctx.ppqn),
        samples: pixels_to_samples(pixels, ctx.pixels_per_beat, ctx.tempo, ctx.sample_rate),
    }
}

// =============================================================================
// Vertical axis: frequency and MIDI pitch to pitch-row pixels
// =============================================================================

/// Frequency in Hz to a fractional MIDI note number (0.0 for non-positive input)
pub fn hz_to_midi(frequency: f64) -> f64 {
    if frequency > 0.0 {
        69.0 + 12.0 * (frequency / 440.0).log2()
    } else {
        0.0
    }
}

/// MIDI note number to the y pixel of that pitch row's center
///
/// Row 127 sits at the top of the roll. Input is clamped to 0..=127.
pub fn midi_to_y_pixels(midi_note: f64) -> f64 {
    let top = (TOTAL_NOTES - 1) as f64;
    (top - midi_note.clamp(0.0, top)) * NOTE_HEIGHT + NOTE_HEIGHT / 2.0
}

/// Frequency in Hz straight to a pitch-row y pixel
pub fn hz_to_y_pixels(frequency: f64) -> f64 {
    midi_to_y_pixels(hz_to_midi(frequency))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_at_120_and_60_bpm() {
        assert_eq!(pixels_to_seconds(80.0, 80.0, 120.0), 0.5);
        assert_eq!(pixels_to_seconds(80.0, 80.0, 60.0), 1.0);
        assert_eq!(pixels_to_seconds(0.0, 80.0, 120.0), 0.0);
    }

    #[test]
    fn test_flicks_one_beat() {
        let flicks = pixels_to_flicks(80.0, 80.0, 120.0);
        assert!((flicks - 352_800_000.0).abs() <= 1.0);
    }

    #[test]
    fn test_flicks_scale_inversely_with_tempo() {
        let at_120 = pixels_to_flicks(200.0, 80.0, 120.0);
        let at_90 = pixels_to_flicks(200.0, 80.0, 90.0);
        let ratio = at_120 / at_90;
        assert!((ratio - 90.0 / 120.0).abs() < 1e-12);
    }

    #[test]
    fn test_beats() {
        assert_eq!(pixels_to_beats(40.0, 80.0), 0.5);
        assert_eq!(pixels_to_beats(320.0, 80.0), 4.0);
        assert_eq!(pixels_to_beats(100.0, 100.0), 1.0);
    }

    #[test]
    fn test_ticks_truncate() {
        assert_eq!(pixels_to_ticks(80.0, 80.0, 480), 480);
        assert_eq!(pixels_to_ticks(40.0, 80.0, 480), 240);
        assert_eq!(pixels_to_ticks(80.0, 80.0, 960), 960);
        // 12.5 ticks
        assert_eq!(pixels_to_ticks(10.0, 80.0, 100), 12);
        assert_eq!(pixels_to_ticks(-10.0, 80.0, 100), -12);
    }

    #[test]
    fn test_samples() {
        assert_eq!(pixels_to_samples(160.0, 80.0, 120.0, 44100), 44100);
        assert_eq!(pixels_to_samples(80.0, 80.0, 120.0, 44100), 22050);
        assert_eq!(pixels_to_samples(80.0, 80.0, 120.0, 48000), 24000);
    }

    #[test]
    fn test_compute_all_matches_single_conversions() {
        let ctx = TimingContext::new(80.0, 120.0);
        for pixels in [0.0, 13.7, 160.0, 1234.5] {
            let all = compute_all(pixels, &ctx);
            assert_eq!(all.pixels, pixels);
            assert_eq!(all.seconds, pixels_to_seconds(pixels, 80.0, 120.0));
            assert_eq!(all.beats, pixels_to_beats(pixels, 80.0));
            assert_eq!(all.flicks, pixels_to_flicks(pixels, 80.0, 120.0));
            assert_eq!(all.ticks, pixels_to_ticks(pixels, 80.0, 480));
            assert_eq!(all.samples, pixels_to_samples(pixels, 80.0, 120.0, 44100));
        }
    }

    #[test]
    fn test_seconds_to_pixels_inverts_pixels_to_seconds() {
        assert_eq!(seconds_to_pixels(1.0, 80.0, 120.0), 160.0);
        assert_eq!(seconds_to_pixels(pixels_to_seconds(240.0, 80.0, 120.0), 80.0, 120.0), 240.0);
    }

    #[test]
    fn test_pitch_axis() {
        assert_eq!(hz_to_midi(440.0), 69.0);
        assert_eq!(hz_to_midi(0.0), 0.0);
        assert_eq!(hz_to_midi(-5.0), 0.0);
        assert_eq!(midi_to_y_pixels(127.0), 10.0);
        assert_eq!(midi_to_y_pixels(200.0), 10.0);
        assert_eq!(midi_to_y_pixels(0.0), 2550.0);
        assert_eq!(hz_to_y_pixels(440.0), 1170.0);
    }
}
