//! Curve builders for extracted audio features
//!
//! Callers hand in plain numeric series (f0 in Hz, loudness in dB or RMS)
//! together with their frame times. These functions place the samples on
//! the piano roll's pixel grid and wrap them as `Curve` layers. Feature
//! extraction itself happens elsewhere.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::error::{PianoRollError, Result};
use crate::models::defaults::{MIDI_MAX, NOTE_HEIGHT, PIANO_ROLL_HEIGHT};
use crate::models::{Curve, CurvePoint};
use crate::timing::{hz_to_midi, hz_to_y_pixels, seconds_to_pixels, TimingContext};

/// Loudness floor in dB for RMS conversion
pub const DB_FLOOR: f64 = -60.0;

/// Name of the layer produced by `f0_line_data`
pub const F0_LINE_NAME: &str = "f0_curve";

/// Line appearance shared by the builders
#[derive(Debug, Clone, PartialEq)]
pub struct CurveStyle {
    pub color: String,
    pub line_width: f64,
    pub opacity: f64,
}

impl CurveStyle {
    /// Red, 3 px, 0.8 opacity
    pub fn pitch() -> Self {
        Self {
            color: "#FF6B6B".to_string(),
            line_width: 3.0,
            opacity: 0.8,
        }
    }

    /// Cyan, 2 px, 0.6 opacity
    pub fn loudness() -> Self {
        Self {
            color: "#4ECDC4".to_string(),
            line_width: 2.0,
            opacity: 0.6,
        }
    }

    fn curve(&self, data: Vec<CurvePoint>, render_mode: &str) -> Curve {
        let mut curve = Curve::new(self.color.clone(), data);
        curve.line_width = self.line_width;
        curve.opacity = Some(self.opacity);
        curve.visible = Some(true);
        curve.position = Some("overlay".to_string());
        curve.render_mode = Some(render_mode.to_string());
        curve
    }
}

/// Options for `loudness_curve`
#[derive(Debug, Clone, PartialEq)]
pub struct LoudnessOptions {
    /// Values are in dB (affects the reported unit only)
    pub use_db: bool,
    /// Normalization bounds; the data's own min/max when unset
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub style: CurveStyle,
}

impl Default for LoudnessOptions {
    fn default() -> Self {
        Self {
            use_db: true,
            y_min: None,
            y_max: None,
            style: CurveStyle::loudness(),
        }
    }
}

/// Build an f0 curve drawn on the pitch grid
///
/// Non-finite and non-positive frequencies (unvoiced frames) are skipped.
pub fn pitch_curve(
    frequencies: &[f64],
    times: &[f64],
    ctx: &TimingContext,
    style: &CurveStyle,
) -> Result<Curve> {
    check_lengths(frequencies, times)?;

    let voiced: Vec<(f64, f64)> = frequencies
        .iter()
        .zip(times)
        .filter(|(hz, _)| hz.is_finite() && **hz > 0.0)
        .map(|(hz, t)| (*hz, *t))
        .collect();
    if voiced.is_empty() {
        return Err(PianoRollError::NoValidData("frequency".to_string()));
    }

    let data = voiced
        .iter()
        .map(|(hz, t)| {
            CurvePoint::new(
                seconds_to_pixels(*t, ctx.pixels_per_beat, ctx.tempo),
                hz_to_y_pixels(*hz),
            )
        })
        .collect();

    let (min_hz, max_hz) = min_max(voiced.iter().map(|(hz, _)| *hz));

    let mut curve = style.curve(data, "piano_grid");
    curve.data_type = Some("f0".to_string());
    curve.unit = Some("Hz".to_string());
    curve.original_range = Some(range_map(json!({
        "minHz": min_hz,
        "maxHz": max_hz,
        "minMidi": hz_to_midi(min_hz),
        "maxMidi": hz_to_midi(max_hz),
    })));
    Ok(curve)
}

/// Build a loudness curve spanning the full roll height
///
/// Values are min/max normalized; a flat series sits at mid-height.
pub fn loudness_curve(
    values: &[f64],
    times: &[f64],
    ctx: &TimingContext,
    options: &LoudnessOptions,
) -> Result<Curve> {
    check_lengths(values, times)?;

    let valid: Vec<(f64, f64)> = values
        .iter()
        .zip(times)
        .filter(|(v, _)| v.is_finite())
        .map(|(v, t)| (*v, *t))
        .collect();
    if valid.is_empty() {
        return Err(PianoRollError::NoValidData("loudness".to_string()));
    }

    let (data_min, data_max) = min_max(valid.iter().map(|(v, _)| *v));
    let y_min = options.y_min.unwrap_or(data_min);
    let y_max = options.y_max.unwrap_or(data_max);

    let data = valid
        .iter()
        .map(|(v, t)| {
            let normalized = if y_max == y_min {
                0.5
            } else {
                (v - y_min) / (y_max - y_min)
            };
            CurvePoint::new(
                seconds_to_pixels(*t, ctx.pixels_per_beat, ctx.tempo),
                normalized * PIANO_ROLL_HEIGHT,
            )
        })
        .collect();

    let mut curve = options.style.curve(data, "independent_range");
    curve.data_type = Some("loudness".to_string());
    curve.unit = Some(if options.use_db { "dB" } else { "normalized" }.to_string());
    curve.original_range = Some(range_map(json!({
        "min": data_min,
        "max": data_max,
        "y_min": y_min,
        "y_max": y_max,
    })));
    Ok(curve)
}

/// Start time in seconds of each analysis frame
pub fn frames_to_times(n_frames: usize, sample_rate: u32, hop_length: usize) -> Vec<f64> {
    (0..n_frames)
        .map(|i| (i * hop_length) as f64 / sample_rate as f64)
        .collect()
}

/// Place framewise f0 values on the pitch grid, skipping unvoiced frames
pub fn f0_frames_to_points(
    f0: &[f64],
    sample_rate: u32,
    hop_length: usize,
    ctx: &TimingContext,
) -> Vec<CurvePoint> {
    frames_to_times(f0.len(), sample_rate, hop_length)
        .into_iter()
        .zip(f0)
        .filter(|(_, hz)| hz.is_finite() && **hz > 0.0)
        .map(|(t, hz)| {
            CurvePoint::new(
                seconds_to_pixels(t, ctx.pixels_per_beat, ctx.tempo),
                hz_to_y_pixels(*hz),
            )
        })
        .collect()
}

/// Place framewise RMS values over the full roll height
///
/// With `to_db`, values are taken relative to the loudest frame and floored
/// at `DB_FLOOR`, so the floor maps to y = 0 and the peak to the roll
/// height. Otherwise RMS is scaled by its maximum. Non-finite frames are
/// skipped.
pub fn rms_frames_to_points(
    rms: &[f64],
    sample_rate: u32,
    hop_length: usize,
    ctx: &TimingContext,
    to_db: bool,
) -> Vec<CurvePoint> {
    let max_rms = rms
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    let normalize = |value: f64| -> f64 {
        if to_db {
            if max_rms > 0.0 {
                let db = 20.0 * (value / max_rms).max(1e-6).log10();
                (db.max(DB_FLOOR) - DB_FLOOR) / -DB_FLOOR
            } else {
                0.0
            }
        } else if max_rms > 0.0 {
            value / max_rms
        } else {
            0.0
        }
    };

    frames_to_times(rms.len(), sample_rate, hop_length)
        .into_iter()
        .zip(rms)
        .filter(|(_, v)| v.is_finite())
        .map(|(t, v)| {
            CurvePoint::new(
                seconds_to_pixels(t, ctx.pixels_per_beat, ctx.tempo),
                normalize(*v) * PIANO_ROLL_HEIGHT,
            )
        })
        .collect()
}

/// The `"f0_curve"` line layer for an f0 track spread evenly over
/// `total_duration` seconds
///
/// Row 127 maps to y = 0 here (row tops, not centers).
pub fn f0_line_data(
    f0: &[f64],
    total_duration: f64,
    tempo: f64,
    pixels_per_beat: f64,
) -> BTreeMap<String, Curve> {
    let frames = f0.len() as f64;
    let data = f0
        .iter()
        .enumerate()
        .filter(|(_, hz)| **hz > 0.0)
        .map(|(i, hz)| {
            let seconds = i as f64 / frames * total_duration;
            CurvePoint::new(
                seconds_to_pixels(seconds, pixels_per_beat, tempo),
                (MIDI_MAX as f64 - hz_to_midi(*hz)) * NOTE_HEIGHT,
            )
        })
        .collect();

    let mut curve = Curve::new("#FF6B6B", data);
    curve.position = Some("overlay".to_string());
    curve.render_mode = Some("piano_grid".to_string());

    BTreeMap::from([(F0_LINE_NAME.to_string(), curve)])
}

fn check_lengths(left: &[f64], right: &[f64]) -> Result<()> {
    if left.len() != right.len() {
        return Err(PianoRollError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn range_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
