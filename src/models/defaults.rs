//! Default values for the piano roll model
//!
//! Shared between the timing context, timeline normalization and the widget
//! so the backend and frontend agree on the same numbers.

/// Default zoom in pixels per beat
pub const DEFAULT_PIXELS_PER_BEAT: f64 = 80.0;

/// Default tempo in beats per minute
pub const DEFAULT_TEMPO: f64 = 120.0;

/// Default audio sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Default MIDI pulses per quarter note
pub const DEFAULT_PPQN: u32 = 480;

/// Default MIDI velocity for new notes
pub const DEFAULT_VELOCITY: i32 = 100;

pub const DEFAULT_EDIT_MODE: &str = "select";
pub const DEFAULT_SNAP_SETTING: &str = "1/4";

pub const DEFAULT_TIME_SIGNATURE_NUMERATOR: u32 = 4;
pub const DEFAULT_TIME_SIGNATURE_DENOMINATOR: u32 = 4;

/// Height of one pitch row in pixels
pub const NOTE_HEIGHT: f64 = 20.0;

/// Number of MIDI pitches (0-127)
pub const TOTAL_NOTES: u32 = 128;

/// Full vertical extent of the roll: TOTAL_NOTES * NOTE_HEIGHT
pub const PIANO_ROLL_HEIGHT: f64 = 2560.0;

/// Highest MIDI pitch / velocity value
pub const MIDI_MAX: i32 = 127;

/// Default widget size in pixels
pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 600;
