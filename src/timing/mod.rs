//! Timing conversion library
//!
//! Every note position is stored in pixels. This module maps a pixel
//! quantity to flicks, seconds, beats, MIDI ticks and audio samples for a
//! given `TimingContext`, and generates note identifiers.
//!
//! The conversions assume a validated context: `pixels_per_beat > 0` and
//! `tempo > 0`. A zero divisor surfaces as an IEEE infinity or NaN.

pub mod context;
pub mod convert;
pub mod ids;

pub use context::{ContextUpdate, TimingContext};
pub use convert::*;
pub use ids::generate_note_id;
