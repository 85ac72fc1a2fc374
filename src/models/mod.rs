//! Models module for the piano roll
//!
//! This module contains the note, timeline and overlay data structures
//! exchanged with the piano roll widget.

pub mod defaults;
pub mod note;
pub mod overlay;
pub mod serde_helpers;
pub mod timeline;

// Re-export commonly used types
pub use note::{Note, NoteRecord};
pub use overlay::{curve_map, Curve, CurvePoint, OverlayData, Segment};
pub use timeline::{clean_piano_roll_data, ensure_note_ids_value, TimeSignature, Timeline};
