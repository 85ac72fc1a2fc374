//! Piano Roll WASM Module
//!
//! Backend data model for a piano-roll note editor: pixel-based note
//! positions converted to flicks, seconds, beats, MIDI ticks and audio
//! samples, plus validation and normalization of the timeline payload
//! exchanged with the widget.

pub mod analysis;
pub mod api;
pub mod config;
pub mod converters;
pub mod curves;
pub mod error;
pub mod models;
pub mod timing;
pub mod validation;
pub mod widget;

// Re-export commonly used types
pub use config::ComponentConfig;
pub use error::{PianoRollError, Result};
pub use models::{Curve, CurvePoint, Note, NoteRecord, OverlayData, Segment, TimeSignature, Timeline};
pub use timing::{compute_all, generate_note_id, TimingContext, TimingData};
pub use validation::{validate_and_warn, InvalidDataPolicy, ValidationResult};
pub use widget::PianoRollComponent;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Fails only when a logger is already installed
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Piano roll WASM module initialized");
}
