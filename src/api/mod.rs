//! Piano roll WASM API
//!
//! This module provides the JavaScript-facing API. Every function takes and
//! returns plain JS values and delegates to the native core.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization and error conversion
//! - `timing`: Pixel to flicks/seconds/beats/ticks/samples conversions, note ids
//! - `timeline`: Validation, cleaning and id assignment for payloads
//! - `widget`: The `PianoRollWidget` class

pub mod helpers;
pub mod timeline;
pub mod timing;
pub mod widget;

pub use widget::PianoRollWidget;
