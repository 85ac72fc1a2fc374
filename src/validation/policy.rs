//! What to do with a payload that fails validation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validate_timeline;
use crate::error::{PianoRollError, Result};
use crate::models::Timeline;

/// Handling of invalid incoming data
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvalidDataPolicy {
    /// Log a warning and continue with an empty timeline
    #[default]
    Fallback,
    /// Return every validation error to the caller
    Reject,
}

/// Validate `data`, logging a warning when it is invalid
///
/// A valid payload is decoded into a `Timeline`. An invalid one is either
/// replaced by `Timeline::empty()` or turned into
/// `PianoRollError::InvalidData`, depending on `policy`.
pub fn validate_and_warn(data: &Value, context: &str, policy: InvalidDataPolicy) -> Result<Timeline> {
    let result = validate_timeline(data);
    if result.is_valid() {
        return Ok(Timeline::from_value(data));
    }

    let listing: Vec<String> = result.errors.iter().map(|e| format!("  - {}", e)).collect();
    log::warn!("{} validation failed:\n{}", context, listing.join("\n"));

    match policy {
        InvalidDataPolicy::Fallback => Ok(Timeline::empty()),
        InvalidDataPolicy::Reject => Err(PianoRollError::InvalidData {
            context: context.to_string(),
            errors: result.errors,
        }),
    }
}
