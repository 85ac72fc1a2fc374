//! Widget configuration

use serde::{Deserialize, Serialize};

use crate::models::defaults::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::timing::TimingContext;
use crate::validation::InvalidDataPolicy;

/// Settings for a `PianoRollComponent`
///
/// Every field is optional when deserialized; missing ones take their default.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentConfig {
    /// Widget width in pixels
    pub width: u32,

    /// Widget height in pixels
    pub height: u32,

    /// Context used for the widget's own sample notes
    pub timing: TimingContext,

    /// What to do with an initial value that fails validation
    pub invalid_data_policy: InvalidDataPolicy,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            timing: TimingContext::default(),
            invalid_data_policy: InvalidDataPolicy::default(),
        }
    }
}

impl ComponentConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_timing(mut self, timing: TimingContext) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_policy(mut self, policy: InvalidDataPolicy) -> Self {
        self.invalid_data_policy = policy;
        self
    }
}
