//! Piano roll widget adapter
//!
//! The widget hands payloads to caller code at two points. `preprocess`
//! passes incoming data through untouched. `postprocess` normalizes outgoing
//! data and merges in whatever overlay data the backend has attached.

use serde_json::Value;

use crate::config::ComponentConfig;
use crate::error::Result;
use crate::models::serde_helpers::is_blank;
use crate::models::{clean_piano_roll_data, Curve, Note, OverlayData, Segment, Timeline};
use crate::validation::validate_and_warn;

/// Server side of one piano roll widget
#[derive(Debug, Clone)]
pub struct PianoRollComponent {
    config: ComponentConfig,
    overlay: OverlayData,
    value: Timeline,
}

impl PianoRollComponent {
    /// A widget showing the sample notes
    pub fn new(config: ComponentConfig) -> Self {
        let value = sample_timeline(&config, &SAMPLE_NOTES);
        Self {
            config,
            overlay: OverlayData::new(),
            value,
        }
    }

    /// A widget with an initial value
    ///
    /// A blank value gives the sample notes. An invalid one is handled per
    /// the config's `invalid_data_policy`.
    pub fn with_value(config: ComponentConfig, value: &Value) -> Result<Self> {
        let mut component = Self::new(config);
        if !is_blank(value) {
            let mut timeline = validate_and_warn(value, "Initial value", component.config.invalid_data_policy)?;
            timeline.refresh_timing();
            component.value = timeline;
        }
        Ok(component)
    }

    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    /// Current value held by the widget
    pub fn value(&self) -> &Timeline {
        &self.value
    }

    pub fn overlay(&self) -> &OverlayData {
        &self.overlay
    }

    /// The sample notes shown by a fresh widget
    pub fn default_value(&self) -> Timeline {
        sample_timeline(&self.config, &SAMPLE_NOTES)
    }

    /// A one-note payload for documentation and tests
    pub fn example_payload(&self) -> Timeline {
        sample_timeline(&self.config, &SAMPLE_NOTES[..1])
    }

    /// Incoming payload, handed to caller code unchanged
    pub fn preprocess(&self, payload: Value) -> Value {
        payload
    }

    /// Outgoing payload: cleaned, every note's timing refreshed, overlay merged
    pub fn postprocess(&self, value: &Value) -> Result<Value> {
        let mut timeline = if is_blank(value) {
            self.default_value()
        } else {
            let mut timeline = clean_piano_roll_data(value);
            timeline.refresh_timing();
            timeline
        };

        if self.overlay.has_data() {
            self.overlay.apply_to(&mut timeline)?;
            log::debug!(
                "Backend data attached: audio={} curves={} segments={} backend_audio={}",
                self.overlay.audio_data.is_some(),
                self.overlay.curve_data.len(),
                self.overlay.segment_data.len(),
                self.overlay.use_backend_audio
            );
        }

        timeline.to_value()
    }

    // ------------------------------------------------------------------
    // Overlay data
    // ------------------------------------------------------------------

    pub fn set_audio(&mut self, audio_data: impl Into<String>) {
        self.overlay.set_audio(audio_data);
    }

    pub fn add_curve(&mut self, name: impl Into<String>, curve: Curve) {
        self.overlay.add_curve(name, curve);
    }

    pub fn remove_curve(&mut self, name: &str) {
        self.overlay.remove_curve(name);
    }

    pub fn add_segment(&mut self, segment: Segment) {
        self.overlay.add_segment(segment);
    }

    pub fn clear_segments(&mut self) {
        self.overlay.clear_segments();
    }

    pub fn enable_backend_audio(&mut self, enable: bool) {
        self.overlay.enable_backend_audio(enable);
    }

    pub fn has_data(&self) -> bool {
        self.overlay.has_data()
    }

    // ------------------------------------------------------------------
    // Notes
    // ------------------------------------------------------------------

    /// Add a note to the current value and return its id
    pub fn add_note(&mut self, pitch: i32, start: f64, duration: f64, velocity: i32, lyric: Option<&str>) -> String {
        let mut note = Note::new(start, duration, pitch, self.value.timing_context()).with_velocity(velocity);
        note.lyric = lyric.map(str::to_string);
        let id = note.id.clone();
        self.value.add_note(&note);
        id
    }

    /// Remove a note by id; false when no note had that id
    pub fn remove_note(&mut self, id: &str) -> bool {
        self.value.remove_note(id).is_some()
    }
}

impl Default for PianoRollComponent {
    fn default() -> Self {
        Self::new(ComponentConfig::default())
    }
}

/// (pitch, velocity, lyric, start px, duration px)
const SAMPLE_NOTES: [(i32, i32, &str, f64, f64); 3] = [
    (60, 100, "안녕", 80.0, 80.0),
    (64, 90, "하세요", 160.0, 160.0),
    (67, 95, "반가워요", 320.0, 80.0),
];

fn sample_timeline(config: &ComponentConfig, notes: &[(i32, i32, &str, f64, f64)]) -> Timeline {
    let ctx = config.timing;
    Timeline {
        notes: notes
            .iter()
            .map(|(pitch, velocity, lyric, start, duration)| {
                Note::new(*start, *duration, *pitch, ctx)
                    .with_velocity(*velocity)
                    .with_lyric(*lyric)
                    .to_record()
            })
            .collect(),
        tempo: ctx.tempo,
        pixels_per_beat: Some(ctx.pixels_per_beat),
        sample_rate: Some(ctx.sample_rate),
        ppqn: Some(ctx.ppqn),
        ..Timeline::default()
    }
}
