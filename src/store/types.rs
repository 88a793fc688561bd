// Types for preset persistence

use crate::timing::{Tempo, TempoConfig};
use serde::{Deserialize, Serialize};

/// One saved metronome configuration.
/// The serialized field names are the stored wire format: `ts` is beats
/// per bar, `accent` whether beat one is accented. Values are stored as
/// entered and clamped again when applied, so old or hand-edited data
/// never poisons the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preset {
    pub name: String,
    pub bpm: u32,
    #[serde(rename = "ts")]
    pub beats_per_bar: u32,
    #[serde(rename = "accent")]
    pub accent_first_beat: bool,
}

impl Preset {
    pub fn new(name: &str, bpm: u32, beats_per_bar: u32, accent_first_beat: bool) -> Self {
        Self {
            name: name.to_string(),
            bpm,
            beats_per_bar,
            accent_first_beat,
        }
    }

    /// Capture an engine configuration under a name
    pub fn from_config(name: &str, config: TempoConfig) -> Self {
        Self::new(
            name,
            config.tempo.bpm(),
            config.beats_per_bar,
            config.accent_first_beat,
        )
    }

    /// Configuration to hand to the engine, re-clamped into valid ranges
    pub fn config(&self) -> TempoConfig {
        let bpm = i32::try_from(self.bpm).unwrap_or(i32::MAX);
        TempoConfig::new(Tempo::new(bpm), self.beats_per_bar, self.accent_first_beat)
    }
}
