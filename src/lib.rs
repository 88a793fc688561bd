// Clickster - Library exports for tests and benchmarks

pub mod messaging;
pub mod sound;
pub mod store;
pub mod timing;

// Re-export commonly used types for convenience
pub use messaging::channels::{create_beat_channel, create_notification_channel};
pub use messaging::event::BeatEvent;
pub use messaging::notification::{Notification, NotificationCategory, NotificationLevel};
pub use sound::{ClickKind, ClickVoice, Playable, SoundBank, SynthBank, WavBank, SYNTH_PROFILE};
pub use store::{FileStore, KeyValueStore, MemoryStore, Preset, PresetLibrary, StoreError};
pub use timing::{Metronome, SharedBeatState, TapTempo, Tempo, TempoConfig};
