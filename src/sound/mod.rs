// Sound module - Click sources the timing engine triggers
// The engine only knows the SoundBank/Playable seam; banks decide where
// sounds come from (generated or WAV packs on disk).

pub mod click;
pub mod synth;
pub mod wav;

pub use click::{ClickKind, ClickVoice, Playable, SoundBank};
pub use synth::{SynthBank, SYNTH_PROFILE};
pub use wav::WavBank;
