// Timing module
// Tempo representation, tap estimation and the beat engine

pub mod engine;
pub mod tap;
pub mod tempo;

pub use engine::{Metronome, ResolvedClicks, SharedBeatState};
pub use tap::TapTempo;
pub use tempo::{Tempo, TempoConfig};
