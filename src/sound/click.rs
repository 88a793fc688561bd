// Click playback seam - What the timing engine needs from a sound source
// Banks resolve (kind, profile) to a shared handle; triggering a handle
// rewinds it to the start, so rapid retriggers restart instead of layering.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Which of the two click sounds a beat wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickKind {
    /// First beat of a bar (downbeat)
    Accent,
    /// Every other beat
    Normal,
}

/// A triggerable click sound.
/// `reset_and_play` always rewinds to the start of the sound first; a
/// handle that is already sounding restarts rather than stacking a second
/// playback.
pub trait Playable: Send + Sync {
    fn reset_and_play(&self);
}

/// Source of click sounds, keyed by kind and a named sound profile.
/// `resolve` may return `None` (unknown profile, missing or unreadable
/// asset); the engine skips the trigger silently in that case.
pub trait SoundBank: Send + Sync {
    fn resolve(&self, kind: ClickKind, profile: &str) -> Option<Arc<dyn Playable>>;

    /// Profile names this bank can resolve, for display purposes
    fn profiles(&self) -> Vec<String>;
}

/// A mono PCM click with a playback cursor.
/// The cursor is atomic so the ticker thread can retrigger while an output
/// driver drains samples without any lock. One driver at a time is assumed;
/// a retrigger racing a read restarts playback, which is the intended
/// semantics anyway.
#[derive(Debug)]
pub struct ClickVoice {
    samples: Vec<f32>,
    sample_rate: u32,
    cursor: AtomicUsize,
}

impl ClickVoice {
    /// Wrap decoded samples; the voice starts idle
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        let end = samples.len();
        Self {
            samples,
            sample_rate,
            cursor: AtomicUsize::new(end),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length of the click in samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True while there are samples left to play
    pub fn is_active(&self) -> bool {
        self.cursor.load(Ordering::Relaxed) < self.samples.len()
    }

    /// Next output sample, or 0.0 once the click has finished
    pub fn next_sample(&self) -> f32 {
        let pos = self.cursor.load(Ordering::Relaxed);
        if pos >= self.samples.len() {
            return 0.0;
        }
        self.cursor.store(pos + 1, Ordering::Relaxed);
        self.samples[pos]
    }

    /// Fill a buffer from the current cursor, zero-padding past the end
    pub fn fill(&self, output: &mut [f32]) {
        for sample in output.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

impl Playable for ClickVoice {
    fn reset_and_play(&self) {
        self.cursor.store(0, Ordering::Relaxed);
    }
}
