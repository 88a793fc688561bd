// Évènements de battement - Communication ticker → front-end

/// One beat of the running metronome, as observed by the ticker.
/// `beat` is the zero-based index within the bar before the advance, so
/// the accented beat always reports index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatEvent {
    pub beat: u32,
    pub accent: bool,
}
