// Tempo - Clamped bpm value type and the metronome's owned configuration
// Every mutation path (slider, nudge, tap estimate, preset load) saturates
// into the valid range instead of failing.

use std::fmt;
use std::time::Duration;

/// Tempo in BPM (Beats Per Minute)
/// The value is clamped to [MIN_BPM, MAX_BPM] on construction, so a `Tempo`
/// is valid by the time it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tempo {
    bpm: u32,
}

impl Tempo {
    /// Slowest supported tempo
    pub const MIN_BPM: u32 = 30;
    /// Fastest supported tempo
    pub const MAX_BPM: u32 = 240;

    /// Creates a tempo, clamping the value into [MIN_BPM, MAX_BPM]
    pub fn new(bpm: i32) -> Self {
        let clamped = bpm.clamp(Self::MIN_BPM as i32, Self::MAX_BPM as i32);
        Self {
            bpm: clamped as u32,
        }
    }

    /// Get BPM value
    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Duration of one beat in milliseconds (60000 / bpm)
    pub fn interval_ms(&self) -> f64 {
        60_000.0 / self.bpm as f64
    }

    /// Duration of one beat as a `Duration`
    pub fn beat_interval(&self) -> Duration {
        Duration::from_secs_f64(60.0 / self.bpm as f64)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(120)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm)
    }
}

/// The configuration the timing engine owns for the lifetime of a session:
/// tempo, beats per bar, and whether the first beat of each bar is accented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempoConfig {
    pub tempo: Tempo,
    pub beats_per_bar: u32,
    pub accent_first_beat: bool,
}

impl TempoConfig {
    /// Creates a configuration; beats per bar is floored at 1
    pub fn new(tempo: Tempo, beats_per_bar: u32, accent_first_beat: bool) -> Self {
        Self {
            tempo,
            beats_per_bar: beats_per_bar.max(1),
            accent_first_beat,
        }
    }
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self::new(Tempo::default(), 4, true)
    }
}

impl fmt::Display for TempoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} beats/bar", self.tempo, self.beats_per_bar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_clamps_low_and_high() {
        assert_eq!(Tempo::new(29).bpm(), 30);
        assert_eq!(Tempo::new(30).bpm(), 30);
        assert_eq!(Tempo::new(120).bpm(), 120);
        assert_eq!(Tempo::new(240).bpm(), 240);
        assert_eq!(Tempo::new(241).bpm(), 240);
        assert_eq!(Tempo::new(-10).bpm(), 30);
        assert_eq!(Tempo::new(i32::MIN).bpm(), 30);
        assert_eq!(Tempo::new(i32::MAX).bpm(), 240);
    }

    #[test]
    fn test_tempo_clamp_fuzz() {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        for _ in 0..1000 {
            let x: i32 = rng.gen_range(-1_000..=10_000);
            let bpm = Tempo::new(x).bpm();
            assert!((30..=240).contains(&bpm), "bpm {} out of range for input {}", bpm, x);
        }
    }

    #[test]
    fn test_tempo_interval() {
        let tempo = Tempo::new(120);
        assert_eq!(tempo.interval_ms(), 500.0);
        assert_eq!(tempo.beat_interval(), Duration::from_millis(500));

        // At the slowest tempo one beat is 2 seconds
        assert_eq!(Tempo::new(30).interval_ms(), 2000.0);
        // At the fastest, 250 ms - slow enough that 100 ms visual flashes
        // never overlap the next beat
        assert_eq!(Tempo::new(240).interval_ms(), 250.0);
    }

    #[test]
    fn test_tempo_display_and_default() {
        assert_eq!(Tempo::default().bpm(), 120);
        assert_eq!(Tempo::new(90).to_string(), "90 BPM");
    }

    #[test]
    fn test_config_defaults() {
        let config = TempoConfig::default();
        assert_eq!(config.tempo.bpm(), 120);
        assert_eq!(config.beats_per_bar, 4);
        assert!(config.accent_first_beat);
    }

    #[test]
    fn test_config_floors_beats_per_bar() {
        let config = TempoConfig::new(Tempo::new(100), 0, false);
        assert_eq!(config.beats_per_bar, 1);
    }
}
