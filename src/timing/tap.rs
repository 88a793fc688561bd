// Tap tempo - Derives a bpm estimate from manually tapped timestamps
// Keeps a rolling window of the last few inter-tap intervals and averages.

use super::tempo::Tempo;
use std::collections::VecDeque;

/// Tap-tempo estimator
/// Feed it tap timestamps (milliseconds, any monotonic origin); once two
/// taps exist it yields a clamped tempo from the rolling average of the
/// most recent intervals.
#[derive(Debug, Clone, Default)]
pub struct TapTempo {
    last_tap_ms: Option<u64>,
    intervals: VecDeque<u64>,
}

impl TapTempo {
    /// Number of inter-tap intervals kept; older ones are evicted FIFO
    pub const HISTORY: usize = 4;

    /// Create an empty estimator
    pub fn new() -> Self {
        Self {
            last_tap_ms: None,
            intervals: VecDeque::with_capacity(Self::HISTORY),
        }
    }

    /// Record a tap at `now_ms`.
    ///
    /// Returns the updated tempo estimate, or `None` on the very first tap.
    /// There is deliberately no upper bound on the gap between taps: a long
    /// pause is recorded as one huge interval and ages out of the window
    /// after four more taps.
    pub fn tap(&mut self, now_ms: u64) -> Option<Tempo> {
        let estimate = self.last_tap_ms.map(|previous| {
            self.intervals.push_back(now_ms.saturating_sub(previous));
            if self.intervals.len() > Self::HISTORY {
                self.intervals.pop_front();
            }

            let sum: u64 = self.intervals.iter().sum();
            let average = sum as f64 / self.intervals.len() as f64;
            Tempo::new((60_000.0 / average).round() as i32)
        });

        self.last_tap_ms = Some(now_ms);
        estimate
    }

    /// Number of intervals currently in the window
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tap_yields_nothing() {
        let mut taps = TapTempo::new();
        assert_eq!(taps.tap(1_000), None);
        assert_eq!(taps.interval_count(), 0);
    }

    #[test]
    fn test_two_taps_half_second_apart() {
        let mut taps = TapTempo::new();
        taps.tap(1_000);
        let estimate = taps.tap(1_500);

        // 500 ms per beat = 120 bpm
        assert_eq!(estimate, Some(Tempo::new(120)));
        assert_eq!(taps.interval_count(), 1);
    }

    #[test]
    fn test_window_evicts_oldest_interval() {
        let mut taps = TapTempo::new();

        // Six taps producing intervals [500, 500, 500, 500, 600];
        // the window keeps the last four: [500, 500, 500, 600]
        let mut estimate = None;
        for t in [0, 500, 1_000, 1_500, 2_000, 2_600] {
            estimate = taps.tap(t);
        }

        assert_eq!(taps.interval_count(), TapTempo::HISTORY);

        // Average 525 ms -> round(60000 / 525) = 114
        assert_eq!(estimate, Some(Tempo::new(114)));
    }

    #[test]
    fn test_steady_taps_converge() {
        let mut taps = TapTempo::new();
        let mut estimate = None;
        for i in 0..10u64 {
            estimate = taps.tap(i * 750);
        }

        // 750 ms per beat = 80 bpm
        assert_eq!(estimate, Some(Tempo::new(80)));
    }

    #[test]
    fn test_long_gap_is_kept() {
        let mut taps = TapTempo::new();
        taps.tap(0);
        let estimate = taps.tap(60_000);

        // One minute between taps reads as 1 bpm, clamped to the floor.
        // No max-gap reset: the pause skews the window until it ages out.
        assert_eq!(estimate, Some(Tempo::new(30)));
    }

    #[test]
    fn test_non_monotonic_clock_does_not_panic() {
        let mut taps = TapTempo::new();
        taps.tap(1_000);
        let estimate = taps.tap(400);

        // Backwards timestamps saturate to a zero interval; the estimate
        // pegs at the clamp ceiling rather than failing
        let bpm = estimate.expect("second tap must estimate").bpm();
        assert!((Tempo::MIN_BPM..=Tempo::MAX_BPM).contains(&bpm));
    }
}
