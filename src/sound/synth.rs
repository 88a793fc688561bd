// Synthesized click bank - Built-in profile with generated sine-burst clicks
// Keeps the metronome usable with no sound assets on disk.

use super::click::{ClickKind, ClickVoice, Playable, SoundBank};
use std::f32::consts::PI;
use std::sync::Arc;

/// Profile name the synthesized bank answers to
pub const SYNTH_PROFILE: &str = "synth";

/// Click bank with pre-generated accent and normal clicks.
/// Higher frequency and amplitude for the accent so the downbeat stands out.
#[derive(Debug)]
pub struct SynthBank {
    accent: Arc<ClickVoice>,
    normal: Arc<ClickVoice>,
}

impl SynthBank {
    /// Duration of a click in milliseconds
    const CLICK_DURATION_MS: f32 = 10.0;

    /// Pre-generate both clicks at the given sample rate
    pub fn new(sample_rate: f32) -> Self {
        let num_samples = ((Self::CLICK_DURATION_MS / 1000.0) * sample_rate) as usize;

        Self {
            accent: Arc::new(ClickVoice::new(
                Self::generate_click(sample_rate, num_samples, 1200.0, 0.6),
                sample_rate as u32,
            )),
            normal: Arc::new(ClickVoice::new(
                Self::generate_click(sample_rate, num_samples, 800.0, 0.4),
                sample_rate as u32,
            )),
        }
    }

    /// Short sine burst with an exponential decay envelope
    fn generate_click(
        sample_rate: f32,
        num_samples: usize,
        frequency: f32,
        amplitude: f32,
    ) -> Vec<f32> {
        let mut samples = Vec::with_capacity(num_samples);
        let phase_increment = 2.0 * PI * frequency / sample_rate;

        for i in 0..num_samples {
            let t = i as f32 / num_samples as f32;
            let envelope = (-t * 8.0).exp();

            let phase = i as f32 * phase_increment;
            samples.push(phase.sin() * envelope * amplitude);
        }

        samples
    }
}

impl SoundBank for SynthBank {
    fn resolve(&self, kind: ClickKind, profile: &str) -> Option<Arc<dyn Playable>> {
        if profile != SYNTH_PROFILE {
            return None;
        }
        let voice = match kind {
            ClickKind::Accent => Arc::clone(&self.accent),
            ClickKind::Normal => Arc::clone(&self.normal),
        };
        Some(voice)
    }

    fn profiles(&self) -> Vec<String> {
        vec![SYNTH_PROFILE.to_string()]
    }
}
