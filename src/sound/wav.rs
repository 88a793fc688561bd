// WAV sound packs - File-backed click profiles
// A profile is a directory under the pack root holding accent.wav and
// normal.wav. Missing or undecodable files resolve as absent and the
// engine skips those triggers silently.

use super::click::{ClickKind, ClickVoice, Playable, SoundBank};
use hound::{SampleFormat, WavReader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use walkdir::WalkDir;

/// File name for the accent click inside a profile directory
pub const ACCENT_FILE: &str = "accent.wav";
/// File name for the normal click inside a profile directory
pub const NORMAL_FILE: &str = "normal.wav";

/// Click bank backed by WAV files on disk.
/// Decoded voices are cached so every resolve of the same (kind, profile)
/// hands out the same shared voice - retriggering through any handle
/// rewinds the one playback.
pub struct WavBank {
    root: PathBuf,
    cache: Mutex<HashMap<(ClickKind, String), Arc<ClickVoice>>>,
}

impl WavBank {
    /// Create a bank rooted at a pack directory
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn click_path(&self, kind: ClickKind, profile: &str) -> PathBuf {
        let file = match kind {
            ClickKind::Accent => ACCENT_FILE,
            ClickKind::Normal => NORMAL_FILE,
        };
        self.root.join(profile).join(file)
    }

    /// Decode a WAV file into a mono voice.
    /// Multi-channel files are averaged down to mono. Unsupported sample
    /// formats are treated as unreadable.
    fn load_click(path: &Path) -> Option<ClickVoice> {
        let reader = WavReader::open(path).ok()?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => {
                reader.into_samples::<f32>().filter_map(Result::ok).collect()
            }
            (SampleFormat::Int, 16) => reader
                .into_samples::<i16>()
                .filter_map(Result::ok)
                .map(|s| s as f32 / i16::MAX as f32)
                .collect(),
            (SampleFormat::Int, 24) | (SampleFormat::Int, 32) => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .filter_map(Result::ok)
                    .map(|s| s as f32 / scale)
                    .collect()
            }
            _ => return None,
        };

        if interleaved.is_empty() {
            return None;
        }

        let channels = spec.channels.max(1) as usize;
        let samples: Vec<f32> = if channels == 1 {
            interleaved
        } else {
            interleaved
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
                .collect()
        };

        Some(ClickVoice::new(samples, spec.sample_rate))
    }
}

impl SoundBank for WavBank {
    fn resolve(&self, kind: ClickKind, profile: &str) -> Option<Arc<dyn Playable>> {
        let key = (kind, profile.to_string());

        let mut cache = self.cache.lock().ok()?;
        if let Some(voice) = cache.get(&key) {
            return Some(Arc::clone(voice) as Arc<dyn Playable>);
        }

        // Failures are not cached: a pack fixed on disk starts resolving
        // on the next profile change without restarting
        let voice = Arc::new(Self::load_click(&self.click_path(kind, profile))?);
        cache.insert(key, Arc::clone(&voice));
        Some(voice)
    }

    fn profiles(&self) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_dir())
            .filter(|entry| entry.path().join(NORMAL_FILE).is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();

        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_wav_i16(path: &Path, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn write_wav_stereo(path: &Path, frames: &[(i16, i16)]) {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &(l, r) in frames {
            writer.write_sample(l).unwrap();
            writer.write_sample(r).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_resolve_loads_wav_profile() {
        let dir = tempdir().unwrap();
        let profile_dir = dir.path().join("woodblock");
        std::fs::create_dir_all(&profile_dir).unwrap();
        write_wav_i16(&profile_dir.join(NORMAL_FILE), &[0, 8_192, -8_192, 0]);
        write_wav_i16(&profile_dir.join(ACCENT_FILE), &[0, 16_384, -16_384]);

        let bank = WavBank::new(dir.path());

        let normal = bank.resolve(ClickKind::Normal, "woodblock");
        assert!(normal.is_some());
        let accent = bank.resolve(ClickKind::Accent, "woodblock");
        assert!(accent.is_some());

        // Unknown profile is absent
        assert!(bank.resolve(ClickKind::Normal, "cowbell").is_none());
    }

    #[test]
    fn test_missing_accent_file_is_absent() {
        let dir = tempdir().unwrap();
        let profile_dir = dir.path().join("sticks");
        std::fs::create_dir_all(&profile_dir).unwrap();
        write_wav_i16(&profile_dir.join(NORMAL_FILE), &[100, 200]);

        let bank = WavBank::new(dir.path());
        assert!(bank.resolve(ClickKind::Normal, "sticks").is_some());
        assert!(bank.resolve(ClickKind::Accent, "sticks").is_none());
    }

    #[test]
    fn test_garbage_file_is_absent() {
        let dir = tempdir().unwrap();
        let profile_dir = dir.path().join("broken");
        std::fs::create_dir_all(&profile_dir).unwrap();
        std::fs::write(profile_dir.join(NORMAL_FILE), b"not a wav file").unwrap();

        let bank = WavBank::new(dir.path());
        assert!(bank.resolve(ClickKind::Normal, "broken").is_none());
    }

    #[test]
    fn test_stereo_is_downmixed() {
        let dir = tempdir().unwrap();
        let profile_dir = dir.path().join("stereo");
        std::fs::create_dir_all(&profile_dir).unwrap();
        write_wav_stereo(
            &profile_dir.join(NORMAL_FILE),
            &[(1_000, 3_000), (-2_000, -2_000)],
        );

        let bank = WavBank::new(dir.path());
        let _ = bank.resolve(ClickKind::Normal, "stereo").unwrap();

        let cache = bank.cache.lock().unwrap();
        let voice = cache
            .get(&(ClickKind::Normal, "stereo".to_string()))
            .unwrap();
        assert_eq!(voice.len(), 2, "one mono sample per stereo frame");
    }

    #[test]
    fn test_resolve_caches_and_shares_the_voice() {
        let dir = tempdir().unwrap();
        let profile_dir = dir.path().join("shared");
        std::fs::create_dir_all(&profile_dir).unwrap();
        write_wav_i16(&profile_dir.join(NORMAL_FILE), &[1, 2, 3]);

        let bank = WavBank::new(dir.path());
        let first = bank.resolve(ClickKind::Normal, "shared").unwrap();
        let second = bank.resolve(ClickKind::Normal, "shared").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_profile_discovery() {
        let dir = tempdir().unwrap();
        for name in ["pixabay", "beep"] {
            let profile_dir = dir.path().join(name);
            std::fs::create_dir_all(&profile_dir).unwrap();
            write_wav_i16(&profile_dir.join(NORMAL_FILE), &[1, 2]);
        }
        // A directory without normal.wav is not a usable profile
        std::fs::create_dir_all(dir.path().join("empty")).unwrap();

        let bank = WavBank::new(dir.path());
        assert_eq!(bank.profiles(), vec!["beep".to_string(), "pixabay".to_string()]);
    }

    #[test]
    fn test_missing_root_has_no_profiles() {
        let bank = WavBank::new("/nonexistent/click/packs");
        assert!(bank.profiles().is_empty());
        assert!(bank.resolve(ClickKind::Normal, "any").is_none());
    }
}
