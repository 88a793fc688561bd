// Beat engine - Transport control and phase-accurate beat scheduling
// A dedicated ticker thread fires beats on a fixed grid; state shared with
// front ends lives in atomics, beat events go out over a lock-free channel

use crate::messaging::{BeatEvent, BeatEventProducer};
use crate::sound::{ClickKind, Playable, SoundBank};
use crate::timing::tap::TapTempo;
use crate::timing::tempo::{Tempo, TempoConfig};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long the visual beat flash stays lit, in milliseconds.
/// Shorter than the beat interval even at the fastest tempo (250 ms at
/// 240 bpm), so consecutive flashes never merge into a steady light.
const BEAT_FLASH_MS: u64 = 100;

/// Shared beat state
/// Thread-safe via atomics for communication with the ticker thread
#[derive(Debug)]
pub struct SharedBeatState {
    playing: AtomicBool,
    beat_flash: AtomicBool,
    accent_first_beat: AtomicBool,
    beat_index: AtomicU32,
    bpm: AtomicU32,
    beats_per_bar: AtomicU32,
}

impl SharedBeatState {
    /// Create new shared beat state with default configuration
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Check if the metronome is running
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Relaxed);
    }

    /// True briefly after each beat, for visual indicators
    pub fn beat_flash(&self) -> bool {
        self.beat_flash.load(Ordering::Relaxed)
    }

    pub fn set_beat_flash(&self, flash: bool) {
        self.beat_flash.store(flash, Ordering::Relaxed);
    }

    /// Zero-based index of the next beat within the bar
    pub fn beat_index(&self) -> u32 {
        self.beat_index.load(Ordering::Relaxed)
    }

    pub fn set_beat_index(&self, beat: u32) {
        self.beat_index.store(beat, Ordering::Relaxed);
    }

    /// Current tempo in bpm
    pub fn bpm(&self) -> u32 {
        self.bpm.load(Ordering::Relaxed)
    }

    pub fn set_bpm(&self, bpm: u32) {
        self.bpm.store(bpm, Ordering::Relaxed);
    }

    /// Beats per bar, read by the ticker on every beat
    pub fn beats_per_bar(&self) -> u32 {
        self.beats_per_bar.load(Ordering::Relaxed)
    }

    pub fn set_beats_per_bar(&self, beats: u32) {
        self.beats_per_bar.store(beats, Ordering::Relaxed);
    }

    /// Whether the first beat of each bar is accented
    pub fn accent_first_beat(&self) -> bool {
        self.accent_first_beat.load(Ordering::Relaxed)
    }

    pub fn set_accent_first_beat(&self, accent: bool) {
        self.accent_first_beat.store(accent, Ordering::Relaxed);
    }
}

impl Default for SharedBeatState {
    fn default() -> Self {
        let config = TempoConfig::default();
        Self {
            playing: AtomicBool::new(false),
            beat_flash: AtomicBool::new(false),
            accent_first_beat: AtomicBool::new(config.accent_first_beat),
            beat_index: AtomicU32::new(0),
            bpm: AtomicU32::new(config.tempo.bpm()),
            beats_per_bar: AtomicU32::new(config.beats_per_bar),
        }
    }
}

/// Click handles resolved from the active sound profile.
/// A missing entry stays silent at beat time; the accent slot additionally
/// falls back to the normal click before going silent.
#[derive(Default)]
pub struct ResolvedClicks {
    pub accent: Option<Arc<dyn Playable>>,
    pub normal: Option<Arc<dyn Playable>>,
}

/// Handle on a running ticker thread
/// Dropping the sender alone would stop the thread too; cancel joins it so
/// no beat can fire after stop returns
struct TickerHandle {
    stop_tx: Sender<()>,
    thread: JoinHandle<()>,
}

impl TickerHandle {
    /// Signal the ticker to exit and wait until it has
    fn cancel(self) {
        let _ = self.stop_tx.send(());
        let _ = self.thread.join();
    }
}

fn spawn_ticker(
    interval: Duration,
    shared: Arc<SharedBeatState>,
    clicks: Arc<Mutex<ResolvedClicks>>,
    beat_tx: Arc<Mutex<BeatEventProducer>>,
) -> TickerHandle {
    let (stop_tx, stop_rx) = mpsc::channel();
    let thread = thread::spawn(move || {
        ticker_loop(interval, stop_rx, shared, clicks, beat_tx);
    });
    TickerHandle { stop_tx, thread }
}

/// Ticker body: wait out each beat deadline, fire, advance the deadline.
/// Deadlines advance by exactly one interval per beat so timing error never
/// accumulates; a late wakeup shortens the next wait instead.
fn ticker_loop(
    interval: Duration,
    stop_rx: Receiver<()>,
    shared: Arc<SharedBeatState>,
    clicks: Arc<Mutex<ResolvedClicks>>,
    beat_tx: Arc<Mutex<BeatEventProducer>>,
) {
    // First beat fires one full interval after start, not immediately
    let mut next = Instant::now() + interval;

    loop {
        let wait = next.saturating_duration_since(Instant::now());
        match stop_rx.recv_timeout(wait) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                run_tick(&shared, &clicks, &beat_tx);
                next += interval;
            }
        }
    }
}

/// One beat: flash the indicator, play the click for the current index,
/// publish a `BeatEvent`, then advance to the next index.
pub(crate) fn run_tick(
    shared: &Arc<SharedBeatState>,
    clicks: &Mutex<ResolvedClicks>,
    beat_tx: &Mutex<BeatEventProducer>,
) {
    let beat = shared.beat_index();
    let beats_per_bar = shared.beats_per_bar().max(1);
    let accent = shared.accent_first_beat() && beat == 0;

    shared.set_beat_flash(true);
    let flash_state = Arc::clone(shared);
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(BEAT_FLASH_MS));
        flash_state.set_beat_flash(false);
    });

    if let Ok(resolved) = clicks.lock() {
        let voice = if accent {
            resolved.accent.as_ref().or(resolved.normal.as_ref())
        } else {
            resolved.normal.as_ref()
        };
        if let Some(voice) = voice {
            voice.reset_and_play();
        }
    }

    // Never blocks: a full ring buffer drops the event instead of stalling the beat
    if let Ok(mut tx) = beat_tx.try_lock() {
        let _ = ringbuf::traits::Producer::try_push(&mut *tx, BeatEvent { beat, accent });
    }

    shared.set_beat_index((beat + 1) % beats_per_bar);
}

/// The metronome engine
/// Owns the tempo configuration, the tap estimator and the ticker lifecycle;
/// click sounds come from an injected [`SoundBank`]
pub struct Metronome {
    shared: Arc<SharedBeatState>,
    bank: Arc<dyn SoundBank>,
    sound_profile: String,
    clicks: Arc<Mutex<ResolvedClicks>>,
    taps: TapTempo,
    epoch: Instant,
    beat_tx: Arc<Mutex<BeatEventProducer>>,
    ticker: Option<TickerHandle>,
}

impl Metronome {
    /// Create a stopped metronome with default configuration.
    /// Clicks for `sound_profile` are resolved up front; a profile the bank
    /// does not know simply yields a silent metronome.
    pub fn new(bank: Arc<dyn SoundBank>, sound_profile: &str, beat_tx: BeatEventProducer) -> Self {
        let clicks = resolve_clicks(bank.as_ref(), sound_profile);
        Self {
            shared: SharedBeatState::new(),
            bank,
            sound_profile: sound_profile.to_string(),
            clicks: Arc::new(Mutex::new(clicks)),
            taps: TapTempo::new(),
            epoch: Instant::now(),
            beat_tx: Arc::new(Mutex::new(beat_tx)),
            ticker: None,
        }
    }

    /// Get shared state (for front ends polling flash and beat index)
    pub fn shared_state(&self) -> Arc<SharedBeatState> {
        Arc::clone(&self.shared)
    }

    /// Start beating from the top of the bar.
    /// The interval is derived from the bpm at this moment; a running
    /// metronome restarts on the new grid.
    pub fn start(&mut self) {
        self.stop();

        let interval = Tempo::new(self.shared.bpm() as i32).beat_interval();
        self.shared.set_beat_index(0);
        self.shared.set_playing(true);
        self.ticker = Some(spawn_ticker(
            interval,
            Arc::clone(&self.shared),
            Arc::clone(&self.clicks),
            Arc::clone(&self.beat_tx),
        ));
    }

    /// Stop beating and reset to the top of the bar.
    /// Joins the ticker thread, so no beat fires after this returns. An
    /// in-flight flash clear is not cancelled; it can only clear a flag
    /// this method clears anyway.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        self.shared.set_playing(false);
        self.shared.set_beat_flash(false);
        self.shared.set_beat_index(0);
    }

    /// Toggle between running and stopped
    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.shared.is_playing()
    }

    /// Zero-based index of the next beat in the bar
    pub fn current_beat(&self) -> u32 {
        self.shared.beat_index()
    }

    /// True for a short window after each beat
    pub fn beat_flash(&self) -> bool {
        self.shared.beat_flash()
    }

    /// Set tempo, clamped to the supported range.
    /// Takes effect on the next start; a running ticker keeps its grid.
    pub fn set_bpm(&mut self, bpm: i32) {
        self.shared.set_bpm(Tempo::new(bpm).bpm());
    }

    pub fn bpm(&self) -> u32 {
        self.shared.bpm()
    }

    /// Adjust tempo by a signed step (increment/decrement buttons)
    pub fn nudge_bpm(&mut self, delta: i32) {
        // Saturate so an extreme step still lands on the nearest bound
        let next = (self.shared.bpm() as i32).saturating_add(delta);
        self.set_bpm(next);
    }

    /// Set beats per bar (floored at 1); the ticker picks this up on the
    /// very next beat
    pub fn set_beats_per_bar(&mut self, beats: u32) {
        self.shared.set_beats_per_bar(beats.max(1));
    }

    pub fn beats_per_bar(&self) -> u32 {
        self.shared.beats_per_bar()
    }

    /// Enable/disable the accent on beat one; read live by the ticker
    pub fn set_accent_first_beat(&mut self, accent: bool) {
        self.shared.set_accent_first_beat(accent);
    }

    pub fn accent_first_beat(&self) -> bool {
        self.shared.accent_first_beat()
    }

    /// Switch to another sound profile and re-resolve both clicks.
    /// Plays the new normal click once as an audible preview.
    pub fn set_sound_profile(&mut self, profile: &str) {
        self.sound_profile = profile.to_string();
        let resolved = resolve_clicks(self.bank.as_ref(), profile);
        let preview = resolved.normal.clone();
        if let Ok(mut clicks) = self.clicks.lock() {
            *clicks = resolved;
        }
        if let Some(voice) = preview {
            voice.reset_and_play();
        }
    }

    /// Name of the active sound profile
    pub fn sound_profile(&self) -> &str {
        &self.sound_profile
    }

    /// Profiles the injected bank offers
    pub fn profiles(&self) -> Vec<String> {
        self.bank.profiles()
    }

    /// Record a tap now; see [`tap_at`](Self::tap_at)
    pub fn tap(&mut self) -> Option<Tempo> {
        let now_ms = self.epoch.elapsed().as_millis() as u64;
        self.tap_at(now_ms)
    }

    /// Record a tap at an explicit timestamp and, once an estimate exists,
    /// adopt it as the current tempo
    pub fn tap_at(&mut self, now_ms: u64) -> Option<Tempo> {
        let tempo = self.taps.tap(now_ms)?;
        self.shared.set_bpm(tempo.bpm());
        Some(tempo)
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> TempoConfig {
        TempoConfig::new(
            Tempo::new(self.shared.bpm() as i32),
            self.shared.beats_per_bar(),
            self.shared.accent_first_beat(),
        )
    }

    /// Replace the whole configuration at once (loading a preset)
    pub fn apply_config(&mut self, config: TempoConfig) {
        self.shared.set_bpm(config.tempo.bpm());
        self.shared.set_beats_per_bar(config.beats_per_bar.max(1));
        self.shared.set_accent_first_beat(config.accent_first_beat);
    }
}

impl Drop for Metronome {
    fn drop(&mut self) {
        self.stop();
    }
}

fn resolve_clicks(bank: &dyn SoundBank, profile: &str) -> ResolvedClicks {
    ResolvedClicks {
        accent: bank.resolve(ClickKind::Accent, profile),
        normal: bank.resolve(ClickKind::Normal, profile),
    }
}
