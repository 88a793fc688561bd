use clickster::{ClickVoice, Metronome, Playable, Preset, SynthBank, TapTempo};
use clickster::{create_beat_channel, MemoryStore, PresetLibrary, SoundBank};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;

/// Benchmark tap estimation (runs on every tap of a live performance)
fn bench_tap_tempo(c: &mut Criterion) {
    c.bench_function("tap_estimate", |b| {
        let mut taps = TapTempo::new();
        let mut now_ms = 0u64;

        b.iter(|| {
            now_ms += 500;
            black_box(taps.tap(black_box(now_ms)));
        });
    });
}

/// Benchmark click generation (paid once per bank construction)
fn bench_synth_bank_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth_bank");

    for sample_rate in [44_100.0f32, 48_000.0, 96_000.0] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}Hz", sample_rate as u32)),
            &sample_rate,
            |b, &rate| {
                b.iter(|| {
                    black_box(SynthBank::new(black_box(rate)));
                });
            },
        );
    }
    group.finish();
}

/// Benchmark voice playback (what an output driver pays per buffer)
fn bench_click_voice_fill(c: &mut Criterion) {
    let buffer_size = 512;
    let samples: Vec<f32> = (0..480).map(|i| (i as f32 * 0.01).sin()).collect();
    let voice = ClickVoice::new(samples, 48_000);
    let mut buffer = vec![0.0f32; buffer_size];

    c.bench_function("click_voice_fill_512", |b| {
        b.iter(|| {
            voice.reset_and_play();
            voice.fill(black_box(&mut buffer));
        });
    });
}

/// Benchmark a full tick against a resolved bank (the per-beat cost)
fn bench_resolve_and_trigger(c: &mut Criterion) {
    let bank = SynthBank::new(48_000.0);

    c.bench_function("resolve_and_trigger", |b| {
        b.iter(|| {
            if let Some(voice) = bank.resolve(
                black_box(clickster::ClickKind::Normal),
                black_box("synth"),
            ) {
                voice.reset_and_play();
            }
        });
    });
}

/// Benchmark preset list decode at realistic library sizes
fn bench_preset_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("preset_listing");

    for count in [10usize, 100, 1_000] {
        let mut library = PresetLibrary::new(Box::new(MemoryStore::new()));
        for i in 0..count {
            library
                .save_preset(Preset::new(&format!("Song {}", i), 60 + (i as u32 % 180), 4, true))
                .unwrap();
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_presets", count)),
            &count,
            |b, _| {
                b.iter(|| {
                    black_box(library.list_presets());
                });
            },
        );
    }
    group.finish();
}

/// Benchmark start/stop cycling (spawns and joins the ticker thread)
fn bench_transport_cycle(c: &mut Criterion) {
    let (beat_tx, _beat_rx) = create_beat_channel(64);
    let bank: Arc<dyn SoundBank> = Arc::new(SynthBank::new(48_000.0));
    let mut metronome = Metronome::new(bank, "synth", beat_tx);

    c.bench_function("start_stop_cycle", |b| {
        b.iter(|| {
            metronome.start();
            metronome.stop();
        });
    });
}

criterion_group!(
    benches,
    bench_tap_tempo,
    bench_synth_bank_generation,
    bench_click_voice_fill,
    bench_resolve_and_trigger,
    bench_preset_listing,
    bench_transport_cycle
);
criterion_main!(benches);
