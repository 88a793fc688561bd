// Quick demonstration of the beat engine
// Run with: cargo run --bin demo_metronome

use clickster::{create_beat_channel, BeatEvent, Metronome, SynthBank, SYNTH_PROFILE};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    println!("🎵 Clickster - Beat Engine Demo");
    println!("===============================");

    let (beat_tx, mut beat_rx) = create_beat_channel(64);
    let bank = Arc::new(SynthBank::new(48_000.0));
    let mut metronome = Metronome::new(bank, SYNTH_PROFILE, beat_tx);

    // Fast tempo keeps the demo short: 240 bpm is one beat every 250 ms
    metronome.set_bpm(240);
    println!("\n▶️  Two bars of 4 at {} bpm...", metronome.bpm());

    metronome.start();
    thread::sleep(Duration::from_millis(2_100));
    metronome.stop();

    let mut beats = Vec::new();
    while let Some(event) = ringbuf::traits::Consumer::try_pop(&mut beat_rx) {
        beats.push(event);
        print_beat(event);
    }
    assert!(beats.len() >= 8, "expected two full bars");
    assert!(beats[0].accent);
    assert_eq!(beats[4].beat, 0);

    println!("\n▶️  One bar of 3, accent off...");
    metronome.set_beats_per_bar(3);
    metronome.set_accent_first_beat(false);
    metronome.start();
    thread::sleep(Duration::from_millis(800));
    metronome.stop();

    while let Some(event) = ringbuf::traits::Consumer::try_pop(&mut beat_rx) {
        assert!(!event.accent);
        print_beat(event);
    }

    // Tap tempo: four taps at 500 ms spacing settle on 120 bpm
    println!("\n👆 Tapping at 500 ms intervals...");
    for t in [0u64, 500, 1_000, 1_500] {
        if let Some(estimate) = metronome.tap_at(t) {
            println!("   tap -> {}", estimate);
        } else {
            println!("   tap -> (first tap)");
        }
    }
    assert_eq!(metronome.bpm(), 120);

    println!("\n🎉 Beat engine demo completed successfully!");
}

fn print_beat(event: BeatEvent) {
    let marker = if event.accent { "●" } else { "·" };
    println!("   {} beat {}", marker, event.beat + 1);
}
