use clickster::messaging::{BeatEventConsumer, NotificationConsumer};
use clickster::{
    create_beat_channel, create_notification_channel, FileStore, MemoryStore, Metronome,
    NotificationLevel, Preset, PresetLibrary, SoundBank, SynthBank, WavBank, SYNTH_PROFILE,
};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

// Ringbuffer capacity constants
// Sized for the beat stream at the fastest tempo:
// - 240 BPM is 4 beats/second
// - 64 slots cover 16 seconds of unread beats before events are dropped
// - Notifications are rare (one per storage action), 256 is generous
const BEAT_RINGBUFFER_CAPACITY: usize = 64;
const NOTIFICATION_RINGBUFFER_CAPACITY: usize = 256;

// Synthesized clicks are generated at a fixed rate; there is no audio
// device to match, the rate only shapes the click length
const SAMPLE_RATE: f32 = 48_000.0;

/// Directory searched for WAV sound packs, relative to the working directory
const SOUND_PACK_DIR: &str = "sounds";

fn main() {
    println!("=== Clickster ===");
    println!("Version 0.1.0\n");

    // Create the communication channels
    let (beat_tx, beat_rx) = create_beat_channel(BEAT_RINGBUFFER_CAPACITY);
    let (notification_tx, mut notification_rx) =
        create_notification_channel(NOTIFICATION_RINGBUFFER_CAPACITY);
    let notification_tx = Arc::new(Mutex::new(notification_tx));

    // Prefer WAV packs on disk, fall back to the built-in synthesized clicks
    let bank: Arc<dyn SoundBank> = {
        let wav = WavBank::new(SOUND_PACK_DIR);
        if wav.profiles().is_empty() {
            println!("Sound: built-in synthesized clicks");
            Arc::new(SynthBank::new(SAMPLE_RATE))
        } else {
            println!("Sound packs: {}", wav.profiles().join(", "));
            Arc::new(wav)
        }
    };
    let default_profile = bank
        .profiles()
        .first()
        .cloned()
        .unwrap_or_else(|| SYNTH_PROFILE.to_string());

    let mut metronome = Metronome::new(Arc::clone(&bank), &default_profile, beat_tx);

    // Storage initialisation
    let mut library = match FileStore::default_location() {
        Some(dir) => {
            println!("Storage: {}", dir.display());
            PresetLibrary::with_notifications(
                Box::new(FileStore::new(dir)),
                Arc::clone(&notification_tx),
            )
        }
        None => {
            println!("Storage: in-memory (no data directory on this platform)");
            PresetLibrary::with_notifications(
                Box::new(MemoryStore::new()),
                Arc::clone(&notification_tx),
            )
        }
    };

    spawn_beat_printer(beat_rx, &metronome);

    println!("\n{} | profile '{}'", metronome.config(), default_profile);
    println!("Type 'help' for commands.\n");

    let mut input = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        input.clear();
        if io::stdin().read_line(&mut input).unwrap_or(0) == 0 {
            break; // EOF
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            continue;
        };

        match command {
            "start" => {
                metronome.start();
                println!("Playing at {} bpm", metronome.bpm());
            }
            "stop" => {
                metronome.stop();
                println!("Stopped.");
            }
            "toggle" => {
                metronome.toggle_play();
                println!(
                    "{}",
                    if metronome.is_playing() {
                        "Playing"
                    } else {
                        "Stopped."
                    }
                );
            }
            "bpm" => match parts.get(1).and_then(|v| v.parse::<i32>().ok()) {
                Some(bpm) => {
                    metronome.set_bpm(bpm);
                    report_bpm(&metronome);
                }
                None => println!("Usage: bpm <number>"),
            },
            "+" => {
                metronome.nudge_bpm(1);
                report_bpm(&metronome);
            }
            "-" => {
                metronome.nudge_bpm(-1);
                report_bpm(&metronome);
            }
            "sig" => match parts.get(1).and_then(|v| v.parse::<u32>().ok()) {
                Some(beats) => {
                    metronome.set_beats_per_bar(beats);
                    println!("{} beats per bar", metronome.beats_per_bar());
                }
                None => println!("Usage: sig <beats>"),
            },
            "accent" => {
                let accent = !metronome.accent_first_beat();
                metronome.set_accent_first_beat(accent);
                println!("Accent on beat one: {}", if accent { "on" } else { "off" });
            }
            "tap" => match metronome.tap() {
                Some(tempo) => println!("Tap: {}", tempo),
                None => println!("Tap: first tap recorded, keep tapping"),
            },
            "profiles" => {
                for name in metronome.profiles() {
                    let marker = if name == metronome.sound_profile() {
                        "*"
                    } else {
                        " "
                    };
                    println!("  {} {}", marker, name);
                }
            }
            "profile" => match parts.get(1) {
                Some(name) => {
                    metronome.set_sound_profile(name);
                    println!("Profile '{}'", name);
                }
                None => println!("Usage: profile <name>"),
            },
            "save" if parts.len() > 1 => {
                let name = parts[1..].join(" ");
                let preset = Preset::from_config(&name, metronome.config());
                match library.save_preset(preset) {
                    Ok(()) => println!("Saved '{}'.", name),
                    Err(e) => eprintln!("ERROR: {}", e),
                }
            }
            "save" => println!("Usage: save <name>"),
            "list" => {
                let presets = library.list_presets();
                if presets.is_empty() {
                    println!("No saved tempos.");
                }
                print_presets(&presets);
            }
            "load" => match parts.get(1).and_then(|v| v.parse::<usize>().ok()) {
                Some(index) => match library.load_preset(index) {
                    Some(preset) => {
                        metronome.apply_config(preset.config());
                        println!("Loaded '{}': {}", preset.name, metronome.config());
                    }
                    None => println!("No preset at index {}", index),
                },
                None => println!("Usage: load <index>"),
            },
            "del" => match parts.get(1).and_then(|v| v.parse::<usize>().ok()) {
                Some(index) => {
                    if let Err(e) = library.delete_preset(index) {
                        eprintln!("ERROR: {}", e);
                    }
                }
                None => println!("Usage: del <index>"),
            },
            "setlist" => match parts.get(1).copied() {
                Some("save") if parts.len() > 2 => {
                    let name = parts[2..].join(" ");
                    if let Err(e) = library.save_current_as_setlist(&name) {
                        eprintln!("ERROR: {}", e);
                    }
                }
                Some("load") if parts.len() > 2 => {
                    let name = parts[2..].join(" ");
                    match library.load_setlist(&name) {
                        Ok(Some(presets)) => {
                            println!("Setlist '{}' loaded ({} songs):", name, presets.len());
                            print_presets(&presets);
                        }
                        Ok(None) => println!("No setlist named '{}'.", name),
                        Err(e) => eprintln!("ERROR: {}", e),
                    }
                }
                Some("del") if parts.len() > 2 => {
                    let name = parts[2..].join(" ");
                    if let Err(e) = library.delete_setlist(&name) {
                        eprintln!("ERROR: {}", e);
                    }
                }
                _ => {
                    let names = library.list_setlists();
                    if names.is_empty() {
                        println!("No setlists.");
                    }
                    for name in names {
                        println!("  {}", name);
                    }
                }
            },
            "status" => {
                println!(
                    "{} | {} | profile '{}'",
                    metronome.config(),
                    if metronome.is_playing() {
                        "playing"
                    } else {
                        "stopped"
                    },
                    metronome.sound_profile(),
                );
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            _ => println!("Unknown command '{}'. Type 'help'.", command),
        }

        drain_notifications(&mut notification_rx);
    }

    metronome.stop();
    println!("Bye.");
}

/// Print beats as the ticker publishes them, without ever blocking it
fn spawn_beat_printer(mut beat_rx: BeatEventConsumer, metronome: &Metronome) {
    let shared = metronome.shared_state();
    thread::spawn(move || loop {
        while let Some(event) = ringbuf::traits::Consumer::try_pop(&mut beat_rx) {
            let marker = if event.accent { "●" } else { "·" };
            println!("  {} {}/{}", marker, event.beat + 1, shared.beats_per_bar());
        }
        thread::sleep(Duration::from_millis(10));
    });
}

fn report_bpm(metronome: &Metronome) {
    println!(
        "{} bpm{}",
        metronome.bpm(),
        if metronome.is_playing() {
            " (applies on restart)"
        } else {
            ""
        }
    );
}

fn print_presets(presets: &[Preset]) {
    for (index, preset) in presets.iter().enumerate() {
        println!(
            "  [{}] {} - {} bpm, {} beats/bar{}",
            index,
            preset.name,
            preset.bpm,
            preset.beats_per_bar,
            if preset.accent_first_beat {
                ", accent"
            } else {
                ""
            }
        );
    }
}

fn drain_notifications(notification_rx: &mut NotificationConsumer) {
    while let Some(notification) = ringbuf::traits::Consumer::try_pop(notification_rx) {
        match notification.level {
            NotificationLevel::Error => eprintln!("ERROR: {}", notification.message),
            NotificationLevel::Warning => println!("WARNING: {}", notification.message),
            NotificationLevel::Info => println!("{}", notification.message),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  start | stop | toggle       transport");
    println!("  bpm <n> | + | -             set or nudge the tempo");
    println!("  sig <n>                     beats per bar");
    println!("  accent                      toggle the accent on beat one");
    println!("  tap                         tap the tempo in");
    println!("  profiles | profile <name>   click sounds");
    println!("  save <name>                 save the current tempo");
    println!("  list | load <i> | del <i>   saved tempos");
    println!("  setlist                     list setlists");
    println!("  setlist save|load|del <name>");
    println!("  status | help | quit");
}
