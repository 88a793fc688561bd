// Quick demonstration of the preset and setlist persistence
// Run with: cargo run --bin demo_preset_store

use clickster::{FileStore, Preset, PresetLibrary, Tempo, TempoConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🎵 Clickster - Preset Store Demo");
    println!("================================");

    let data_dir = std::env::temp_dir().join("clickster_demo_store");
    let mut library = PresetLibrary::new(Box::new(FileStore::new(&data_dir)));

    // Start clean in case a previous run was interrupted
    for index in (0..library.list_presets().len()).rev() {
        library.delete_preset(index)?;
    }
    for name in library.list_setlists() {
        library.delete_setlist(&name)?;
    }

    // Save a handful of tempos
    library.save_preset(Preset::new("Opener", 128, 4, true))?;
    library.save_preset(Preset::new("Waltz", 90, 3, true))?;
    library.save_preset(Preset::from_config(
        "Odd meter",
        TempoConfig::new(Tempo::new(140), 7, false),
    ))?;

    println!("✅ Saved {} presets to {}", library.list_presets().len(), data_dir.display());
    for preset in library.list_presets() {
        println!(
            "   - {} ({} bpm, {} beats/bar)",
            preset.name, preset.bpm, preset.beats_per_bar
        );
    }

    // Group them into a setlist
    library.save_current_as_setlist("Friday gig")?;
    println!("\n💾 Setlists: {:?}", library.list_setlists());

    // A fresh library over the same directory sees everything
    let mut reopened = PresetLibrary::new(Box::new(FileStore::new(&data_dir)));
    let presets = reopened.list_presets();
    println!("\n📂 Reopened library:");
    println!("   - Presets: {}", presets.len());
    println!("   - Setlists: {:?}", reopened.list_setlists());

    assert_eq!(presets.len(), 3);
    assert_eq!(presets[1], Preset::new("Waltz", 90, 3, true));
    assert_eq!(reopened.list_setlists(), vec!["Friday gig"]);

    // Loading the setlist installs its songs as the preset list
    reopened.delete_preset(0)?;
    reopened.delete_preset(0)?;
    assert_eq!(reopened.list_presets().len(), 1);

    let installed = reopened
        .load_setlist("Friday gig")?
        .expect("setlist saved above");
    assert_eq!(installed.len(), 3);
    assert_eq!(reopened.list_presets().len(), 3);
    println!("\n🔄 Setlist load restored the full preset list");

    println!("\n✅ Data integrity verified - all values match!");

    // Cleanup
    std::fs::remove_dir_all(&data_dir)?;
    println!("🧹 Cleaned up demo directory");

    println!("\n🎉 Preset store demo completed successfully!");
    println!("   The store supports:");
    println!("   - ✅ JSON documents under stable keys (songs, setlists)");
    println!("   - ✅ Insertion-ordered presets with index-based load/delete");
    println!("   - ✅ Named setlists that reinstall their songs on load");
    println!("   - ✅ Reads that degrade instead of failing");

    Ok(())
}
