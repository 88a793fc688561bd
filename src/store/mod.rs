// Store module
// Preset and setlist persistence over pluggable key-value backends

pub mod backend;
pub mod library;
pub mod types;

pub use backend::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use library::{PresetLibrary, SETLISTS_KEY, SONGS_KEY};
pub use types::Preset;
