// Preset library - Saved tempos and named setlists over a key-value store
// Whole collections are serialized as single JSON documents under fixed
// keys, the way a browser keeps them in local storage

use crate::messaging::{Notification, NotificationCategory, NotificationProducer};
use crate::store::backend::{KeyValueStore, StoreError};
use crate::store::types::Preset;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Key holding the current preset list
pub const SONGS_KEY: &str = "songs";
/// Key holding the map of named setlists
pub const SETLISTS_KEY: &str = "setlists";

/// Preset and setlist persistence.
///
/// Reads never fail: a missing key, unreadable file or corrupt document
/// degrades to an empty collection and surfaces as an error notification,
/// so the metronome keeps running whatever the storage looks like.
/// Writes report their errors.
pub struct PresetLibrary {
    store: Box<dyn KeyValueStore>,
    notification_tx: Option<Arc<Mutex<NotificationProducer>>>,
}

impl PresetLibrary {
    /// Create a library over the given backend, without notifications
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            notification_tx: None,
        }
    }

    /// Create a library that reports confirmations and problems to the
    /// front end over the notification channel
    pub fn with_notifications(
        store: Box<dyn KeyValueStore>,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Self {
        Self {
            store,
            notification_tx: Some(notification_tx),
        }
    }

    /// Presets currently stored, in insertion order
    pub fn list_presets(&self) -> Vec<Preset> {
        match self.read_songs() {
            Ok(songs) => songs,
            Err(e) => {
                self.notify(Notification::error(
                    NotificationCategory::Storage,
                    format!("Could not read saved tempos: {}", e),
                ));
                Vec::new()
            }
        }
    }

    /// Append a preset to the list. A blank name is silently ignored,
    /// matching a save button that does nothing until a name is typed.
    pub fn save_preset(&mut self, preset: Preset) -> Result<(), StoreError> {
        if preset.name.trim().is_empty() {
            return Ok(());
        }

        let mut songs = self.list_presets();
        songs.push(preset);
        self.write_songs(&songs)
    }

    /// Preset at `index`, or None when out of range
    pub fn load_preset(&self, index: usize) -> Option<Preset> {
        self.list_presets().get(index).cloned()
    }

    /// Remove the preset at `index`; out-of-range indices are a no-op
    pub fn delete_preset(&mut self, index: usize) -> Result<(), StoreError> {
        let mut songs = self.list_presets();
        if index >= songs.len() {
            return Ok(());
        }

        songs.remove(index);
        self.write_songs(&songs)
    }

    /// Names of all saved setlists, sorted
    pub fn list_setlists(&self) -> Vec<String> {
        self.setlists_or_empty().into_keys().collect()
    }

    /// Store `presets` as the setlist `name`, replacing a same-named one.
    /// A blank name is ignored; an empty preset list warns and saves
    /// nothing, there is no point in an empty setlist.
    pub fn save_setlist(&mut self, name: &str, presets: &[Preset]) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }
        if presets.is_empty() {
            self.notify(Notification::warning(
                NotificationCategory::Storage,
                "No songs to save.".to_string(),
            ));
            return Ok(());
        }

        let mut setlists = self.setlists_or_empty();
        setlists.insert(name.to_string(), presets.to_vec());
        self.write_setlists(&setlists)?;

        self.notify(Notification::info(
            NotificationCategory::Storage,
            format!("Setlist '{}' saved.", name),
        ));
        Ok(())
    }

    /// Save the current preset list under a setlist name
    pub fn save_current_as_setlist(&mut self, name: &str) -> Result<(), StoreError> {
        let songs = self.list_presets();
        self.save_setlist(name, &songs)
    }

    /// Install the setlist `name` as the current preset list, replacing
    /// whatever is there. Returns the installed presets, or None for an
    /// unknown name.
    pub fn load_setlist(&mut self, name: &str) -> Result<Option<Vec<Preset>>, StoreError> {
        let setlists = self.setlists_or_empty();
        let Some(presets) = setlists.get(name) else {
            return Ok(None);
        };

        let presets = presets.clone();
        self.write_songs(&presets)?;
        Ok(Some(presets))
    }

    /// Remove the setlist `name`; unknown names are a no-op.
    /// The current preset list is left alone even if it came from the
    /// deleted setlist.
    pub fn delete_setlist(&mut self, name: &str) -> Result<(), StoreError> {
        let mut setlists = self.setlists_or_empty();
        if setlists.remove(name).is_none() {
            return Ok(());
        }

        self.write_setlists(&setlists)
    }

    fn read_songs(&self) -> Result<Vec<Preset>, StoreError> {
        match self.store.get(SONGS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_songs(&mut self, songs: &[Preset]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(songs)?;
        self.store.set(SONGS_KEY, &raw)
    }

    fn read_setlists(&self) -> Result<BTreeMap<String, Vec<Preset>>, StoreError> {
        match self.store.get(SETLISTS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(BTreeMap::new()),
        }
    }

    fn setlists_or_empty(&self) -> BTreeMap<String, Vec<Preset>> {
        match self.read_setlists() {
            Ok(setlists) => setlists,
            Err(e) => {
                self.notify(Notification::error(
                    NotificationCategory::Storage,
                    format!("Could not read setlists: {}", e),
                ));
                BTreeMap::new()
            }
        }
    }

    fn write_setlists(
        &mut self,
        setlists: &BTreeMap<String, Vec<Preset>>,
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(setlists)?;
        self.store.set(SETLISTS_KEY, &raw)
    }

    fn notify(&self, notification: Notification) {
        if let Some(tx) = &self.notification_tx {
            if let Ok(mut guard) = tx.try_lock() {
                let _ = ringbuf::traits::Producer::try_push(&mut *guard, notification);
            }
        }
    }
}
