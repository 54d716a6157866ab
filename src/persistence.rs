//! Persistence adapter: the note collection and the display flag under fixed keys.
use log::{debug, error, info};

use crate::{DiaryError, DisplayMode, KeyValueStore, Note, Result};

/// Key holding the JSON array of notes
pub const NOTES_KEY: &str = "my-pro-notes";

/// Key holding the "true"/"false" dark mode flag
pub const DISPLAY_MODE_KEY: &str = "dark-mode";

/// Reads and writes diary state through a `KeyValueStore`
#[derive(Debug)]
pub struct PersistenceAdapter<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Serializes the full ordered collection, replacing whatever was stored before
    pub fn save_notes(&mut self, notes: &[Note]) -> Result<()> {
        let json = serde_json::to_string(notes).map_err(|e| {
            error!("Failed to serialize notes: {}", e);
            DiaryError::Serialization(e)
        })?;
        self.store.set(NOTES_KEY, &json)?;
        debug!("Persisted {} notes", notes.len());
        Ok(())
    }

    /// Loads the stored collection. A missing key yields an empty collection;
    /// undecodable data is returned as `CorruptStore` without any recovery.
    pub fn load_notes(&self) -> Result<Vec<Note>> {
        let Some(raw) = self.store.get(NOTES_KEY)? else {
            info!("No stored notes found, starting with an empty diary");
            return Ok(Vec::new());
        };

        let notes: Vec<Note> = serde_json::from_str(&raw).map_err(|e| {
            error!("Stored notes under '{}' are malformed: {}", NOTES_KEY, e);
            DiaryError::CorruptStore {
                key: NOTES_KEY.to_string(),
                message: e.to_string(),
            }
        })?;

        info!("Loaded {} notes", notes.len());
        Ok(notes)
    }

    pub fn save_display_mode(&mut self, mode: DisplayMode) -> Result<()> {
        let flag = if mode.is_dark() { "true" } else { "false" };
        self.store.set(DISPLAY_MODE_KEY, flag)
    }

    /// Anything other than the exact string "true" means light mode.
    pub fn load_display_mode(&self) -> Result<DisplayMode> {
        let flag = self.store.get(DISPLAY_MODE_KEY)?;
        Ok(DisplayMode::from_dark_flag(flag.as_deref() == Some("true")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, MemoryStore};

    fn sample_notes() -> Vec<Note> {
        vec![
            Note::new(2, "Second".to_string(), "1/2/2024 9:00:00 AM".to_string(), Category::Love),
            Note::new(1, "First".to_string(), "1/1/2024 9:00:00 AM".to_string(), Category::General),
        ]
    }

    #[test]
    fn test_load_notes_defaults_to_empty() {
        let adapter = PersistenceAdapter::new(MemoryStore::new());
        assert!(adapter.load_notes().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order_and_fields() {
        let mut adapter = PersistenceAdapter::new(MemoryStore::new());
        let notes = sample_notes();

        adapter.save_notes(&notes).unwrap();
        assert_eq!(adapter.load_notes().unwrap(), notes);

        adapter.save_notes(&notes[..1]).unwrap();
        assert_eq!(adapter.load_notes().unwrap(), notes[..1].to_vec());
    }

    #[test]
    fn test_stored_format_is_plain_json_array() {
        let mut adapter = PersistenceAdapter::new(MemoryStore::new());
        adapter.save_notes(&sample_notes()).unwrap();

        let raw = adapter.store().get(NOTES_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], 2);
        assert_eq!(value[0]["category"], "Love");
        assert_eq!(value[1]["text"], "First");
    }

    #[test]
    fn test_corrupt_notes_fail_hard() {
        let mut store = MemoryStore::new();
        store.set(NOTES_KEY, "{not json").unwrap();
        let adapter = PersistenceAdapter::new(store);

        match adapter.load_notes() {
            Err(DiaryError::CorruptStore { key, .. }) => assert_eq!(key, NOTES_KEY),
            other => panic!("expected CorruptStore, got {:?}", other),
        }
    }

    #[test]
    fn test_display_mode_round_trip_and_default() {
        let mut adapter = PersistenceAdapter::new(MemoryStore::new());
        assert_eq!(adapter.load_display_mode().unwrap(), DisplayMode::Light);

        adapter.save_display_mode(DisplayMode::Dark).unwrap();
        assert_eq!(adapter.store().get(DISPLAY_MODE_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(adapter.load_display_mode().unwrap(), DisplayMode::Dark);

        adapter.save_display_mode(DisplayMode::Light).unwrap();
        assert_eq!(adapter.store().get(DISPLAY_MODE_KEY).unwrap().as_deref(), Some("false"));
        assert_eq!(adapter.load_display_mode().unwrap(), DisplayMode::Light);
    }

    #[test]
    fn test_unexpected_display_flag_is_light() {
        let mut store = MemoryStore::new();
        store.set(DISPLAY_MODE_KEY, "yes").unwrap();
        let adapter = PersistenceAdapter::new(store);
        assert_eq!(adapter.load_display_mode().unwrap(), DisplayMode::Light);
    }
}
