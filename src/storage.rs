use chrono::Local;
use log::{debug, info, warn};

use crate::{
    format_timestamp, next_note_id, Category, KeyValueStore, Note, PersistenceAdapter, Result,
    ValidationError, DEFAULT_DATE_FORMAT,
};

/// Owns the diary's notes, newest first, and mirrors every change to storage.
///
/// Mutations are validated before anything changes: an empty text or an unknown
/// id returns a `ValidationError` and neither memory nor storage is touched.
/// When the write to storage itself fails the in-memory change has already been
/// applied, so the two may disagree until the next successful save.
pub struct NoteStore<S: KeyValueStore> {
    /// Notes in display order, newest first
    notes: Vec<Note>,

    /// Where every mutation is written
    persistence: PersistenceAdapter<S>,

    /// chrono format used for the `date` of new notes
    date_format: String,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Loads the stored collection and wraps it in a store.
    ///
    /// # Arguments
    ///
    /// * `persistence` - Adapter over the durable key-value store
    ///
    /// # Returns
    ///
    /// The store, or `CorruptStore` if the saved notes cannot be decoded
    pub fn open(persistence: PersistenceAdapter<S>) -> Result<Self> {
        let notes = persistence.load_notes()?;
        Ok(Self {
            notes,
            persistence,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        })
    }

    /// Overrides the format used for creation dates
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut PersistenceAdapter<S> {
        &mut self.persistence
    }

    /// Adds a note at the front of the collection and persists the collection.
    pub fn create(&mut self, text: &str, category: Category) -> Result<Note> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring create with empty text");
            return Err(ValidationError::EmptyText.into());
        }

        let now = Local::now();
        let id = next_note_id(now.timestamp_millis(), &self.notes);
        let note = Note::new(
            id,
            text.to_string(),
            format_timestamp(&now, &self.date_format),
            category,
        );

        self.notes.insert(0, note.clone());
        info!("Created note {} ({})", note.id, note.category);
        self.persist()?;
        Ok(note)
    }

    /// Replaces text and category of the note with `id`; its id, date and position stay.
    pub fn update(&mut self, id: i64, text: &str, category: Category) -> Result<Note> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring update of {} with empty text", id);
            return Err(ValidationError::EmptyText.into());
        }

        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            debug!("Ignoring update of unknown note {}", id);
            return Err(ValidationError::NotFound { id }.into());
        };

        note.text = text.to_string();
        note.category = category;
        let updated = note.clone();

        info!("Updated note {}", id);
        self.persist()?;
        Ok(updated)
    }

    /// Removes the note with `id` and persists the collection.
    pub fn delete(&mut self, id: i64) -> Result<Note> {
        let Some(position) = self.notes.iter().position(|n| n.id == id) else {
            debug!("Ignoring delete of unknown note {}", id);
            return Err(ValidationError::NotFound { id }.into());
        };

        let removed = self.notes.remove(position);
        info!("Deleted note {}", id);
        self.persist()?;
        Ok(removed)
    }

    fn persist(&mut self) -> Result<()> {
        self.persistence.save_notes(&self.notes).map_err(|e| {
            warn!("In-memory notes are ahead of storage: {}", e);
            e
        })
    }
}
